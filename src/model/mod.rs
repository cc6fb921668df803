pub mod course;
pub mod member;
pub mod pairing;
pub mod schedule;
pub mod scorecard;
pub mod settings;
pub mod status;
pub mod utils;
pub mod validation;

pub use course::*;
pub use member::*;
pub use pairing::*;
pub use schedule::*;
pub use scorecard::*;
pub use settings::*;
pub use status::*;
pub use utils::*;
pub use validation::*;
