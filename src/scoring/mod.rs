//! Handicap stroke allocation, net scoring, and season points.
//!
//! Everything here is pure and synchronous: callers fetch the records, hand
//! them in, and persist whatever comes back.

pub mod allocation;
pub mod net;
pub mod points;
pub mod round;
pub mod standings;

pub use allocation::*;
pub use net::*;
pub use points::*;
pub use round::*;
pub use standings::*;
