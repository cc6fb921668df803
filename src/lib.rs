pub mod args;
pub mod controller;
pub mod error;
pub mod model;
pub mod scoring;
pub mod storage;
pub mod telemetry;
pub mod view;

pub const HTMX_PATH: &str = "https://unpkg.com/htmx.org@1.9.12";

pub use error::LeagueError;
pub use storage::{SqlStorage, Storage, StorageError};
