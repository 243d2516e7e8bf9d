pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod merge;
pub mod pipeline;
pub mod roster;

pub use config::{Config, RetryPolicy};
pub use error::{FeedError, Result};
pub use merge::OutputRow;
pub use pipeline::{run, run_with, Outcome};
