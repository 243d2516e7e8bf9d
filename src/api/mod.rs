pub mod client;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock;

pub use client::{ApiClient, Paged};
pub use transport::{HttpReply, HttpTransport, Transport};
pub use types::{AdvancedStatLine, Cursor, Minutes, Page, PlayerRecord, ScheduledGame, StatLine};

#[cfg(test)]
pub(crate) use mock::MockTransport;
