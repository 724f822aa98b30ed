pub mod config;
pub mod error;
pub mod fingerprint;
pub mod history;
pub mod model;
pub mod parse;
pub mod storage;
pub mod tags;
pub mod time;
pub mod validate;

// Re-export common error type
pub use error::{PurposelyError, Result};
pub use model::{QotdHistoryEntry, QotdItem, Scenario};
