pub mod config;
pub mod store;

pub use config::EditorConfig;
pub use store::{HistoryRecord, OperationHistoryStore};
