//! Editing core for an AI-assisted writing pad.
//!
//! An [`EditingSession`] owns one text input, its captured selection and its
//! snapshot history. External text (AI output, speech fragments) enters
//! through [`EditingSession::insert_at_cursor`], which merges it at the seams
//! and repairs sentence capitalization around the edit. The
//! [`VersionCarousel`] tracks named variants of a text independently of any
//! session.

pub mod buffer;
pub mod capitalize;
pub mod carousel;
pub mod history;
pub mod insert;
pub mod operation;
pub mod selection;
pub mod session;
pub mod storage;
mod words;

pub use buffer::TextBuffer;
pub use carousel::{LikeRequest, Version, VersionCarousel};
pub use insert::{insert_at_cursor, InsertOptions, InsertOutcome};
pub use operation::AiOperation;
pub use selection::{CaptureMode, SelectionRange, SelectionTracker, SentenceHint};
pub use session::{BufferInput, EditingSession, SessionOptions, TextInputHandle};
pub use storage::{StorageService, StoredVersion};
