/// The external text producers whose output flows into a session.
use std::fmt;

use serde::{Deserialize, Serialize};

/// An AI or speech operation that produced text for insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiOperation {
    Generate,
    Rewrite,
    Summarize,
    Transcribe,
}

impl AiOperation {
    /// All operations, in menu order.
    pub const ALL: [AiOperation; 4] = [
        AiOperation::Generate,
        AiOperation::Rewrite,
        AiOperation::Summarize,
        AiOperation::Transcribe,
    ];

    /// Human-readable label used for version names.
    pub fn label(&self) -> &'static str {
        match self {
            AiOperation::Generate => "Generated",
            AiOperation::Rewrite => "Rewrite",
            AiOperation::Summarize => "Summary",
            AiOperation::Transcribe => "Transcript",
        }
    }

    /// Parses a lowercase operation name (`"rewrite"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generate" => Some(AiOperation::Generate),
            "rewrite" => Some(AiOperation::Rewrite),
            "summarize" => Some(AiOperation::Summarize),
            "transcribe" => Some(AiOperation::Transcribe),
            _ => None,
        }
    }
}

impl fmt::Display for AiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiOperation::Generate => "generate",
            AiOperation::Rewrite => "rewrite",
            AiOperation::Summarize => "summarize",
            AiOperation::Transcribe => "transcribe",
        };
        f.write_str(name)
    }
}
