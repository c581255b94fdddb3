use chrono::{DateTime, Utc};

use crate::{BatchId, DisplayMode, Document, FileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub id: FileId,
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub batch_id: BatchId,
    pub loaded: usize,
    pub total: usize,
    /// All files loaded; waiting for the engine.
    pub computing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub files: Vec<FileRowView>,
    pub run_enabled: bool,
    pub display_mode: DisplayMode,
    pub text_output: String,
    pub error_text: Option<String>,
    pub document: Document,
    pub batch: Option<BatchProgress>,
    pub dirty: bool,
}
