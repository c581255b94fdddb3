use crate::{BatchId, CandidateFile, ComputeOutcome, FileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked or dropped one or more files.
    FilesSelected(Vec<CandidateFile>),
    /// User clicked the remove button of a file entry.
    RemoveFileClicked(FileId),
    /// User clicked Run.
    RunClicked,
    /// A file of a batch was read and decoded.
    FileLoaded {
        batch_id: BatchId,
        name: String,
        content: String,
    },
    /// A file of a batch could not be read or decoded.
    FileLoadFailed {
        batch_id: BatchId,
        name: String,
        error: String,
    },
    /// The engine answered, possibly with a non-fatal error.
    ComputeFinished {
        batch_id: BatchId,
        outcome: ComputeOutcome,
    },
    /// The engine call itself failed.
    ComputeFailed { batch_id: BatchId, message: String },
    /// User switched to the raw text output.
    ShowText,
    /// User switched to the table output.
    ShowTable,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
