use crate::{BatchId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read and decode one file of a frozen batch.
    LoadFile { batch_id: BatchId, file: SelectedFile },
    /// Hand a fully loaded batch to the computation engine.
    Compute {
        batch_id: BatchId,
        filenames: Vec<String>,
        contents: Vec<String>,
    },
}
