use std::fmt;

use acb_core::{BatchId, ComputeOutcome};

use crate::invoke::ComputeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FileLoaded {
        batch_id: BatchId,
        name: String,
        result: Result<String, LoadError>,
    },
    ComputeCompleted {
        batch_id: BatchId,
        result: Result<ComputeOutcome, ComputeError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: FailureKind,
    pub message: String,
}

impl LoadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Io,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedMediaType { media_type: String },
    Decode,
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "file not found"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedMediaType { media_type } => {
                write!(f, "unsupported media type {media_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Aborted => write!(f, "load aborted"),
        }
    }
}
