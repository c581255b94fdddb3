use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use acb_logging::{acb_debug, acb_info};
use chrono::{DateTime, Utc};

pub type FileId = u64;

/// The only media type accepted into a selection.
pub const TABULAR_MEDIA_TYPE: &str = "text/csv";

/// Opaque reference used by a file source to read the file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A file offered by the user (picker or drop) before the registry accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub media_type: String,
    pub size: Option<u64>,
    pub last_modified: DateTime<Utc>,
    pub handle: FileHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub id: FileId,
    pub name: String,
    pub media_type: String,
    pub size: Option<u64>,
    pub last_modified: DateTime<Utc>,
    pub handle: FileHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(FileId),
    NotTabular,
    Duplicate,
}

/// Files the user currently intends to process, keyed by registration id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRegistry {
    files: BTreeMap<FileId, SelectedFile>,
    next_id: FileId,
}

impl Default for SelectionRegistry {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a candidate unless it is not tabular data or is already selected.
    ///
    /// Duplicates are detected on the exact `(name, last_modified)` pair, so a
    /// re-saved file with a newer timestamp is registered as a distinct entry.
    pub fn add(&mut self, candidate: CandidateFile) -> AddOutcome {
        if !is_tabular(&candidate.media_type) {
            acb_info!("File {} ignored. Not CSV.", candidate.name);
            return AddOutcome::NotTabular;
        }
        if self.is_selected(&candidate) {
            acb_info!("File {} already selected.", candidate.name);
            return AddOutcome::Duplicate;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.files.insert(
            id,
            SelectedFile {
                id,
                name: candidate.name,
                media_type: candidate.media_type,
                size: candidate.size,
                last_modified: candidate.last_modified,
                handle: candidate.handle,
            },
        );
        AddOutcome::Added(id)
    }

    /// Applies [`SelectionRegistry::add`] to every candidate of one selection gesture.
    pub fn add_all(&mut self, candidates: impl IntoIterator<Item = CandidateFile>) -> Vec<AddOutcome> {
        candidates
            .into_iter()
            .map(|candidate| {
                acb_debug!(
                    "candidate name={} type={} size={:?} last_modified={}",
                    candidate.name,
                    candidate.media_type,
                    candidate.size,
                    candidate.last_modified.to_rfc3339()
                );
                self.add(candidate)
            })
            .collect()
    }

    pub fn remove(&mut self, id: FileId) -> Option<SelectedFile> {
        let removed = self.files.remove(&id);
        if removed.is_none() {
            acb_debug!("remove ignored, no file with id {}", id);
        }
        removed
    }

    /// Registered files in registration order, detached from the registry.
    pub fn snapshot(&self) -> Vec<SelectedFile> {
        self.files.values().cloned().collect()
    }

    pub fn get(&self, id: FileId) -> Option<&SelectedFile> {
        self.files.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn can_run(&self) -> bool {
        !self.files.is_empty()
    }

    fn is_selected(&self, candidate: &CandidateFile) -> bool {
        self.files.values().any(|selected| {
            selected.name == candidate.name && selected.last_modified == candidate.last_modified
        })
    }
}

fn is_tabular(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or(media_type).trim();
    essence.eq_ignore_ascii_case(TABULAR_MEDIA_TYPE)
}
