use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use acb_core::{CandidateFile, FileHandle, TABULAR_MEDIA_TYPE};
use acb_logging::acb_warn;
use chrono::{DateTime, Utc};

/// Builds candidates for the given paths, skipping (and logging) unreadable ones.
pub(crate) fn candidates_from_paths(paths: &[PathBuf]) -> Vec<CandidateFile> {
    paths
        .iter()
        .filter_map(|path| match candidate_from_path(path) {
            Ok(candidate) => Some(candidate),
            Err(err) => {
                acb_warn!("Cannot select {:?}: {}", path, err);
                None
            }
        })
        .collect()
}

pub(crate) fn candidate_from_path(path: &Path) -> io::Result<CandidateFile> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    Ok(CandidateFile {
        name,
        media_type: media_type_for(path).to_string(),
        size: Some(metadata.len()),
        last_modified: DateTime::<Utc>::from(modified),
        handle: FileHandle::new(path),
    })
}

fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => TABULAR_MEDIA_TYPE,
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
