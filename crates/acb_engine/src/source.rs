use std::io;

use acb_core::{FileHandle, TABULAR_MEDIA_TYPE};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tokio_util::io::ReaderStream;

use crate::{FailureKind, LoadError};

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub max_bytes: u64,
    pub allowed_media_types: Vec<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            max_bytes: 20 * 1024 * 1024,
            allowed_media_types: vec![TABULAR_MEDIA_TYPE.to_string()],
        }
    }
}

impl SourceSettings {
    pub fn is_media_type_allowed(&self, media_type: &str) -> bool {
        let essence = media_type.split(';').next().unwrap_or(media_type).trim();
        self.allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}

/// File content as delivered by a source, before decoding to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportPayload {
    Bytes {
        bytes: Bytes,
        content_type: Option<String>,
    },
    /// `data:<media type>;base64,<payload>`, as produced by browser file readers.
    DataUrl(String),
}

#[async_trait::async_trait]
pub trait FileSource: Send + Sync {
    async fn read(&self, handle: &FileHandle) -> Result<TransportPayload, LoadError>;
}

/// Reads files from the local filesystem, streaming with a size cap.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    max_bytes: u64,
}

impl LocalFileSource {
    pub fn new(settings: &SourceSettings) -> Self {
        Self {
            max_bytes: settings.max_bytes,
        }
    }

    fn too_large(&self, actual: u64) -> LoadError {
        LoadError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            "file too large",
        )
    }
}

#[async_trait::async_trait]
impl FileSource for LocalFileSource {
    async fn read(&self, handle: &FileHandle) -> Result<TransportPayload, LoadError> {
        let file = tokio::fs::File::open(handle.path())
            .await
            .map_err(map_io_error)?;
        let declared_len = file.metadata().await.map_err(map_io_error)?.len();
        if declared_len > self.max_bytes {
            return Err(self.too_large(declared_len));
        }

        let mut bytes = BytesMut::with_capacity(declared_len as usize);
        let mut stream = ReaderStream::new(file);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_io_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            // The file may grow between the metadata call and the read.
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(TransportPayload::Bytes {
            bytes: bytes.freeze(),
            content_type: None,
        })
    }
}

fn map_io_error(err: io::Error) -> LoadError {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => FailureKind::NotFound,
        _ => FailureKind::Io,
    };
    LoadError::new(kind, err.to_string())
}
