use std::sync::Arc;

use acb_core::SelectedFile;
use acb_logging::acb_debug;

use crate::decode::decode_payload;
use crate::source::{FileSource, SourceSettings};
use crate::{FailureKind, LoadError};

/// Reads one selected file through a [`FileSource`] and decodes it to text.
#[derive(Clone)]
pub struct FileLoader {
    source: Arc<dyn FileSource>,
    settings: SourceSettings,
}

impl FileLoader {
    pub fn new(source: Arc<dyn FileSource>, settings: SourceSettings) -> Self {
        Self { source, settings }
    }

    pub async fn load(&self, file: &SelectedFile) -> Result<String, LoadError> {
        if !self.settings.is_media_type_allowed(&file.media_type) {
            return Err(LoadError::new(
                FailureKind::UnsupportedMediaType {
                    media_type: file.media_type.clone(),
                },
                format!("{} is not a csv file", file.name),
            ));
        }

        let payload = self.source.read(&file.handle).await?;
        let decoded = decode_payload(payload)
            .map_err(|err| LoadError::new(FailureKind::Decode, err.to_string()))?;
        acb_debug!(
            "decoded {} as {} ({} chars)",
            file.name,
            decoded.encoding_label,
            decoded.text.len()
        );
        Ok(decoded.text)
    }
}
