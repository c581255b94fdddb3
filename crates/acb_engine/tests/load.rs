use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use acb_core::{FileHandle, SelectedFile};
use acb_engine::{
    FailureKind, FileLoader, FileSource, LoadError, LocalFileSource, SourceSettings,
    TransportPayload,
};
use chrono::Utc;
use tempfile::TempDir;

fn selected(name: &str, handle: FileHandle) -> SelectedFile {
    SelectedFile {
        id: 1,
        name: name.to_string(),
        media_type: "text/csv".to_string(),
        size: None,
        last_modified: Utc::now(),
        handle,
    }
}

fn local_loader(settings: SourceSettings) -> FileLoader {
    FileLoader::new(Arc::new(LocalFileSource::new(&settings)), settings)
}

struct DataUrlSource {
    urls: HashMap<FileHandle, String>,
}

#[async_trait::async_trait]
impl FileSource for DataUrlSource {
    async fn read(&self, handle: &FileHandle) -> Result<TransportPayload, LoadError> {
        let url = self.urls.get(handle).cloned().expect("known handle");
        Ok(TransportPayload::DataUrl(url))
    }
}

#[tokio::test]
async fn loads_local_csv() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trades.csv");
    fs::write(&path, "Security,Shares\nVFV,10\n").unwrap();

    let loader = local_loader(SourceSettings::default());
    let content = loader
        .load(&selected("trades.csv", FileHandle::new(&path)))
        .await
        .expect("load ok");
    assert_eq!(content, "Security,Shares\nVFV,10\n");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let loader = local_loader(SourceSettings::default());

    let err = loader
        .load(&selected("gone.csv", FileHandle::new(temp.path().join("gone.csv"))))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::NotFound);
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.csv");
    fs::write(&path, "0123456789A").unwrap();

    let settings = SourceSettings {
        max_bytes: 10,
        ..SourceSettings::default()
    };
    let err = local_loader(settings)
        .load(&selected("big.csv", FileHandle::new(&path)))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn non_csv_media_type_is_not_read() {
    let loader = local_loader(SourceSettings::default());
    let mut file = selected("notes.txt", FileHandle::new("/nonexistent/notes.txt"));
    file.media_type = "text/plain".to_string();

    let err = loader.load(&file).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedMediaType {
            media_type: "text/plain".to_string()
        }
    );
}

#[tokio::test]
async fn data_url_source_is_decoded() {
    let handle = FileHandle::new("dropped/a.csv");
    let source = DataUrlSource {
        urls: HashMap::from([(
            handle.clone(),
            "data:text/csv;base64,U2VjdXJpdHksU2hhcmVzClZGViwxMAo=".to_string(),
        )]),
    };
    let loader = FileLoader::new(Arc::new(source), SourceSettings::default());

    let content = loader.load(&selected("a.csv", handle)).await.unwrap();
    assert_eq!(content, "Security,Shares\nVFV,10\n");
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    let handle = FileHandle::new("dropped/b.csv");
    let source = DataUrlSource {
        urls: HashMap::from([(handle.clone(), "data:text/csv;base64,!!".to_string())]),
    };
    let loader = FileLoader::new(Arc::new(source), SourceSettings::default());

    let err = loader.load(&selected("b.csv", handle)).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}
