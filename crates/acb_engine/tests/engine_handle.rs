use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use acb_core::{FileHandle, SelectedFile};
use acb_engine::{
    ComputeEngine, ComputeError, EngineEvent, EngineEvents, EngineHandle, EngineResponse,
    EngineResult, FailureKind, FileSource, LoadError, SourceSettings, TransportPayload,
};
use bytes::Bytes;
use chrono::Utc;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Serves in-memory files, each after its own delay.
struct DelayedSource {
    files: HashMap<FileHandle, (Duration, &'static str)>,
}

#[async_trait::async_trait]
impl FileSource for DelayedSource {
    async fn read(&self, handle: &FileHandle) -> Result<TransportPayload, LoadError> {
        let (delay, content) = self.files[handle];
        tokio::time::sleep(delay).await;
        Ok(TransportPayload::Bytes {
            bytes: Bytes::from_static(content.as_bytes()),
            content_type: Some("text/csv; charset=utf-8".to_string()),
        })
    }
}

struct PanickingSource;

#[async_trait::async_trait]
impl FileSource for PanickingSource {
    async fn read(&self, _handle: &FileHandle) -> Result<TransportPayload, LoadError> {
        panic!("source bug");
    }
}

struct EchoEngine;

#[async_trait::async_trait]
impl ComputeEngine for EchoEngine {
    async fn compute(
        &self,
        filenames: &[String],
        contents: &[String],
    ) -> Result<EngineResponse, ComputeError> {
        Ok(EngineResponse {
            result: EngineResult {
                text_output: format!("{}|{}", filenames.join(","), contents.join(",")),
                model_output: None,
            },
            error: None,
        })
    }
}

struct PanickingEngine;

#[async_trait::async_trait]
impl ComputeEngine for PanickingEngine {
    async fn compute(
        &self,
        _filenames: &[String],
        _contents: &[String],
    ) -> Result<EngineResponse, ComputeError> {
        panic!("engine bug");
    }
}

fn selected(name: &str) -> SelectedFile {
    SelectedFile {
        id: 1,
        name: name.to_string(),
        media_type: "text/csv".to_string(),
        size: None,
        last_modified: Utc::now(),
        handle: FileHandle::new(name),
    }
}

fn start(engine: Arc<dyn ComputeEngine>) -> (EngineHandle, EngineEvents) {
    let source = DelayedSource {
        files: HashMap::from([
            (FileHandle::new("a.csv"), (Duration::from_millis(200), "A")),
            (FileHandle::new("b.csv"), (Duration::from_millis(10), "B")),
        ]),
    };
    EngineHandle::with_source(Arc::new(source), SourceSettings::default(), engine)
}

#[test]
fn loads_report_in_completion_order() {
    let (engine, events) = start(Arc::new(EchoEngine));
    engine.load(7, selected("a.csv"));
    engine.load(7, selected("b.csv"));

    let mut arrived = Vec::new();
    for _ in 0..2 {
        match events.recv_timeout(TIMEOUT).expect("load event") {
            EngineEvent::FileLoaded {
                batch_id,
                name,
                result,
            } => {
                assert_eq!(batch_id, 7);
                arrived.push((name, result.expect("loaded")));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        arrived,
        vec![
            ("b.csv".to_string(), "B".to_string()),
            ("a.csv".to_string(), "A".to_string())
        ]
    );
}

#[test]
fn compute_result_is_reported_for_its_batch() {
    let (engine, events) = start(Arc::new(EchoEngine));
    engine.compute(3, vec!["b.csv".into(), "a.csv".into()], vec!["B".into(), "A".into()]);

    match events.recv_timeout(TIMEOUT).expect("compute event") {
        EngineEvent::ComputeCompleted { batch_id, result } => {
            assert_eq!(batch_id, 3);
            assert_eq!(result.expect("outcome").text_output, "b.csv,a.csv|B,A");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn engine_panic_becomes_a_failure_event() {
    let (engine, events) = start(Arc::new(PanickingEngine));
    engine.compute(1, vec!["a.csv".into()], vec!["A".into()]);

    match events.recv_timeout(TIMEOUT).expect("compute event") {
        EngineEvent::ComputeCompleted { batch_id, result } => {
            assert_eq!(batch_id, 1);
            assert!(matches!(result, Err(ComputeError::Engine(_))));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(events.try_recv().is_none());
}

#[test]
fn source_panic_becomes_a_failed_load() {
    let (engine, events) = EngineHandle::with_source(
        Arc::new(PanickingSource),
        SourceSettings::default(),
        Arc::new(EchoEngine),
    );
    engine.load(4, selected("a.csv"));

    match events.recv_timeout(TIMEOUT).expect("load event") {
        EngineEvent::FileLoaded {
            batch_id,
            name,
            result,
        } => {
            assert_eq!(batch_id, 4);
            assert_eq!(name, "a.csv");
            assert_eq!(result.expect_err("aborted").kind, FailureKind::Aborted);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
