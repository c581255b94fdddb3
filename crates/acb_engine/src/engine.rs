use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use acb_core::{BatchId, SelectedFile};
use acb_logging::{acb_error, acb_warn};

use crate::invoke::{ComputeEngine, ComputeError, ComputeInvoker};
use crate::load::FileLoader;
use crate::source::{FileSource, LocalFileSource, SourceSettings};
use crate::{EngineEvent, FailureKind, LoadError};

enum EngineCommand {
    Load {
        batch_id: BatchId,
        file: SelectedFile,
    },
    Compute {
        batch_id: BatchId,
        filenames: Vec<String>,
        contents: Vec<String>,
    },
}

/// Command side of the engine. Work runs on a tokio runtime owned by a
/// dedicated thread; results come back through [`EngineEvents`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine, in completion order.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SourceSettings, engine: Arc<dyn ComputeEngine>) -> (Self, EngineEvents) {
        let source = Arc::new(LocalFileSource::new(&settings));
        Self::with_source(source, settings, engine)
    }

    pub fn with_source(
        source: Arc<dyn FileSource>,
        settings: SourceSettings,
        engine: Arc<dyn ComputeEngine>,
    ) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let loader = FileLoader::new(source, settings);
        let invoker = ComputeInvoker::new(engine);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    acb_error!("failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let loader = loader.clone();
                let invoker = invoker.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&loader, &invoker, command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn load(&self, batch_id: BatchId, file: SelectedFile) {
        let _ = self.cmd_tx.send(EngineCommand::Load { batch_id, file });
    }

    pub fn compute(&self, batch_id: BatchId, filenames: Vec<String>, contents: Vec<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Compute {
            batch_id,
            filenames,
            contents,
        });
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    loader: &FileLoader,
    invoker: &ComputeInvoker,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    // Each branch runs its work in its own task so a panic still yields an event.
    match command {
        EngineCommand::Load { batch_id, file } => {
            let task_loader = loader.clone();
            let task_file = file.clone();
            let result = tokio::spawn(async move { task_loader.load(&task_file).await })
                .await
                .unwrap_or_else(|join_err| {
                    Err(LoadError::new(FailureKind::Aborted, join_err.to_string()))
                });
            if let Err(err) = &result {
                acb_warn!("batch {}: loading {} failed: {}", batch_id, file.name, err);
            }
            let _ = event_tx.send(EngineEvent::FileLoaded {
                batch_id,
                name: file.name,
                result,
            });
        }
        EngineCommand::Compute {
            batch_id,
            filenames,
            contents,
        } => {
            let invoker = invoker.clone();
            let result = tokio::spawn(async move { invoker.invoke(&filenames, &contents).await })
                .await
                .unwrap_or_else(|join_err| {
                    acb_error!("batch {}: engine task aborted: {}", batch_id, join_err);
                    Err(ComputeError::Engine(join_err.to_string()))
                });
            let _ = event_tx.send(EngineEvent::ComputeCompleted { batch_id, result });
        }
    }
}
