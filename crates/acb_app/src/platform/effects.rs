use std::sync::{mpsc, Arc};
use std::thread;

use acb_core::{Effect, Msg};
use acb_engine::{ComputeEngine, EngineEvent, EngineEvents, EngineHandle, SourceSettings};
use acb_logging::acb_info;

use super::app::AppEvent;

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: SourceSettings,
        compute: Arc<dyn ComputeEngine>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let (engine, events) = EngineHandle::new(settings, compute);
        spawn_event_loop(events, event_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadFile { batch_id, file } => {
                    acb_info!(
                        "LoadFile batch_id={} id={} name={} size={:?}",
                        batch_id,
                        file.id,
                        file.name,
                        file.size
                    );
                    self.engine.load(batch_id, file);
                }
                Effect::Compute {
                    batch_id,
                    filenames,
                    contents,
                } => {
                    acb_info!("Compute batch_id={} files={:?}", batch_id, filenames);
                    self.engine.compute(batch_id, filenames, contents);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if event_tx.send(AppEvent::Msg(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FileLoaded {
            batch_id,
            name,
            result,
        } => match result {
            Ok(content) => Msg::FileLoaded {
                batch_id,
                name,
                content,
            },
            Err(err) => Msg::FileLoadFailed {
                batch_id,
                name,
                error: err.to_string(),
            },
        },
        EngineEvent::ComputeCompleted { batch_id, result } => match result {
            Ok(outcome) => Msg::ComputeFinished { batch_id, outcome },
            Err(err) => Msg::ComputeFailed {
                batch_id,
                message: err.to_string(),
            },
        },
    }
}
