use acb_logging::{acb_debug, acb_error, acb_info, acb_warn};

use crate::{AddOutcome, AppState, BarrierEvent, BatchId, DisplayMode, Effect, IngestionBarrier, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(candidates) => {
            let outcomes = state.registry_mut().add_all(candidates);
            if outcomes
                .iter()
                .any(|outcome| matches!(outcome, AddOutcome::Added(_)))
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RemoveFileClicked(file_id) => {
            if let Some(file) = state.registry_mut().remove(file_id) {
                acb_info!("Removed file {} ({})", file_id, file.name);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RunClicked => start_batch(&mut state),
        Msg::FileLoaded {
            batch_id,
            name,
            content,
        } => apply_loaded(&mut state, batch_id, &name, content),
        Msg::FileLoadFailed {
            batch_id,
            name,
            error,
        } => {
            if state.active_barrier_mut(batch_id).is_some() {
                // No retry: the batch stays pending until a new run replaces it.
                acb_warn!("batch {}: failed to load {}: {}", batch_id, name, error);
            } else {
                acb_debug!("stale load failure for {} in batch {}", name, batch_id);
            }
            Vec::new()
        }
        Msg::ComputeFinished { batch_id, outcome } => {
            if state.is_latest_batch(batch_id) {
                acb_info!(
                    "batch {}: compute response received{}",
                    batch_id,
                    if outcome.error.is_some() { " with error" } else { "" }
                );
                state.clear_active_batch();
                state.apply_outcome(outcome);
            } else {
                acb_info!("dropping compute outcome of superseded batch {}", batch_id);
            }
            Vec::new()
        }
        Msg::ComputeFailed { batch_id, message } => {
            acb_error!("batch {}: compute failed: {}", batch_id, message);
            if state.is_latest_batch(batch_id) {
                state.clear_active_batch();
            }
            Vec::new()
        }
        Msg::ShowText => {
            state.set_display_mode(DisplayMode::Text);
            Vec::new()
        }
        Msg::ShowTable => {
            state.set_display_mode(DisplayMode::Table);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_batch(state: &mut AppState) -> Vec<Effect> {
    let files = state.registry().snapshot();
    let barrier = match IngestionBarrier::new(files.iter().map(|file| file.name.clone())) {
        Ok(barrier) => barrier,
        Err(err) => {
            acb_debug!("run ignored: {}", err);
            return Vec::new();
        }
    };

    let batch_id = state.begin_batch(barrier);
    acb_info!("batch {} started with {} file(s)", batch_id, files.len());
    files
        .into_iter()
        .map(|file| {
            acb_info!("Loading file: {}", file.name);
            Effect::LoadFile { batch_id, file }
        })
        .collect()
}

fn apply_loaded(state: &mut AppState, batch_id: BatchId, name: &str, content: String) -> Vec<Effect> {
    let event = match state.active_barrier_mut(batch_id) {
        Some(barrier) => barrier.notify_loaded(name, content),
        None => {
            acb_debug!("stale load of {} for batch {}", name, batch_id);
            return Vec::new();
        }
    };

    match event {
        BarrierEvent::Pending { remaining } => {
            acb_debug!("batch {}: loaded {}, {} pending", batch_id, name, remaining);
            state.mark_dirty();
            Vec::new()
        }
        BarrierEvent::Completed(batch) => {
            acb_info!("batch {}: all {} file(s) loaded", batch_id, batch.filenames.len());
            state.mark_dirty();
            vec![Effect::Compute {
                batch_id,
                filenames: batch.filenames,
                contents: batch.contents,
            }]
        }
        BarrierEvent::Ignored => Vec::new(),
    }
}
