use serde::{Deserialize, Serialize};

use crate::barrier::IngestionBarrier;
use crate::model::ComputeOutcome;
use crate::render::ResultRenderer;
use crate::selection::SelectionRegistry;
use crate::view_model::{AppViewModel, BatchProgress, FileRowView};

pub type BatchId = u64;

/// Which of the two mutually exclusive outputs is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    Text,
    #[default]
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActiveBatch {
    pub(crate) id: BatchId,
    pub(crate) barrier: IngestionBarrier,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    registry: SelectionRegistry,
    active: Option<ActiveBatch>,
    last_batch_id: BatchId,
    display_mode: DisplayMode,
    text_output: String,
    error_text: Option<String>,
    renderer: ResultRenderer,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_mode(display_mode: DisplayMode) -> Self {
        Self {
            display_mode,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            files: self
                .registry
                .iter()
                .map(|file| FileRowView {
                    id: file.id,
                    name: file.name.clone(),
                    last_modified: file.last_modified,
                })
                .collect(),
            run_enabled: self.registry.can_run(),
            display_mode: self.display_mode,
            text_output: self.text_output.clone(),
            error_text: self.error_text.clone(),
            document: self.renderer.document().clone(),
            batch: self.active.as_ref().map(|active| BatchProgress {
                batch_id: active.id,
                loaded: active.barrier.loaded_count(),
                total: active.barrier.total(),
                computing: active.barrier.is_complete(),
            }),
            dirty: self.dirty,
        }
    }

    pub fn registry(&self) -> &SelectionRegistry {
        &self.registry
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn last_batch_id(&self) -> BatchId {
        self.last_batch_id
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn registry_mut(&mut self) -> &mut SelectionRegistry {
        &mut self.registry
    }

    /// Installs a fresh barrier, superseding any batch still in flight.
    pub(crate) fn begin_batch(&mut self, barrier: IngestionBarrier) -> BatchId {
        self.last_batch_id += 1;
        self.active = Some(ActiveBatch {
            id: self.last_batch_id,
            barrier,
        });
        self.mark_dirty();
        self.last_batch_id
    }

    pub(crate) fn active_barrier_mut(&mut self, batch_id: BatchId) -> Option<&mut IngestionBarrier> {
        self.active
            .as_mut()
            .filter(|active| active.id == batch_id)
            .map(|active| &mut active.barrier)
    }

    pub(crate) fn is_latest_batch(&self, batch_id: BatchId) -> bool {
        batch_id == self.last_batch_id
    }

    pub(crate) fn clear_active_batch(&mut self) {
        if self.active.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_outcome(&mut self, outcome: ComputeOutcome) {
        self.text_output = outcome.text_output;
        self.error_text = outcome.error;
        self.renderer.render(outcome.model_output.as_ref());
        self.mark_dirty();
    }

    pub(crate) fn set_display_mode(&mut self, display_mode: DisplayMode) {
        if self.display_mode != display_mode {
            self.display_mode = display_mode;
            self.mark_dirty();
        }
    }
}
