use std::collections::HashMap;

use acb_logging::acb_debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BarrierError {
    #[error("cannot create a barrier for an empty batch")]
    EmptyBatch,
}

/// Filenames and decoded contents of a fully loaded batch, index-correlated
/// and in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedBatch {
    pub filenames: Vec<String>,
    pub contents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarrierEvent {
    /// The load was recorded; `remaining` loads are still outstanding.
    Pending { remaining: usize },
    /// The last outstanding load arrived. Returned once per barrier.
    Completed(LoadedBatch),
    /// Unknown or already loaded name, or the barrier already completed.
    Ignored,
}

/// Count-down join over the loads of one frozen batch.
///
/// Pending names form a multiset: two selected files may share a name, and
/// each occurrence is released by its own load. The pending set only shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionBarrier {
    pending: HashMap<String, usize>,
    remaining: usize,
    loaded_names: Vec<String>,
    loaded_content: Vec<String>,
    completed: bool,
}

impl IngestionBarrier {
    pub fn new<I, S>(filenames: I) -> Result<Self, BarrierError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pending: HashMap<String, usize> = HashMap::new();
        let mut remaining = 0;
        for name in filenames {
            *pending.entry(name.into()).or_default() += 1;
            remaining += 1;
        }
        if remaining == 0 {
            return Err(BarrierError::EmptyBatch);
        }

        Ok(Self {
            pending,
            remaining,
            loaded_names: Vec::with_capacity(remaining),
            loaded_content: Vec::with_capacity(remaining),
            completed: false,
        })
    }

    /// Records that `name` finished loading with the decoded `content`.
    pub fn notify_loaded(&mut self, name: &str, content: impl Into<String>) -> BarrierEvent {
        if self.completed {
            acb_debug!("barrier already completed, ignoring load of {}", name);
            return BarrierEvent::Ignored;
        }
        let Some(count) = self.pending.get_mut(name) else {
            acb_debug!("{} is not pending in this batch, ignoring", name);
            return BarrierEvent::Ignored;
        };

        *count -= 1;
        if *count == 0 {
            self.pending.remove(name);
        }
        self.remaining -= 1;
        self.loaded_names.push(name.to_owned());
        self.loaded_content.push(content.into());

        if self.remaining > 0 {
            return BarrierEvent::Pending {
                remaining: self.remaining,
            };
        }

        self.completed = true;
        BarrierEvent::Completed(LoadedBatch {
            filenames: self.loaded_names.clone(),
            contents: self.loaded_content.clone(),
        })
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    pub fn pending_count(&self) -> usize {
        self.remaining
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_names.len()
    }

    pub fn total(&self) -> usize {
        self.remaining + self.loaded_names.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn loaded_names(&self) -> &[String] {
        &self.loaded_names
    }

    pub fn loaded_content(&self) -> &[String] {
        &self.loaded_content
    }
}
