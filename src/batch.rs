//! Parallel fetch batches and the load state of a view.
//!
//! A view issues every fetch of its batch at once (`tokio::join!`), then hands
//! each result to a [`Settler`]. The settler decides, according to the view's
//! [`Settlement`] policy, whether a failed fetch degrades to an empty default
//! or fails the whole batch. [`View`] owns the `loading -> {loaded, failed}`
//! state machine and the in-flight task, so a torn-down view never receives
//! a late result.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{Error, Fallback, Locale, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// Any failed fetch fails the batch.
    AllOrNothing,
    /// Failed fetches degrade to empty defaults; only a batch where every
    /// fetch failed is an error.
    BestEffort,
}

pub struct Settler {
    policy: Settlement,
    attempted: usize,
    failures: Vec<(&'static str, Error)>,
    degraded: Vec<&'static str>,
}

impl Settler {
    pub fn new(policy: Settlement) -> Self {
        Self {
            policy,
            attempted: 0,
            failures: Vec::new(),
            degraded: Vec::new(),
        }
    }

    /// Settle one fetch under the batch policy.
    pub fn take<T: Default>(&mut self, section: &'static str, result: Result<T>) -> T {
        self.attempted += 1;
        match result {
            Ok(value) => value,
            Err(e) => {
                if self.policy == Settlement::BestEffort {
                    tracing::warn!("Fetch for '{}' failed, showing empty section: {}", section, e);
                } else {
                    tracing::debug!("Fetch for '{}' failed: {}", section, e);
                }
                self.degraded.push(section);
                self.failures.push((section, e));
                T::default()
            }
        }
    }

    /// Settle a fetch that always degrades to its default, whatever the policy.
    pub fn take_guarded<T: Default>(&mut self, section: &'static str, result: Result<T>) -> T {
        self.attempted += 1;
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Fetch for '{}' failed, showing empty section: {}", section, e);
                self.degraded.push(section);
                T::default()
            }
        }
    }

    /// Close the batch. On success returns the sections that fell back to
    /// their empty default.
    pub fn finish(self) -> Result<Vec<&'static str>> {
        let every_fetch_failed = self.attempted > 0 && self.degraded.len() == self.attempted;

        let failed = match self.policy {
            Settlement::AllOrNothing => !self.failures.is_empty(),
            Settlement::BestEffort => every_fetch_failed && !self.failures.is_empty(),
        };

        if failed {
            let (section, err) = self
                .failures
                .into_iter()
                .next()
                .ok_or_else(|| Error::Transport("batch failed without an error".to_string()))?;
            tracing::debug!("Batch failed on '{}'", section);
            return Err(err);
        }

        Ok(self.degraded)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

struct Slot<T> {
    generation: u64,
    state: LoadState<T>,
}

/// The load lifecycle of one mounted view.
pub struct View<T> {
    slot: Arc<Mutex<Slot<T>>>,
    task: Option<JoinHandle<()>>,
    locale: Locale,
    fallback: Fallback,
}

impl<T: Clone + Send + 'static> View<T> {
    pub fn new(locale: Locale, fallback: Fallback) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                state: LoadState::Loading,
            })),
            task: None,
            locale,
            fallback,
        }
    }

    /// Abandon any in-flight batch and start `load`. The view is `Loading`
    /// until `load` settles.
    pub async fn refresh<F>(&mut self, load: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        let generation = {
            let mut slot = self.slot.lock().await;
            slot.generation += 1;
            slot.state = LoadState::Loading;
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let locale = self.locale;
        let fallback = self.fallback;

        self.task = Some(tokio::spawn(async move {
            let next = match load.await {
                Ok(value) => LoadState::Loaded(value),
                Err(e) => {
                    tracing::warn!("View load failed: {}", e);
                    LoadState::Failed(e.user_message(locale, &fallback))
                }
            };

            let mut slot = slot.lock().await;
            if slot.generation == generation {
                slot.state = next;
            } else {
                tracing::debug!("Discarding stale load result (generation {})", generation);
            }
        }));
    }

    pub async fn state(&self) -> LoadState<T> {
        self.slot.lock().await.state.clone()
    }

    /// Wait for the current batch to settle and return the resulting state.
    pub async fn settled(&mut self) -> LoadState<T> {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!("View task ended early: {}", e);
            }
        }
        self.state().await
    }

    /// Abort the in-flight batch; its result, if any, is discarded.
    pub async fn teardown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.slot.lock().await.generation += 1;
    }
}

impl<T> Drop for View<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
