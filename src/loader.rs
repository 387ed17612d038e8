//! Collection loading from the mock or remote source.
//!
//! At most one load per collection is in flight. Loads can be aborted, which
//! puts the collection back into the state it had before the load started.

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::SessionManager;
use crate::store::{Batch, Dataset};

/// Where collections come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Built-in sample records after a fixed delay.
    Mock { delay: Duration },
    Remote(ApiClient),
}

impl DataSource {
    pub fn from_config(config: &AppConfig, session: SessionManager) -> Result<Self> {
        if config.api.use_mock {
            info!("Using mock data source ({} ms delay)", config.mock.load_delay_ms);
            Ok(Self::Mock {
                delay: Duration::from_millis(config.mock.load_delay_ms),
            })
        } else {
            info!("Using remote data source at {}", config.api.base_url);
            Ok(Self::Remote(ApiClient::new(&config.api, session)?))
        }
    }

    pub fn client(&self) -> Option<&ApiClient> {
        match self {
            Self::Remote(client) => Some(client),
            Self::Mock { .. } => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.client().is_some()
    }

    pub async fn load(&self, dataset: Dataset) -> Result<Batch> {
        match self {
            Self::Mock { delay } => {
                tokio::time::sleep(*delay).await;
                Ok(Batch::seeded(dataset))
            }
            Self::Remote(client) => client.fetch(dataset).await,
        }
    }
}

/// Load state of one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Identifies one started load. Results carry it back so a result from an
/// earlier, cancelled load cannot settle a newer one.
pub type Generation = u64;

struct InFlight {
    generation: Generation,
    handle: Option<AbortHandle>,
    previous: LoadState,
}

/// Per-collection load bookkeeping.
#[derive(Default)]
pub struct LoadTracker {
    states: HashMap<Dataset, LoadState>,
    in_flight: HashMap<Dataset, InFlight>,
    next_generation: Generation,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, dataset: Dataset) -> LoadState {
        self.states.get(&dataset).cloned().unwrap_or_default()
    }

    pub fn is_loading(&self, dataset: Dataset) -> bool {
        self.in_flight.contains_key(&dataset)
    }

    pub fn any_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// True while any of `datasets` is loading.
    pub fn is_loading_any(&self, datasets: impl IntoIterator<Item = Dataset>) -> bool {
        datasets.into_iter().any(|d| self.is_loading(d))
    }

    /// Mark a load as started. Returns `None` when one is already running.
    pub fn begin(&mut self, dataset: Dataset) -> Option<Generation> {
        if self.is_loading(dataset) {
            debug!("Load of {} already in flight", dataset.name());
            return None;
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        let previous = self.states.insert(dataset, LoadState::Loading).unwrap_or_default();
        self.in_flight.insert(
            dataset,
            InFlight {
                generation,
                handle: None,
                previous,
            },
        );
        Some(generation)
    }

    /// Remember the task so it can be aborted.
    pub fn attach(&mut self, dataset: Dataset, handle: AbortHandle) {
        if let Some(entry) = self.in_flight.get_mut(&dataset) {
            entry.handle = Some(handle);
        }
    }

    /// Record a finished load. Returns false for results of cancelled or
    /// superseded loads, which must be discarded.
    pub fn finish(
        &mut self,
        dataset: Dataset,
        generation: Generation,
        outcome: std::result::Result<(), String>,
    ) -> bool {
        let current = self.in_flight.get(&dataset).map(|entry| entry.generation);
        if current != Some(generation) {
            debug!("Discarding stale result for {} (generation {})", dataset.name(), generation);
            return false;
        }
        self.in_flight.remove(&dataset);
        let state = match outcome {
            Ok(()) => LoadState::Loaded,
            Err(message) => LoadState::Failed(message),
        };
        self.states.insert(dataset, state);
        true
    }

    /// Abort an in-flight load. Returns true if one was running.
    pub fn cancel(&mut self, dataset: Dataset) -> bool {
        match self.in_flight.remove(&dataset) {
            Some(entry) => {
                if let Some(handle) = entry.handle {
                    handle.abort();
                }
                self.states.insert(dataset, entry.previous);
                info!("Cancelled load of {}", dataset.name());
                true
            }
            None => false,
        }
    }

    /// Abort every in-flight load not listed in `keep`.
    pub fn cancel_except(&mut self, keep: &[Dataset]) -> Vec<Dataset> {
        let stale: Vec<Dataset> = self
            .in_flight
            .keys()
            .copied()
            .filter(|d| !keep.contains(d))
            .collect();
        for dataset in &stale {
            self.cancel(*dataset);
        }
        stale
    }

    /// Forget loaded state so the next visit reloads.
    pub fn reset(&mut self) {
        for dataset in self.in_flight.keys().copied().collect::<Vec<_>>() {
            self.cancel(dataset);
        }
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_mock_source_returns_seed_after_delay() {
        let source = DataSource::Mock {
            delay: Duration::from_millis(800),
        };
        let started = tokio::time::Instant::now();
        let batch = source.load(Dataset::Providers).await.unwrap();
        assert_eq!(batch.dataset(), Dataset::Providers);
        assert_eq!(batch.len(), 4);
        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[test]
    fn test_second_begin_is_deduplicated() {
        let mut tracker = LoadTracker::new();
        let generation = tracker.begin(Dataset::Users).unwrap();
        assert_eq!(tracker.begin(Dataset::Users), None);
        assert_eq!(tracker.state(Dataset::Users), LoadState::Loading);

        assert!(tracker.finish(Dataset::Users, generation, Ok(())));
        assert_eq!(tracker.state(Dataset::Users), LoadState::Loaded);
        assert!(tracker.begin(Dataset::Users).is_some());
    }

    #[test]
    fn test_failure_is_distinct_from_loading() {
        let mut tracker = LoadTracker::new();
        let generation = tracker.begin(Dataset::Payments).unwrap();
        tracker.finish(Dataset::Payments, generation, Err("connection refused".to_string()));
        assert_eq!(tracker.state(Dataset::Payments), LoadState::Failed("connection refused".to_string()));
        assert!(!tracker.any_loading());
    }

    #[tokio::test]
    async fn test_cancel_aborts_task_and_restores_state() {
        let mut tracker = LoadTracker::new();
        let first = tracker.begin(Dataset::Roles).unwrap();
        tracker.finish(Dataset::Roles, first, Ok(()));

        let second = tracker.begin(Dataset::Roles).unwrap();
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        tracker.attach(Dataset::Roles, task.abort_handle());

        assert!(tracker.cancel(Dataset::Roles));
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(tracker.state(Dataset::Roles), LoadState::Loaded);

        // A result that raced the abort is discarded.
        assert!(!tracker.finish(Dataset::Roles, second, Ok(())));
    }

    #[test]
    fn test_result_of_cancelled_load_does_not_settle_reload() {
        let mut tracker = LoadTracker::new();
        let cancelled = tracker.begin(Dataset::Packages).unwrap();
        assert!(tracker.cancel(Dataset::Packages));
        let current = tracker.begin(Dataset::Packages).unwrap();
        assert_ne!(cancelled, current);

        assert!(!tracker.finish(Dataset::Packages, cancelled, Err("late failure".to_string())));
        assert!(tracker.is_loading(Dataset::Packages));
        assert_eq!(tracker.state(Dataset::Packages), LoadState::Loading);

        assert!(tracker.finish(Dataset::Packages, current, Ok(())));
        assert_eq!(tracker.state(Dataset::Packages), LoadState::Loaded);
    }

    #[test]
    fn test_is_loading_any_checks_every_listed_dataset() {
        let mut tracker = LoadTracker::new();
        tracker.begin(Dataset::Permissions);
        assert!(tracker.is_loading_any([Dataset::Roles, Dataset::Permissions]));
        assert!(!tracker.is_loading_any([Dataset::Roles]));
        assert!(!tracker.is_loading_any([]));
    }

    #[test]
    fn test_cancel_except_keeps_listed() {
        let mut tracker = LoadTracker::new();
        tracker.begin(Dataset::Tourists);
        tracker.begin(Dataset::Packages);
        tracker.begin(Dataset::Comments);

        let mut cancelled = tracker.cancel_except(&[Dataset::Packages]);
        cancelled.sort();
        assert_eq!(cancelled, vec![Dataset::Tourists, Dataset::Comments]);
        assert!(tracker.is_loading(Dataset::Packages));
        assert_eq!(tracker.state(Dataset::Tourists), LoadState::Idle);
    }
}
