//! Batch Scheduler
//!
//! Two periodic jobs over the shared store: draining the add queue into a
//! staged selection update, and committing the staged update.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::domain::{DomainError, DomainResult};
use crate::repository::{ItemCatalog, MemoryCatalog, MemoryStore};

/// Default period of the add-queue drain
pub const DEFAULT_ADD_BATCH_INTERVAL: Duration = Duration::from_secs(10);
/// Default period of the selection commit
pub const DEFAULT_COMMIT_INTERVAL: Duration = Duration::from_secs(1);

/// Timer periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchIntervals {
    pub add_batch: Duration,
    pub commit: Duration,
}

impl Default for BatchIntervals {
    fn default() -> Self {
        Self {
            add_batch: DEFAULT_ADD_BATCH_INTERVAL,
            commit: DEFAULT_COMMIT_INTERVAL,
        }
    }
}

/// Work done on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    DrainAddQueue,
    CommitSelection,
}

impl Job {
    fn name(self) -> &'static str {
        match self {
            Job::DrainAddQueue => "add-batch",
            Job::CommitSelection => "commit",
        }
    }

    async fn run<C: ItemCatalog>(self, store: Arc<MemoryStore<C>>) {
        match self {
            Job::DrainAddQueue => {
                store.drain_add_queue().await;
            }
            Job::CommitSelection => {
                store.commit_selection().await;
            }
        }
    }
}

struct ArmedTimers {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

/// Owns the timer tasks; `start` arms them, `stop` disarms them
pub struct BatchScheduler<C = MemoryCatalog> {
    store: Arc<MemoryStore<C>>,
    intervals: BatchIntervals,
    timers: Mutex<Option<ArmedTimers>>,
}

impl<C: ItemCatalog + 'static> BatchScheduler<C> {
    pub fn new(store: Arc<MemoryStore<C>>, intervals: BatchIntervals) -> Self {
        Self {
            store,
            intervals,
            timers: Mutex::new(None),
        }
    }

    pub fn intervals(&self) -> BatchIntervals {
        self.intervals
    }

    pub fn is_running(&self) -> bool {
        self.timers.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Arm both timers. A second call while armed does nothing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut timers = match self.timers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if timers.is_some() {
            debug!("Batch timers already running");
            return;
        }

        let (shutdown, watcher) = watch::channel(false);
        let tasks = vec![
            spawn_timer(
                Job::DrainAddQueue,
                self.intervals.add_batch,
                self.store.clone(),
                watcher.clone(),
            ),
            spawn_timer(
                Job::CommitSelection,
                self.intervals.commit,
                self.store.clone(),
                watcher,
            ),
        ];
        *timers = Some(ArmedTimers { shutdown, tasks });

        info!(
            add_batch_ms = self.intervals.add_batch.as_millis() as u64,
            commit_ms = self.intervals.commit.as_millis() as u64,
            "Batch timers started"
        );
    }

    /// Disarm both timers and wait for them to exit.
    ///
    /// Safe to call repeatedly or before `start`. Once this returns no
    /// further drain or commit runs until the next `start`.
    pub async fn stop(&self) {
        let armed = match self.timers.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(armed) = armed else {
            return;
        };

        let _ = armed.shutdown.send(true);
        for task in armed.tasks {
            if let Err(e) = task.await {
                error!("Batch timer exited abnormally: {}", e);
            }
        }
        info!("Batch timers stopped");
    }
}

fn spawn_timer<C: ItemCatalog + 'static>(
    job: Job,
    period: Duration,
    store: Arc<MemoryStore<C>>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
            }
            if *shutdown.borrow() {
                break;
            }
            if let Err(e) = run_tick(job, store.clone()).await {
                error!(job = job.name(), "Tick failed: {}", e);
            }
        }
    })
}

/// Run one tick in its own task so a panic only costs that tick
async fn run_tick<C: ItemCatalog + 'static>(
    job: Job,
    store: Arc<MemoryStore<C>>,
) -> DomainResult<()> {
    tokio::spawn(job.run(store))
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))
}
