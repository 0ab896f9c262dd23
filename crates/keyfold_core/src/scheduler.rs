//! Serialized scheduling of compaction runs.
//!
//! Compaction work must not block callers, and concurrent runs must not
//! fan out unboundedly. The scheduler owns a single worker task, spawned
//! on an injected runtime handle (no process-wide singleton), that drains
//! a bounded job queue; all runs - for the same or different topics - are
//! serialized relative to each other on that worker.

use crate::compaction::TwoPhaseCompactor;
use crate::error::{CoreError, CoreResult};
use keyfold_storage::LogId;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

struct CompactionJob {
    topic: String,
    reply: oneshot::Sender<CoreResult<LogId>>,
}

/// Runs compaction jobs one at a time on a dedicated worker task.
///
/// # Cancellation
///
/// Dropping a caller's `compact` future does not cancel an in-flight run;
/// the run completes on the worker and its result is discarded. If the
/// worker itself is stopped mid-run (runtime shutdown), the run's output
/// log is left unsealed and is never surfaced as a result.
pub struct CompactionScheduler {
    jobs: mpsc::Sender<CompactionJob>,
    worker: JoinHandle<()>,
}

impl CompactionScheduler {
    /// Spawns the worker task on the given runtime handle.
    ///
    /// The queue bound comes from the compactor's
    /// [`crate::CompactionConfig::max_pending_compactions`].
    #[must_use]
    pub fn spawn(compactor: TwoPhaseCompactor, handle: &Handle) -> Self {
        let capacity = compactor.config().max_pending_compactions.max(1);
        let (jobs, mut queue) = mpsc::channel::<CompactionJob>(capacity);

        let worker = handle.spawn(async move {
            while let Some(job) = queue.recv().await {
                let result = compactor.compact(&job.topic).await;
                if job.reply.send(result).is_err() {
                    debug!(topic = %job.topic, "compaction caller went away before completion");
                }
            }
        });

        Self { jobs, worker }
    }

    /// Submits a compaction job and awaits its result.
    ///
    /// Failure is always surfaced through the returned result, never as a
    /// silent empty outcome.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerBusy` if the job queue is full,
    /// `SchedulerStopped` if the worker is no longer running, or the
    /// run's own error otherwise.
    pub async fn compact(&self, topic: &str) -> CoreResult<LogId> {
        let (reply, receipt) = oneshot::channel();
        let job = CompactionJob {
            topic: topic.to_string(),
            reply,
        };

        self.jobs.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => CoreError::SchedulerBusy,
            TrySendError::Closed(_) => CoreError::SchedulerStopped,
        })?;

        receipt.await.map_err(|_| CoreError::SchedulerStopped)?
    }

    /// Returns whether the worker task has finished.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.worker.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompactionConfig;
    use crate::topic::{TopicClient, TopicDirectory};
    use async_trait::async_trait;
    use keyfold_storage::{InMemoryLogStore, LogStore};
    use std::sync::Arc;

    fn scheduler_over(config: CompactionConfig) -> (Arc<InMemoryLogStore>, Arc<TopicDirectory>, CompactionScheduler) {
        let store = Arc::new(InMemoryLogStore::new());
        let directory = Arc::new(TopicDirectory::new(
            Arc::clone(&store) as Arc<dyn LogStore>
        ));
        let compactor = TwoPhaseCompactor::new(
            Arc::clone(&store) as Arc<dyn LogStore>,
            Arc::clone(&directory) as Arc<dyn TopicClient>,
            config,
        );
        let scheduler = CompactionScheduler::spawn(compactor, &Handle::current());
        (store, directory, scheduler)
    }

    #[tokio::test]
    async fn compacts_through_the_worker() {
        let (store, directory, scheduler) = scheduler_over(CompactionConfig::default());

        directory.create_topic("t").await.unwrap();
        directory.publish("t", "a", b"A_1").await.unwrap();
        directory.publish("t", "a", b"A_2").await.unwrap();

        let output = scheduler.compact("t").await.unwrap();
        assert!(store.is_sealed(output).unwrap());
    }

    #[tokio::test]
    async fn errors_surface_through_the_future() {
        let (_store, directory, scheduler) = scheduler_over(CompactionConfig::default());
        directory.create_topic("empty").await.unwrap();

        let result = scheduler.compact("empty").await;
        assert!(matches!(result, Err(CoreError::EmptyTopic { .. })));
    }

    #[tokio::test]
    async fn concurrent_submissions_all_complete() {
        let (store, directory, scheduler) = scheduler_over(CompactionConfig::default());

        for name in ["x", "y", "z"] {
            directory.create_topic(name).await.unwrap();
            directory.publish(name, "k", name.as_bytes()).await.unwrap();
        }

        let (x, y, z) = tokio::join!(
            scheduler.compact("x"),
            scheduler.compact("y"),
            scheduler.compact("z"),
        );
        let (x, y, z) = (x.unwrap(), y.unwrap(), z.unwrap());

        // Serialized on one worker, each run produced its own sealed log.
        assert!(x != y && y != z && x != z);
        for log in [x, y, z] {
            assert!(store.is_sealed(log).unwrap());
        }
    }

    /// A topic client whose resolution never completes, pinning the
    /// worker on its current job.
    struct StalledTopics;

    #[async_trait]
    impl TopicClient for StalledTopics {
        async fn resolve(&self, _topic: &str) -> CoreResult<keyfold_storage::LogId> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn full_queue_rejects_submissions() {
        let store = Arc::new(InMemoryLogStore::new());
        let compactor = TwoPhaseCompactor::new(
            store as Arc<dyn LogStore>,
            Arc::new(StalledTopics),
            CompactionConfig::new().max_pending_compactions(1),
        );
        let scheduler = Arc::new(CompactionScheduler::spawn(compactor, &Handle::current()));

        // First job occupies the worker forever; second fills the queue.
        let s1 = Arc::clone(&scheduler);
        let _running = tokio::spawn(async move { s1.compact("a").await });
        tokio::task::yield_now().await;
        let s2 = Arc::clone(&scheduler);
        let _queued = tokio::spawn(async move { s2.compact("b").await });
        tokio::task::yield_now().await;

        let result = scheduler.compact("c").await;
        assert!(matches!(result, Err(CoreError::SchedulerBusy)));
    }

    #[tokio::test]
    async fn stopped_worker_rejects_submissions() {
        let (_store, directory, scheduler) = scheduler_over(CompactionConfig::default());
        directory.create_topic("t").await.unwrap();

        scheduler.worker.abort();
        tokio::task::yield_now().await;
        assert!(scheduler.is_stopped());

        let result = scheduler.compact("t").await;
        assert!(matches!(result, Err(CoreError::SchedulerStopped)));
    }
}
