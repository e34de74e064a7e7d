//! One fetch from start to reported outcome.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::CancelFlag;
use crate::domain::entities::{CachedImage, ResourceKey};
use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetcherPort;

use super::task_registry::TaskId;

/// How a fetch task ended.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Downloaded and decoded.
    Loaded(CachedImage),
    /// Finished without an image.
    Failed(FetchError),
    /// Observed its cancel flag and stopped early.
    Cancelled,
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Message sent back to the owning task when a fetch ends.
#[derive(Debug, Clone)]
pub struct FetchCompletion {
    /// Task that produced this result.
    pub task_id: TaskId,
    /// Resource the task fetched.
    pub key: ResourceKey,
    /// What happened.
    pub outcome: FetchOutcome,
}

/// Runs fetches on worker tasks and reports completions over a channel.
///
/// The worker never touches the cache; the owner applies results after
/// checking the task is still live.
#[derive(Clone)]
pub struct FetchWorker {
    fetcher: Arc<dyn ImageFetcherPort>,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
}

impl FetchWorker {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ImageFetcherPort>,
        completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    ) -> Self {
        Self {
            fetcher,
            completion_tx,
        }
    }

    /// Fetches `key`, then reports exactly one completion for `task_id`.
    pub async fn run(self, task_id: TaskId, key: ResourceKey, cancel: CancelFlag) {
        let outcome = self.execute(&key, &cancel).await;

        let completion = FetchCompletion {
            task_id,
            key,
            outcome,
        };
        if self.completion_tx.send(completion).is_err() {
            debug!(task = %task_id, "Completion receiver dropped");
        }
    }

    async fn execute(&self, key: &ResourceKey, cancel: &CancelFlag) -> FetchOutcome {
        if cancel.is_cancelled() {
            debug!(key = %key, "Fetch cancelled before start");
            return FetchOutcome::Cancelled;
        }

        match self.fetcher.fetch(key, cancel).await {
            Ok(_) if cancel.is_cancelled() => {
                debug!(key = %key, "Fetch cancelled after download, dropping image");
                FetchOutcome::Cancelled
            }
            Ok(image) => FetchOutcome::Loaded(image),
            Err(FetchError::Cancelled) => {
                debug!(key = %key, "Fetch cancelled");
                FetchOutcome::Cancelled
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to load image");
                FetchOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockImageFetcher;

    fn worker(fetcher: Arc<MockImageFetcher>) -> (FetchWorker, mpsc::UnboundedReceiver<FetchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FetchWorker::new(fetcher, tx), rx)
    }

    #[tokio::test]
    async fn test_successful_fetch_reports_image() {
        let fetcher = Arc::new(MockImageFetcher::new().with_size("a", 64));
        let (worker, mut rx) = worker(fetcher);

        worker.run(TaskId::from_raw(7), ResourceKey::new("a"), CancelFlag::new()).await;

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.task_id, TaskId::from_raw(7));
        assert_eq!(completion.key, ResourceKey::new("a"));
        match completion.outcome {
            FetchOutcome::Loaded(image) => assert_eq!(image.byte_size(), 64),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_fetches() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let (worker, mut rx) = worker(fetcher.clone());
        let cancel = CancelFlag::new();
        cancel.cancel();

        worker.run(TaskId::from_raw(0), ResourceKey::new("a"), cancel).await;

        assert!(rx.recv().await.unwrap().outcome.is_cancelled());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_fetch_drops_image() {
        let fetcher = Arc::new(MockImageFetcher::held().ignoring_cancel());
        let (worker, mut rx) = worker(fetcher.clone());
        let cancel = CancelFlag::new();

        let handle = tokio::spawn(worker.run(TaskId::from_raw(1), ResourceKey::new("a"), cancel.clone()));
        while fetcher.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        cancel.cancel();
        fetcher.release();
        handle.await.unwrap();

        assert!(rx.recv().await.unwrap().outcome.is_cancelled());
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_retried() {
        let fetcher = Arc::new(
            MockImageFetcher::new().with_error("a", FetchError::decode("a", "truncated")),
        );
        let (worker, mut rx) = worker(fetcher.clone());

        worker.run(TaskId::from_raw(2), ResourceKey::new("a"), CancelFlag::new()).await;

        let completion = rx.recv().await.unwrap();
        assert!(matches!(
            completion.outcome,
            FetchOutcome::Failed(FetchError::DecodeFailure { .. })
        ));
        assert_eq!(fetcher.call_count("a"), 1);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_not_an_error() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let (worker, rx) = worker(fetcher);
        drop(rx);

        worker.run(TaskId::from_raw(3), ResourceKey::new("a"), CancelFlag::new()).await;
    }
}
