//! Visibility-driven fetch scheduling for the photo wall.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::domain::entities::{CacheStats, ScrollState, SlotContent, VisibilityWindow};
use crate::domain::ports::{ImageCachePort, ImageFetcherPort, PhotoWallView};

use super::fetch_worker::{FetchCompletion, FetchOutcome, FetchWorker};
use super::task_registry::TaskRegistry;

/// Decides what to fetch, skip or cancel as the grid scrolls.
///
/// Owns the memory cache and the task registry; both are only touched
/// through `&mut self`, so all cache and registry mutation happens on the
/// task that owns the scheduler. Workers report back over a channel which
/// the owner drains with [`Self::drain_completions`] or
/// [`Self::process_next`].
pub struct PhotoWallScheduler<V: PhotoWallView> {
    view: V,
    cache: Box<dyn ImageCachePort>,
    registry: TaskRegistry,
    worker: FetchWorker,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    window: VisibilityWindow,
    scroll_state: ScrollState,
    bootstrap_pending: bool,
    shut_down: bool,
}

impl<V: PhotoWallView> std::fmt::Debug for PhotoWallScheduler<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoWallScheduler")
            .field("cache", &self.cache.stats())
            .field("window", &self.window)
            .field("scroll_state", &self.scroll_state)
            .field("bootstrap_pending", &self.bootstrap_pending)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl<V: PhotoWallView> PhotoWallScheduler<V> {
    #[must_use]
    pub fn new(
        view: V,
        fetcher: Arc<dyn ImageFetcherPort>,
        cache: impl ImageCachePort + 'static,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        info!(
            capacity_bytes = cache.capacity_bytes(),
            "Photo wall scheduler created"
        );
        Self {
            view,
            cache: Box::new(cache),
            registry: TaskRegistry::new(),
            worker: FetchWorker::new(fetcher, completion_tx),
            completion_rx,
            window: VisibilityWindow::default(),
            scroll_state: ScrollState::Idle,
            bootstrap_pending: true,
            shut_down: false,
        }
    }

    /// Records the visible window.
    ///
    /// The first non-empty window also starts loading right away: the grid
    /// has not scrolled yet, so no idle signal will arrive to trigger it.
    /// This happens once per scheduler.
    pub fn notify_visible_range(&mut self, first: usize, count: usize) {
        if self.shut_down {
            return;
        }

        self.window = VisibilityWindow::new(first, count);
        trace!(window = %self.window, "Visible range changed");

        if self.bootstrap_pending && count > 0 {
            self.bootstrap_pending = false;
            info!(window = %self.window, "Initial load");
            self.load_window();
        }
    }

    /// Reacts to a scroll state change: load when idle, cancel otherwise.
    pub fn notify_scroll_state(&mut self, idle: bool) {
        if self.shut_down {
            return;
        }

        self.scroll_state = ScrollState::from_idle(idle);
        if idle {
            self.load_window();
        } else {
            let cancelled = self.registry.cancel_all();
            debug!(cancelled, "Scrolling, abandoning in-flight fetches");
        }
    }

    /// Returns what the slot at `index` should show when it is bound.
    ///
    /// Never starts a fetch; loading is driven by visibility only.
    pub fn bind_slot(&mut self, index: usize) -> SlotContent {
        let Some(key) = self.view.resource_key_for_index(index) else {
            return SlotContent::Empty;
        };
        match self.cache.get(&key) {
            Some(image) => SlotContent::Image(key, image),
            None => SlotContent::Placeholder(key),
        }
    }

    /// Shows cached images in the window and starts fetches for the rest.
    /// Returns how many fetches were started.
    fn load_window(&mut self) -> usize {
        let mut started = 0;
        for index in self.window.indices() {
            let Some(key) = self.view.resource_key_for_index(index) else {
                continue;
            };

            if let Some(image) = self.cache.get(&key) {
                self.view.on_image_ready(&key, &image);
            } else if !self.registry.is_running(&key) {
                let worker = self.worker.clone();
                self.registry
                    .start(key, move |id, key, cancel| worker.run(id, key, cancel));
                started += 1;
            }
        }

        debug!(
            window = %self.window,
            started,
            running = self.registry.running_count(),
            "Loaded visible window"
        );
        started
    }

    /// Applies one worker result.
    ///
    /// Images from tasks that were cancelled or already unregistered are
    /// dropped without touching the cache or the view. Returns true if the
    /// image was delivered.
    pub fn handle_completion(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion {
            task_id,
            key,
            outcome,
        } = completion;

        let live = self.registry.is_live(task_id) && !self.shut_down;
        self.registry.remove(task_id);

        match outcome {
            FetchOutcome::Loaded(image) if live => {
                self.cache.put(key.clone(), image.clone());
                let shown = self.cache.peek(&key).cloned().unwrap_or(image);
                self.view.on_image_ready(&key, &shown);
                true
            }
            FetchOutcome::Loaded(_) => {
                debug!(task = %task_id, key = %key, "Discarding result of cancelled fetch");
                false
            }
            FetchOutcome::Failed(e) => {
                debug!(
                    task = %task_id,
                    key = %key,
                    error = %e,
                    "Fetch failed, slot keeps placeholder"
                );
                false
            }
            FetchOutcome::Cancelled => {
                trace!(task = %task_id, key = %key, "Fetch wound down after cancel");
                false
            }
        }
    }

    /// Applies every completion already queued, without waiting.
    /// Returns how many were processed.
    pub fn drain_completions(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.handle_completion(completion);
            processed += 1;
        }
        processed
    }

    /// Waits for the next completion and applies it.
    /// Returns true if it delivered an image.
    pub async fn process_next(&mut self) -> bool {
        match self.completion_rx.recv().await {
            Some(completion) => self.handle_completion(completion),
            None => false,
        }
    }

    /// Cancels all outstanding work. Later notifications are ignored and
    /// late results are discarded.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        let cancelled = self.registry.cancel_all();
        info!(cancelled, "Photo wall scheduler shut down");
    }

    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    #[must_use]
    pub const fn window(&self) -> VisibilityWindow {
        self.window
    }

    #[must_use]
    pub const fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    /// Number of fetches that are running and not cancelled.
    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.registry.running_count()
    }

    /// Tasks still registered, including cancelled ones winding down.
    #[must_use]
    pub fn outstanding_tasks(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub const fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    #[must_use]
    pub fn cache(&self) -> &dyn ImageCachePort {
        self.cache.as_ref()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }
}

impl<V: PhotoWallView> Drop for PhotoWallScheduler<V> {
    fn drop(&mut self) {
        self.registry.cancel_all();
    }
}
