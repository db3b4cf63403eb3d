//! Progress-callback trait for per-page query events.
//!
//! Inject an [`Arc<dyn QueryProgressCallback>`] via
//! [`crate::config::QueryConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline works through each page. The callback
//! approach keeps the library ignorant of how the host application
//! communicates: callers can forward events to a terminal progress bar, a
//! WebSocket, or a log sink without the core knowing any of it.

use std::sync::Arc;

/// Called by the query pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed strictly sequentially, so
/// events for a given query arrive in page order from a single task; the
/// `Send + Sync` bound exists because the callback is shared via `Arc`
/// across async await points.
pub trait QueryProgressCallback: Send + Sync {
    /// Called once after normalization, before any model call.
    fn on_query_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the model request is sent for a page.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page's model call produced text.
    ///
    /// `answer_len` is the byte length of the generated text.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, answer_len: usize) {
        let _ = (page_num, total_pages, answer_len);
    }

    /// Called when a page's model call produced an error report.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all pages have been attempted.
    fn on_query_complete(&self, total_pages: usize, answered_count: usize) {
        let _ = (total_pages, answered_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl QueryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::QueryConfig`].
pub type ProgressCallback = Arc<dyn QueryProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        answered: AtomicUsize,
    }

    impl QueryProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _answer_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_query_complete(&self, _total_pages: usize, answered_count: usize) {
            self.answered.store(answered_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_query_start(3);
        cb.on_page_start(1, 3);
        cb.on_page_complete(1, 3, 42);
        cb.on_page_error(2, 3, "some error");
        cb.on_query_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            answered: AtomicUsize::new(0),
        };

        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 100);
        tracker.on_page_start(2, 2);
        tracker.on_page_error(2, 2, "model call failed: boom");
        tracker.on_query_complete(2, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.answered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn QueryProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_query_start(10);
        cb.on_page_complete(1, 10, 512);
    }
}
