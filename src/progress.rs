//! Progress-callback trait for briefing-run events.
//!
//! Inject an [`Arc<dyn BriefingProgress>`] via
//! [`crate::config::BriefingConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its stages. The callback approach is
//! the least-invasive integration point: the CLI forwards events to an
//! indicatif bar, a host application could forward them to a channel or a
//! log record, and the library never learns how the host communicates.
//!
//! The run is strictly sequential, so callbacks fire in order; the trait is
//! still `Send + Sync` because the config that carries it is shared across
//! the async runtime.

use std::sync::Arc;

/// Called by the briefing pipeline as it processes each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BriefingProgress: Send + Sync {
    /// Called once before any network activity, after the credential check.
    ///
    /// # Arguments
    /// * `total_resources` — number of chart resources that will be fetched
    fn on_run_start(&self, total_resources: usize) {
        let _ = total_resources;
    }

    /// Called just before a resource is fetched.
    ///
    /// # Arguments
    /// * `index` — 1-indexed resource position
    /// * `total` — total resources in the run
    /// * `name`  — last path segment of the resource URL
    fn on_resource_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a resource has been fetched and decoded.
    ///
    /// # Arguments
    /// * `width` / `height` — dimensions of the decoded image
    fn on_resource_complete(&self, index: usize, total: usize, width: u32, height: u32) {
        let _ = (index, total, width, height);
    }

    /// Called just before the generation request is sent.
    fn on_generation_start(&self) {}

    /// Called once after the summary has been received.
    ///
    /// # Arguments
    /// * `summary_len` — byte length of the generation result
    fn on_run_complete(&self, summary_len: usize) {
        let _ = summary_len;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgress;

impl BriefingProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::BriefingConfig`].
pub type ProgressCallback = Arc<dyn BriefingProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingProgress {
        starts: AtomicUsize,
        completes: AtomicUsize,
        generation_started: AtomicUsize,
        summary_len: AtomicUsize,
    }

    impl BriefingProgress for TrackingProgress {
        fn on_resource_start(&self, _index: usize, _total: usize, _name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_resource_complete(&self, _index: usize, _total: usize, _w: u32, _h: u32) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_generation_start(&self) {
            self.generation_started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, summary_len: usize) {
            self.summary_len.store(summary_len, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgress;
        cb.on_run_start(5);
        cb.on_resource_start(1, 5, "QPF_ChFcstPrecip_6_06.png");
        cb.on_resource_complete(1, 5, 1097, 1570);
        cb.on_generation_start();
        cb.on_run_complete(180);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingProgress {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            generation_started: AtomicUsize::new(0),
            summary_len: AtomicUsize::new(0),
        };

        tracker.on_run_start(2);
        tracker.on_resource_start(1, 2, "a.png");
        tracker.on_resource_complete(1, 2, 10, 10);
        tracker.on_resource_start(2, 2, "b.pdf");
        tracker.on_resource_complete(2, 2, 20, 20);
        tracker.on_generation_start();
        tracker.on_run_complete(42);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.generation_started.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.summary_len.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BriefingProgress> = Arc::new(NoopProgress);
        cb.on_run_start(5);
        cb.on_resource_start(1, 5, "chart.png");
    }
}
