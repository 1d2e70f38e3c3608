//! Periodic, change-driven publishing of canvas contents.
//!
//! A [`Monitor`] polls an element accessor on a fixed interval and publishes a
//! whiteboard update only when the serialized element list differs from the
//! last one it published.

use models::WhiteboardElement;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_millis(1000);

/// Sink for whiteboard updates. Implemented by
/// [`CanvasClient`](crate::connection::CanvasClient).
pub trait WhiteboardPublisher: Send + Sync + 'static {
    fn publish_whiteboard(
        &self,
        component_id: &str,
        elements: Vec<WhiteboardElement>,
        screenshot: Option<String>,
    );
}

type ElementSource = dyn Fn() -> Vec<WhiteboardElement> + Send + Sync;
type ScreenshotSource = dyn Fn() -> Option<String> + Send + Sync;

struct MonitorInner<P> {
    publisher: P,
    elements: Box<ElementSource>,
    screenshot: Box<ScreenshotSource>,
    /// Serialized element list of the last change-driven publish.
    baseline: Mutex<Option<String>>,
}

impl<P: WhiteboardPublisher> MonitorInner<P> {
    fn tick(&self, component_id: &str) -> bool {
        let elements = (self.elements)();
        let snapshot = match serde_json::to_string(&elements) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping monitor tick, elements failed to serialize: {e}");
                return false;
            }
        };

        {
            let mut baseline = self.baseline.lock().unwrap_or_else(PoisonError::into_inner);
            if baseline.as_deref() == Some(snapshot.as_str()) {
                return false;
            }
            *baseline = Some(snapshot);
        }

        debug!(
            "Canvas changed for {component_id}, publishing {} elements",
            elements.len()
        );
        self.publisher
            .publish_whiteboard(component_id, elements, (self.screenshot)());
        true
    }

    fn publish_now(&self, component_id: &str) {
        let elements = (self.elements)();
        self.publisher
            .publish_whiteboard(component_id, elements, (self.screenshot)());
    }
}

/// Change detector that keeps a component's canvas in sync with the worker.
///
/// At most one polling task runs per monitor; it is aborted on
/// [`stop`](Self::stop), on a new [`start`](Self::start), and on drop.
pub struct Monitor<P: WhiteboardPublisher> {
    inner: Arc<MonitorInner<P>>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl<P: WhiteboardPublisher> Monitor<P> {
    pub fn new(
        publisher: P,
        elements: impl Fn() -> Vec<WhiteboardElement> + Send + Sync + 'static,
        screenshot: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                publisher,
                elements: Box::new(elements),
                screenshot: Box::new(screenshot),
                baseline: Mutex::new(None),
            }),
            interval: DEFAULT_MONITOR_INTERVAL,
            task: None,
        }
    }

    /// Polling period for subsequent `start` calls. Zero is ignored.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Ignoring zero monitor interval");
        } else {
            self.interval = interval;
        }
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin polling for `component_id`, replacing any running poll.
    ///
    /// The first tick fires one interval after this call. Must be called from
    /// within a Tokio runtime.
    pub fn start(&mut self, component_id: impl Into<String>) {
        self.stop();

        let component_id = component_id.into();
        let inner = Arc::clone(&self.inner);
        let period = self.interval;
        info!(
            "Monitoring canvas for {component_id} every {}ms",
            period.as_millis()
        );

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                inner.tick(&component_id);
            }
        }));
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Canvas monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Publish the current elements now, regardless of change. The change
    /// baseline is left as it was.
    pub fn force_update(&self, component_id: &str) {
        self.inner.publish_now(component_id);
    }

    /// One poll, as the background task runs it. Returns whether it published.
    pub fn poll_once(&self, component_id: &str) -> bool {
        self.inner.tick(component_id)
    }
}

impl<P: WhiteboardPublisher> Drop for Monitor<P> {
    fn drop(&mut self) {
        self.stop();
    }
}
