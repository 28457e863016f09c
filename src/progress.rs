//! Stage progress events and the reporter stage code sends them through

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use tokio::sync::mpsc;

use crate::prefix::WineEnvironment;
use crate::wizard::Stage;

/// Event flowing from a stage worker to the front end
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// Progress of the active step in percent; `None` = indeterminate
    Fraction(Option<f32>),
    /// Human-readable status, shown one at a time by the status relay
    Status(String),
    /// Transient detail line (byte counters), latest value wins
    Detail(String),
    /// The prefix builder established a runtime environment
    PrefixReady(WineEnvironment),
    /// Stage worker returned, successful or not
    Finished(Stage),
}

/// Sender side of the stage event channel
///
/// Sends are best effort: once the receiver is gone (window closed) the
/// reporter logs a single warning and keeps the stage running silently.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<StageEvent>>,
    disabled: Arc<AtomicBool>,
    /// Band of the overall bar that 0..=100 from this reporter maps onto
    span: (f32, f32),
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<StageEvent>) -> Self {
        Self {
            tx: Some(tx),
            disabled: Arc::new(AtomicBool::new(false)),
            span: (0.0, 100.0),
        }
    }

    /// Reporter that only logs
    pub fn disabled() -> Self {
        Self {
            tx: None,
            disabled: Arc::new(AtomicBool::new(true)),
            span: (0.0, 100.0),
        }
    }

    /// Reporter for a nested step whose 0..=100 fills `start..=end` of this one
    pub fn scaled(&self, start: f32, end: f32) -> Self {
        let map = |p: f32| self.span.0 + (self.span.1 - self.span.0) * p / 100.0;
        Self {
            tx: self.tx.clone(),
            disabled: self.disabled.clone(),
            span: (map(start), map(end)),
        }
    }

    /// Set the progress bar and push a status message
    pub fn update(&self, percent: f32, message: impl Into<String>) {
        self.fraction(Some(percent));
        self.status(message);
    }

    pub fn fraction(&self, percent: Option<f32>) {
        let (start, end) = self.span;
        self.send(StageEvent::Fraction(
            percent.map(|p| start + (end - start) * p.clamp(0.0, 100.0) / 100.0),
        ));
    }

    pub fn status(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.send(StageEvent::Status(message));
    }

    pub fn detail(&self, message: impl Into<String>) {
        self.send(StageEvent::Detail(message.into()));
    }

    pub fn send(&self, event: StageEvent) {
        if self.disabled.load(Ordering::Relaxed) {
            return;
        }
        let Some(tx) = &self.tx else { return };
        if tx.send(event).is_err() {
            warn!("Progress channel closed, continuing without updates");
            self.disabled.store(true, Ordering::Relaxed);
        }
    }
}
