//! Status Relay and busy indicator
//!
//! Both are small state machines ticked from the front end's event loop
//! with the current instant, so they hold no timers of their own.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Minimum time a status message stays visible
pub const STATUS_DWELL: Duration = Duration::from_millis(1500);

/// Busy indicator colour flip period
pub const BLINK_INTERVAL: Duration = Duration::from_millis(750);

const INITIAL_STATUS: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Nothing queued, last message stays on screen without a timer
    Idle,
    /// One message shown, dwell timer running
    Displaying,
    /// Dwell timer running and at least one message waiting behind it
    Pending,
}

/// FIFO of status messages shown one at a time for [`STATUS_DWELL`] each
#[derive(Debug)]
pub struct StatusRelay {
    queue: VecDeque<String>,
    current: String,
    shown_at: Option<Instant>,
}

impl Default for StatusRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRelay {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            current: INITIAL_STATUS.to_string(),
            shown_at: None,
        }
    }

    /// Queue `message`; shown immediately if nothing is on display
    pub fn push(&mut self, message: impl Into<String>, now: Instant) {
        self.queue.push_back(message.into());
        if self.shown_at.is_none() {
            self.show_next(now);
        }
    }

    /// Advance past an expired dwell. Returns true when the text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(shown_at) = self.shown_at else {
            return false;
        };
        if now.duration_since(shown_at) < STATUS_DWELL {
            return false;
        }
        if self.queue.is_empty() {
            self.shown_at = None;
            false
        } else {
            self.show_next(now)
        }
    }

    fn show_next(&mut self, now: Instant) -> bool {
        match self.queue.pop_front() {
            Some(message) => {
                self.current = message;
                self.shown_at = Some(now);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn state(&self) -> RelayState {
        match (self.shown_at, self.queue.is_empty()) {
            (None, _) => RelayState::Idle,
            (Some(_), true) => RelayState::Displaying,
            (Some(_), false) => RelayState::Pending,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// When the current dwell expires, if one is running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.shown_at.map(|at| at + STATUS_DWELL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyColor {
    Red,
    Green,
}

/// "--- Working ---" label alternating red/green while a stage runs
#[derive(Debug)]
pub struct BusyIndicator {
    active: bool,
    color: BusyColor,
    toggled_at: Instant,
}

impl BusyIndicator {
    pub fn new(now: Instant) -> Self {
        Self {
            active: false,
            color: BusyColor::Green,
            toggled_at: now,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.active = true;
        self.color = BusyColor::Red;
        self.toggled_at = now;
    }

    /// Back to the steady green "Please select:" state
    pub fn stop(&mut self) {
        self.active = false;
        self.color = BusyColor::Green;
    }

    pub fn tick(&mut self, now: Instant) {
        if self.active && now.duration_since(self.toggled_at) >= BLINK_INTERVAL {
            self.color = match self.color {
                BusyColor::Red => BusyColor::Green,
                BusyColor::Green => BusyColor::Red,
            };
            self.toggled_at = now;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> BusyColor {
        self.color
    }

    pub fn label(&self) -> &'static str {
        if self.active {
            "--- Working ---"
        } else {
            "Please select:"
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.then(|| self.toggled_at + BLINK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn burst_is_shown_in_order_each_for_full_dwell() {
        let start = Instant::now();
        let mut relay = StatusRelay::new();
        assert_eq!(relay.current(), "Ready");
        assert_eq!(relay.state(), RelayState::Idle);

        relay.push("M1", start);
        relay.push("M2", start + Duration::from_millis(10));
        relay.push("M3", start + Duration::from_millis(20));
        assert_eq!(relay.state(), RelayState::Pending);

        // Simulate a redraw loop, recording when each message appears
        let mut seen = vec![(relay.current().to_string(), start)];
        let mut now = start;
        while relay.state() != RelayState::Idle {
            now += TICK;
            if relay.tick(now) {
                seen.push((relay.current().to_string(), now));
            }
        }

        let texts: Vec<_> = seen.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, ["M1", "M2", "M3"]);
        for pair in seen.windows(2) {
            assert!(pair[1].1.duration_since(pair[0].1) >= STATUS_DWELL);
        }
        // Last message keeps showing after the relay goes idle
        assert!(now.duration_since(seen[2].1) >= STATUS_DWELL);
        assert_eq!(relay.current(), "M3");
    }

    #[test]
    fn idle_push_is_immediate() {
        let start = Instant::now();
        let mut relay = StatusRelay::new();
        relay.push("first", start);
        assert!(!relay.tick(start + STATUS_DWELL));
        assert_eq!(relay.state(), RelayState::Idle);

        let later = start + Duration::from_secs(10);
        relay.push("second", later);
        assert_eq!(relay.current(), "second");
        assert_eq!(relay.state(), RelayState::Displaying);
        assert_eq!(relay.next_deadline(), Some(later + STATUS_DWELL));
    }

    #[test]
    fn busy_indicator_blinks_then_settles_green() {
        let start = Instant::now();
        let mut busy = BusyIndicator::new(start);
        assert_eq!(busy.label(), "Please select:");
        assert_eq!(busy.next_deadline(), None);

        busy.start(start);
        assert_eq!(busy.label(), "--- Working ---");
        assert_eq!(busy.color(), BusyColor::Red);

        busy.tick(start + Duration::from_millis(500));
        assert_eq!(busy.color(), BusyColor::Red);
        busy.tick(start + BLINK_INTERVAL);
        assert_eq!(busy.color(), BusyColor::Green);
        busy.tick(start + BLINK_INTERVAL * 2);
        assert_eq!(busy.color(), BusyColor::Red);

        busy.stop();
        assert_eq!(busy.color(), BusyColor::Green);
        busy.tick(start + BLINK_INTERVAL * 3);
        assert_eq!(busy.color(), BusyColor::Green);
        assert!(!busy.is_active());
    }
}
