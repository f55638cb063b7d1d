//! Single-slot debounce timer (spec §4.4). `rebuild()` arms (or re-arms) a
//! one-shot 1000ms window; `cancel()` clears it. `fire()` is meant to sit in
//! a `tokio::select!` branch alongside the watch stream — it never resolves
//! while unarmed, so it never wins a race it shouldn't.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep_until, Instant, Sleep};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

pub struct Debounce {
    window: Duration,
    armed: Option<Pin<Box<Sleep>>>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW)
    }

    /// Same scheduler, with a configurable window — used by tests so they
    /// don't have to wait a full second.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            armed: None,
        }
    }

    /// Arm, or restart, the one-shot timer.
    pub fn rebuild(&mut self) {
        self.armed = Some(Box::pin(sleep_until(Instant::now() + self.window)));
    }

    /// Clear an armed timer. Idempotent.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Await the armed timer firing. Pending forever while unarmed.
    pub async fn fire(&mut self) {
        match self.armed.as_mut() {
            Some(sleep) => sleep.as_mut().await,
            None => std::future::pending().await,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new()
    }
}
