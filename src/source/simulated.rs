//! Scripted location source for tests and the demo binary.

use std::sync::Mutex;

use chrono::Utc;

use super::{Fix, LocationSource, SourceStatus};

enum Behavior {
    /// Reports `Initializing` for the given number of polls, then `Running`.
    Ready { polls_until_ready: u32 },
    /// Reports `Initializing` for the given number of polls, then `Failed`.
    Fails { polls_until_failed: u32 },
    /// Never leaves `Initializing`.
    NeverReady,
}

struct Inner {
    started: bool,
    behavior: Behavior,
    fixes: Vec<Fix>,
    cursor: usize,
}

/// Location source that replays a scripted sequence of fixes. Each
/// `current_fix` call advances through the script and the final fix is
/// held once the script is exhausted.
pub struct SimulatedSource {
    enabled: bool,
    inner: Mutex<Inner>,
}

impl SimulatedSource {
    /// A source that becomes ready on the first status poll.
    pub fn ready(fixes: Vec<Fix>) -> Self {
        Self::with_behavior(Behavior::Ready { polls_until_ready: 0 }, fixes, true)
    }

    /// A source that needs `polls` status polls before reporting `Running`.
    pub fn ready_after(polls: u32, fixes: Vec<Fix>) -> Self {
        Self::with_behavior(Behavior::Ready { polls_until_ready: polls }, fixes, true)
    }

    /// A source the user has disabled on the device.
    pub fn disabled() -> Self {
        Self::with_behavior(Behavior::Ready { polls_until_ready: 0 }, Vec::new(), false)
    }

    /// A source that reports `Failed` after `polls` status polls.
    pub fn failing_after(polls: u32) -> Self {
        Self::with_behavior(Behavior::Fails { polls_until_failed: polls }, Vec::new(), true)
    }

    /// A source that stays `Initializing` forever.
    pub fn never_ready() -> Self {
        Self::with_behavior(Behavior::NeverReady, Vec::new(), true)
    }

    fn with_behavior(behavior: Behavior, fixes: Vec<Fix>, enabled: bool) -> Self {
        Self {
            enabled,
            inner: Mutex::new(Inner {
                started: false,
                behavior,
                fixes,
                cursor: 0,
            }),
        }
    }

    /// Append a fix to the script while the source is live.
    pub fn push_fix(&self, fix: Fix) {
        self.inner.lock().unwrap().fixes.push(fix);
    }
}

impl LocationSource for SimulatedSource {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn start(&self, _desired_accuracy_m: f64, _update_distance_m: f64) {
        self.inner.lock().unwrap().started = true;
    }

    fn stop(&self) {
        self.inner.lock().unwrap().started = false;
    }

    fn status(&self) -> SourceStatus {
        let mut inner = self.inner.lock().unwrap();
        if !inner.started {
            return SourceStatus::Initializing;
        }
        match &mut inner.behavior {
            Behavior::Ready { polls_until_ready } => {
                if *polls_until_ready == 0 {
                    SourceStatus::Running
                } else {
                    *polls_until_ready -= 1;
                    SourceStatus::Initializing
                }
            }
            Behavior::Fails { polls_until_failed } => {
                if *polls_until_failed == 0 {
                    SourceStatus::Failed
                } else {
                    *polls_until_failed -= 1;
                    SourceStatus::Initializing
                }
            }
            Behavior::NeverReady => SourceStatus::Initializing,
        }
    }

    fn current_fix(&self) -> Fix {
        let mut inner = self.inner.lock().unwrap();
        if inner.cursor < inner.fixes.len() {
            let fix = inner.fixes[inner.cursor];
            inner.cursor += 1;
            return fix;
        }
        // Script exhausted: keep reporting the last known position.
        inner.fixes.last().copied().unwrap_or(Fix {
            latitude: 0.0,
            longitude: 0.0,
            altitude: None,
            observed_at: Utc::now(),
        })
    }
}
