//! Countdown state machine: Idle → Running → Paused/Completed → Idle.

/// Fixed focus budget: 25 minutes.
pub const FOCUS_BUDGET_SECS: u32 = 25 * 60;

const TICK_INTERVAL_MS: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Transitional: the interval ended and awaits logging.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Resumed,
    /// Already running (or completing); nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No tick source is active.
    Ignored,
    Ticked { remaining_secs: u32 },
    Completed,
}

/// Labels and enabled flags for the timer controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSurface {
    pub start_label: &'static str,
    pub start_enabled: bool,
    pub pause_enabled: bool,
}

/// Formats seconds as zero-padded `MM:SS`.
pub fn format_readout(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    state: TimerState,
    remaining_secs: u32,
    /// Deadline of the single active tick source, if any.
    next_tick_at_ms: Option<i64>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_secs: FOCUS_BUDGET_SECS,
            next_tick_at_ms: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn readout(&self) -> String {
        format_readout(self.remaining_secs)
    }

    pub fn has_tick_source(&self) -> bool {
        self.next_tick_at_ms.is_some()
    }

    pub fn controls(&self) -> ControlSurface {
        match self.state {
            TimerState::Idle => ControlSurface {
                start_label: "Start",
                start_enabled: true,
                pause_enabled: false,
            },
            TimerState::Running => ControlSurface {
                start_label: "Start",
                start_enabled: false,
                pause_enabled: true,
            },
            TimerState::Paused => ControlSurface {
                start_label: "Resume",
                start_enabled: true,
                pause_enabled: false,
            },
            TimerState::Completed => ControlSurface {
                start_label: "Start",
                start_enabled: false,
                pause_enabled: false,
            },
        }
    }

    /// Starts or resumes ticking; a second start while running is a no-op.
    pub fn start(&mut self, now_ms: i64) -> StartOutcome {
        let outcome = match self.state {
            TimerState::Idle => {
                if self.remaining_secs == 0 {
                    self.remaining_secs = FOCUS_BUDGET_SECS;
                }
                StartOutcome::Started
            }
            TimerState::Paused => StartOutcome::Resumed,
            TimerState::Running | TimerState::Completed => return StartOutcome::Ignored,
        };
        self.state = TimerState::Running;
        self.next_tick_at_ms = Some(now_ms + TICK_INTERVAL_MS);
        outcome
    }

    /// Stops ticking and keeps the remaining time. Returns whether it paused.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        self.next_tick_at_ms = None;
        true
    }

    /// Stops ticking and restores the full budget.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_secs = FOCUS_BUDGET_SECS;
        self.next_tick_at_ms = None;
    }

    /// Advances by exactly one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            self.next_tick_at_ms = None;
            return TickOutcome::Completed;
        }
        if let Some(deadline) = self.next_tick_at_ms.as_mut() {
            *deadline += TICK_INTERVAL_MS;
        }
        TickOutcome::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Fires every tick whose deadline has passed, stopping at completion.
    pub fn poll(&mut self, now_ms: i64) -> TickOutcome {
        let mut last = TickOutcome::Ignored;
        while let Some(deadline) = self.next_tick_at_ms {
            if deadline > now_ms {
                break;
            }
            last = self.tick();
            if last == TickOutcome::Completed {
                break;
            }
        }
        last
    }

    /// Leaves `Completed` for `Idle` with a fresh budget.
    pub fn finish(&mut self) {
        if self.state == TimerState::Completed {
            self.reset();
        }
    }
}
