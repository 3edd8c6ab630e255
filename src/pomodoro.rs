//! Pomodoro countdown.
//!
//! [`Pomodoro`] is the bare state machine and is driven by calling
//! [`Pomodoro::tick`] directly. [`PomodoroTimer`] wraps it with a
//! [`Scheduler`] and a [`CompletionNotifier`] and keeps the scheduler running
//! exactly while the countdown is active with time left.

use crate::notify::CompletionNotifier;
use crate::utils::format_time;
use std::time::{Duration, Instant};

pub const DEFAULT_TITLE: &str = "Startpage";
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PomodoroMode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub const ALL: [PomodoroMode; 3] = [
        PomodoroMode::Work,
        PomodoroMode::ShortBreak,
        PomodoroMode::LongBreak,
    ];

    pub fn total_seconds(self) -> u32 {
        match self {
            PomodoroMode::Work => 25 * 60,
            PomodoroMode::ShortBreak => 5 * 60,
            PomodoroMode::LongBreak => 15 * 60,
        }
    }

    /// Label used in the timer panel's mode selector
    pub fn label(self) -> &'static str {
        match self {
            PomodoroMode::Work => "Focus",
            PomodoroMode::ShortBreak => "Short Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }

    /// Shorter label used in the terminal title
    pub fn title_label(self) -> &'static str {
        match self {
            PomodoroMode::Work => "Focus",
            PomodoroMode::ShortBreak => "Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running, nothing changed
    Idle,
    Counting,
    /// Reached zero on this tick
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pomodoro {
    mode: PomodoroMode,
    time_left: u32,
    is_active: bool,
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}

impl Pomodoro {
    pub fn new() -> Self {
        Self {
            mode: PomodoroMode::Work,
            time_left: PomodoroMode::Work.total_seconds(),
            is_active: false,
        }
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Elapsed share of the current mode, 0.0..=100.0
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.mode.total_seconds());
        (total - f64::from(self.time_left)) / total * 100.0
    }

    /// Whether a 1 Hz tick source should be running for this state
    pub fn wants_ticks(&self) -> bool {
        self.is_active && self.time_left > 0
    }

    pub fn toggle(&mut self) {
        if self.is_active {
            self.is_active = false;
        } else if self.time_left > 0 {
            self.is_active = true;
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.wants_ticks() {
            return TickOutcome::Idle;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.is_active = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Counting
        }
    }

    pub fn reset(&mut self) {
        self.is_active = false;
        self.time_left = self.mode.total_seconds();
    }

    /// Switch mode, discarding any countdown in progress
    pub fn change_mode(&mut self, mode: PomodoroMode) {
        self.mode = mode;
        self.is_active = false;
        self.time_left = mode.total_seconds();
    }

    /// Window/terminal title reflecting the running countdown
    pub fn status_title(&self) -> String {
        if self.is_active {
            format!("{} - {}", format_time(self.time_left), self.mode.title_label())
        } else {
            DEFAULT_TITLE.to_string()
        }
    }
}

/// Repeating 1-second tick source owned by a [`PomodoroTimer`]
pub trait Scheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Tick source for a polling event loop.
///
/// Keeps the deadline of the next tick; [`IntervalScheduler::due_ticks`]
/// reports how many whole intervals have elapsed since the last poll.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    next_tick: Option<Instant>,
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
        }
    }

    pub fn start_at(&mut self, now: Instant) {
        self.next_tick = Some(now + self.interval);
    }

    /// Number of ticks that fell due at or before `now`
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while let Some(deadline) = self.next_tick {
            if deadline > now {
                break;
            }
            due += 1;
            self.next_tick = Some(deadline + self.interval);
        }
        due
    }

    /// Time until the next tick, for sizing the event poll timeout
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self) {
        if self.next_tick.is_none() {
            self.start_at(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.next_tick = None;
    }

    fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }
}

/// State machine plus its tick source and completion side effect
pub struct PomodoroTimer<S: Scheduler, N: CompletionNotifier> {
    state: Pomodoro,
    scheduler: S,
    notifier: N,
}

impl<S: Scheduler, N: CompletionNotifier> PomodoroTimer<S, N> {
    pub fn new(scheduler: S, notifier: N) -> Self {
        Self {
            state: Pomodoro::new(),
            scheduler,
            notifier,
        }
    }

    pub fn state(&self) -> &Pomodoro {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn toggle(&mut self) {
        self.state.toggle();
        self.sync_scheduler();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.sync_scheduler();
    }

    pub fn change_mode(&mut self, mode: PomodoroMode) {
        self.state.change_mode(mode);
        self.sync_scheduler();
    }

    /// Advance one second; called by the tick source
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.state.tick();
        if outcome == TickOutcome::Completed {
            tracing::info!(mode = ?self.state.mode(), "pomodoro finished");
            self.notifier.notify_complete(self.state.mode());
        }
        self.sync_scheduler();
        outcome
    }

    /// Run `count` ticks, stopping early once the countdown is no longer active
    pub fn advance(&mut self, count: u32) -> TickOutcome {
        let mut last = TickOutcome::Idle;
        for _ in 0..count {
            last = self.tick();
            if last != TickOutcome::Counting {
                break;
            }
        }
        last
    }

    fn sync_scheduler(&mut self) {
        match (self.state.wants_ticks(), self.scheduler.is_running()) {
            (true, false) => self.scheduler.start(),
            (false, true) => self.scheduler.stop(),
            _ => {}
        }
    }
}

impl<S: Scheduler, N: CompletionNotifier> Drop for PomodoroTimer<S, N> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
