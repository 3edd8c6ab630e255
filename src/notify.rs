use crate::pomodoro::PomodoroMode;
use notify_rust::{Notification, Urgency};
use std::io::Write;

/// Side effect fired when a Pomodoro countdown reaches zero
pub trait CompletionNotifier {
    fn notify_complete(&self, mode: PomodoroMode);
}

/// Terminal bell plus an optional desktop notification
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    pub desktop: bool,
}

impl DesktopNotifier {
    pub fn new(desktop: bool) -> Self {
        Self { desktop }
    }
}

impl CompletionNotifier for DesktopNotifier {
    fn notify_complete(&self, mode: PomodoroMode) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();

        if !self.desktop {
            return;
        }
        let body = match mode {
            PomodoroMode::Work => "Focus session complete. Time for a break.",
            PomodoroMode::ShortBreak | PomodoroMode::LongBreak => "Break is over. Back to it.",
        };
        if let Err(e) = Notification::new()
            .summary("Startpage timer")
            .body(body)
            .appname("startpage")
            .urgency(Urgency::Normal)
            .show()
        {
            tracing::warn!(error = %e, "desktop notification failed");
        }
    }
}
