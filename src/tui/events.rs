use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::pomodoro::DEFAULT_TITLE;
use crate::store::KeyValueStore;
use crate::tui::App;
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::render::render;

/// Longest wait for input; keeps the header clock and status timeout fresh
const MAX_POLL: Duration = Duration::from_millis(250);

/// Restores the terminal (raw mode, alternate screen, window title) even on panic
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, SetTitle(DEFAULT_TITLE))?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; drop is then a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen, SetTitle(DEFAULT_TITLE))?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, SetTitle(DEFAULT_TITLE));
        }
    }
}

pub fn run_event_loop<S: KeyValueStore + Clone>(mut app: App<S>) -> Result<(), TuiError> {
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let mut title = DEFAULT_TITLE.to_string();

    let result = (|| -> Result<(), TuiError> {
        loop {
            app.check_status_message_timeout();

            let due = app.timer.scheduler_mut().due_ticks(Instant::now());
            app.advance_timer(due);

            let window_title = app.window_title();
            if window_title != title {
                execute!(io::stdout(), SetTitle(&window_title))?;
                title = window_title;
            }

            terminal.draw(|f| {
                let area = f.area();
                let layout = Layout::calculate(
                    Rect::new(0, 0, area.width, area.height),
                    app.views.active().is_some(),
                );
                render(f, &mut app, &layout);
            })?;

            // The frame above shows the loading state; now do the slow part
            if app.is_loading() {
                if let Err(e) = app.run_pending() {
                    tracing::error!(error = %e, "deferred work failed");
                    app.set_status_message(format!("Error: {}", e));
                }
                continue;
            }

            let timeout = app
                .timer
                .scheduler()
                .time_until_next(Instant::now())
                .map_or(MAX_POLL, |until| until.min(MAX_POLL));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    // Windows reports both press and release
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Err(e) = app.handle_key(key) {
                        match e {
                            TuiError::StoreError(ref store_error) => {
                                tracing::error!(error = %store_error, "failed to persist change");
                                app.set_status_message(format!("Error: {}", store_error));
                            }
                            other => return Err(other),
                        }
                    }
                    if app.should_quit {
                        return Ok(());
                    }
                }
            }
        }
    })();

    // Stops the tick source before the terminal is handed back
    drop(app);
    terminal.show_cursor()?;
    guard.restore()?;
    result
}
