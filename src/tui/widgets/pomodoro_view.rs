use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::pomodoro::{Pomodoro, PomodoroMode};
use crate::tui::widgets::color::Palette;
use crate::utils::format_time;

pub fn render_pomodoro_view(f: &mut Frame, area: Rect, state: &Pomodoro, focused: bool, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Pomodoro")
        .border_style(palette.border(focused));
    let inner = block.inner(area);
    f.render_widget(block.style(palette.base()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(mode_selector(state.mode(), palette)).alignment(Alignment::Center),
        rows[0],
    );

    let clock = Span::styled(
        format_time(state.time_left()),
        palette.accent().add_modifier(Modifier::BOLD),
    );
    f.render_widget(Paragraph::new(Line::from(clock)).alignment(Alignment::Center), rows[2]);

    let percent = state.progress().clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .gauge_style(palette.accent())
        .ratio(percent / 100.0)
        .label(format!("{:.0}%", percent));
    f.render_widget(gauge, rows[3]);

    let status = if state.is_active() {
        "Running. Space to pause."
    } else if state.time_left() == 0 {
        "Done. r to reset."
    } else {
        "Paused. Space to start."
    };
    f.render_widget(
        Paragraph::new(Span::styled(status, palette.muted())).alignment(Alignment::Center),
        rows[4],
    );
}

fn mode_selector(active: PomodoroMode, palette: &Palette) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, mode) in PomodoroMode::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        let label = format!("{} {}", i + 1, mode.label());
        let style = if mode == active {
            palette.highlight()
        } else {
            palette.base()
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}
