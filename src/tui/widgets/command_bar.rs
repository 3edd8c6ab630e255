use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::BackgroundStatus;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::input::TextInput;

const PLACEHOLDER: &str = "Search the web, open a panel (todo, /notes) or +b <url>";

/// Date and time on the left, today's background on the right
pub fn render_header(f: &mut Frame, area: Rect, background: &BackgroundStatus, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(area);

    let now = Local::now().format("%a %b %e  %H:%M").to_string();
    f.render_widget(Paragraph::new(now).style(palette.accent()), columns[0]);

    let background_text = background_label(background);
    f.render_widget(
        Paragraph::new(background_text)
            .style(palette.muted())
            .alignment(Alignment::Right),
        columns[1],
    );
}

pub fn background_label(background: &BackgroundStatus) -> String {
    match background {
        BackgroundStatus::Loading => "Loading background...".to_string(),
        BackgroundStatus::Ready(url) => format!("Background: {}", url),
        BackgroundStatus::Unavailable => "No background".to_string(),
    }
}

pub fn render_command_bar(
    f: &mut Frame,
    area: Rect,
    input: &TextInput,
    focused: bool,
    loading: bool,
    palette: &Palette,
) {
    let title = if loading { "Loading..." } else { "Startpage" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(palette.border(focused));
    let inner = block.inner(area);
    let width = inner.width.saturating_sub(2) as usize;

    let line = if input.is_empty() && !focused {
        Line::from(vec![Span::raw("> "), Span::styled(PLACEHOLDER, palette.muted())])
    } else {
        let (visible, cursor) = input.visible(width);
        if focused {
            f.set_cursor_position((inner.x + 2 + cursor as u16, inner.y));
        }
        Line::from(vec![Span::styled("> ", palette.accent()), Span::raw(visible)])
    };

    f.render_widget(Paragraph::new(line).block(block).style(palette.base()), area);
}

/// One-line prompt shown at the bottom of a panel while it captures text
pub fn render_prompt(f: &mut Frame, area: Rect, label: &str, input: &TextInput, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(label.to_string())
        .border_style(palette.border(true));
    let inner = block.inner(area);
    let (visible, cursor) = input.visible(inner.width as usize);
    f.set_cursor_position((inner.x + cursor as u16, inner.y));
    f.render_widget(Paragraph::new(visible).block(block).style(palette.base()), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_labels() {
        assert_eq!(background_label(&BackgroundStatus::Loading), "Loading background...");
        assert_eq!(
            background_label(&BackgroundStatus::Ready("https://img".to_string())),
            "Background: https://img"
        );
        assert_eq!(background_label(&BackgroundStatus::Unavailable), "No background");
    }
}
