use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::models::View;
use crate::router::aliases_for;
use crate::tui::widgets::color::Palette;
use crate::views::shortcut_key;

pub fn render_help(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup = popup_area(area, 70, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text() -> String {
    let mut text = String::new();

    text.push_str("Command bar:\n");
    text.push_str("  Enter: open a panel by name, run +b <url>, or search the web\n");
    for view in View::ALL {
        text.push_str(&format!(
            "  {:<10} Alt+{}  or type: {}\n",
            view.title(),
            shortcut_key(view),
            aliases_for(view).join(", ")
        ));
    }
    text.push_str("  Esc: close the open panel\n");
    text.push_str("  Tab: switch focus between command bar and panel\n\n");

    text.push_str("Lists (bookmarks, todos, notes):\n");
    text.push_str("  Up/Down or k/j: move, a: add, d: delete\n");
    text.push_str("  Bookmarks: Enter open, y copy URL\n");
    text.push_str("  Todos: Space toggle done\n");
    text.push_str("  Notes: Enter expand/collapse, r rename, e edit (Ctrl+S saves)\n\n");

    text.push_str("Pomodoro:\n");
    text.push_str("  Space: start/pause, r: reset, 1/2/3: focus/short/long\n\n");

    text.push_str("Settings:\n");
    text.push_str("  Up/Down: field, Enter: edit, t: cycle theme, Ctrl+S: save\n\n");

    text.push_str("General:\n");
    text.push_str("  F1: show/hide help\n");
    text.push_str("  Ctrl+Q or Ctrl+C: quit\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_panel_shortcut() {
        let text = build_help_text();
        for view in View::ALL {
            assert!(text.contains(&format!("Alt+{}", shortcut_key(view))));
        }
        assert!(text.contains("pomodoro, timer, p"));
    }
}
