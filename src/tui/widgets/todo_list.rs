use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::models::Todo;
use crate::tui::widgets::color::Palette;

pub fn render_todo_list(
    f: &mut Frame,
    area: Rect,
    todos: &[Todo],
    remaining: usize,
    list_state: &mut ListState,
    focused: bool,
    palette: &Palette,
) {
    let items: Vec<ListItem> = todos
        .iter()
        .map(|todo| {
            let (mark, style) = if todo.completed {
                ("[x] ", palette.muted().add_modifier(Modifier::CROSSED_OUT))
            } else {
                ("[ ] ", palette.base())
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, palette.accent()),
                Span::styled(todo.text.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Todo ({} left)", remaining))
                .border_style(palette.border(focused)),
        )
        .style(palette.base())
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
