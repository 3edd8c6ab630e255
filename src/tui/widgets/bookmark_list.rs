use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::models::Bookmark;
use crate::tui::widgets::color::Palette;
use crate::utils::extract_hostname;

pub fn render_bookmark_list(
    f: &mut Frame,
    area: Rect,
    bookmarks: &[Bookmark],
    list_state: &mut ListState,
    focused: bool,
    palette: &Palette,
) {
    let items: Vec<ListItem> = if bookmarks.is_empty() {
        vec![ListItem::new(Span::styled("No bookmarks yet. Press a to add one.", palette.muted()))]
    } else {
        bookmarks
            .iter()
            .map(|bookmark| {
                ListItem::new(Line::from(vec![
                    Span::raw(bookmark.name.clone()),
                    Span::raw("  "),
                    Span::styled(extract_hostname(&bookmark.url), palette.muted()),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Bookmarks ({})", bookmarks.len()))
                .border_style(palette.border(focused)),
        )
        .style(palette.base())
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
