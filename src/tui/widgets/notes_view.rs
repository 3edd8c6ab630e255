use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratskin::RatSkin;
use termimad::minimad::Text as MinimadText;

use crate::models::Note;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::input::TextArea;

const UNTITLED: &str = "Untitled";

/// Markdown rendered to styled lines wrapped at `width`
pub fn markdown_lines(content: &str, width: u16) -> Vec<Line<'static>> {
    RatSkin::default()
        .parse(MinimadText::from(content), width)
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.to_string(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Every note as a title row, expanded notes followed by their content.
/// Returns the lines and the row index of the selected note's title.
pub fn note_lines(
    notes: &[Note],
    selected: Option<usize>,
    width: u16,
    palette: &Palette,
) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut selected_row = 0;
    for (i, note) in notes.iter().enumerate() {
        let marker = if note.is_expanded { "v " } else { "> " };
        let title = if note.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            note.title.clone()
        };
        let style = if selected == Some(i) {
            selected_row = lines.len();
            palette.highlight()
        } else {
            palette.base().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, palette.accent()),
            Span::styled(title, style),
        ]));
        if note.is_expanded {
            if note.content.trim().is_empty() {
                lines.push(Line::from(Span::styled("  (empty, press e to write)", palette.muted())));
            } else {
                for line in markdown_lines(&note.content, width.saturating_sub(2)) {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
        }
    }
    (lines, selected_row)
}

pub fn render_notes_view(
    f: &mut Frame,
    area: Rect,
    notes: &[Note],
    selected: Option<usize>,
    focused: bool,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Notes ({})", notes.len()))
        .border_style(palette.border(focused));
    let inner = block.inner(area);

    if notes.is_empty() {
        let empty = Paragraph::new(Span::styled("No notes. Press a to add one.", palette.muted()))
            .block(block)
            .style(palette.base());
        f.render_widget(empty, area);
        return;
    }

    let (lines, selected_row) = note_lines(notes, selected, inner.width, palette);
    let viewport = inner.height as usize;
    let scroll = selected_row.saturating_sub(viewport.saturating_sub(1));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .style(palette.base())
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

pub fn render_note_editor(f: &mut Frame, area: Rect, title: &str, editor: &TextArea, palette: &Palette) {
    let title = if title.trim().is_empty() { UNTITLED } else { title };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Editing: {} (Ctrl+S save, Esc cancel)", title))
        .border_style(palette.border(true));
    let inner = block.inner(area);

    let (row, col) = editor.cursor();
    let viewport = inner.height as usize;
    let scroll = row.saturating_sub(viewport.saturating_sub(1));
    let lines: Vec<Line> = editor.lines().into_iter().map(Line::from).collect();

    f.set_cursor_position((
        inner.x + col.min(inner.width.saturating_sub(1) as usize) as u16,
        inner.y + (row - scroll) as u16,
    ));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .style(palette.base())
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    fn note(id: i64, title: &str, content: &str, expanded: bool) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            is_expanded: expanded,
        }
    }

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn collapsed_notes_show_only_titles() {
        let palette = Palette::from_theme(&Theme::dark());
        let notes = vec![note(1, "First", "body", false), note(2, "", "", false)];
        let (lines, selected_row) = note_lines(&notes, Some(1), 40, &palette);
        assert_eq!(lines.len(), 2);
        assert_eq!(text_of(&lines[1]), "> Untitled");
        assert_eq!(selected_row, 1);
    }

    #[test]
    fn expanded_note_includes_content_rows() {
        let palette = Palette::from_theme(&Theme::dark());
        let notes = vec![note(1, "Plan", "hello world", true), note(2, "Next", "", false)];
        let (lines, selected_row) = note_lines(&notes, Some(1), 40, &palette);
        assert!(lines.len() >= 3);
        assert!(lines.iter().any(|l| text_of(l).contains("hello world")));
        assert_eq!(text_of(&lines[selected_row]), "> Next");
    }
}
