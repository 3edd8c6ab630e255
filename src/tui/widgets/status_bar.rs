use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::tui::widgets::color::{Palette, contrast_text};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&str>,
    key_hints: &[String],
    palette: &Palette,
) {
    let max_width = area.width as usize;
    let (content, style) = match message {
        Some(msg) => {
            let style = Style::default()
                .fg(contrast_text(palette.highlight_bg))
                .bg(palette.highlight_bg)
                .add_modifier(Modifier::BOLD);
            (truncate(msg, max_width), style)
        }
        None => (fit_hints(key_hints, max_width), palette.base()),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

/// Join as many hints as fit in `max_width`, ending with "..." when some are dropped
pub fn fit_hints(hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let current = text.chars().count();
        let needed = if i == 0 {
            hint.chars().count()
        } else {
            current + SEPARATOR.chars().count() + hint.chars().count()
        };
        if needed > max_width {
            if i == 0 {
                return truncate(hint, max_width);
            }
            if current + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            } else {
                text = truncate(&text, max_width);
            }
            break;
        }
        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["a Add".to_string(), "d Delete".to_string(), "F1 Help".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_hints(&hints(), 80), "a Add • d Delete • F1 Help");
    }

    #[test]
    fn overflow_ends_with_ellipsis() {
        assert_eq!(fit_hints(&hints(), 20), "a Add • d Delete...");
    }

    #[test]
    fn first_hint_too_long_is_truncated() {
        assert_eq!(fit_hints(&hints(), 4), "a...");
    }
}
