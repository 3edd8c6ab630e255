use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::models::ThemeMode;
use crate::settings::{SettingsDraft, SettingsField};
use crate::tui::widgets::color::Palette;

/// Show the API key's last four characters only
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    let tail: String = secret.chars().skip(count.saturating_sub(4)).collect();
    format!("{}{}", "*".repeat(count.saturating_sub(4)), tail)
}

fn theme_choices(current: ThemeMode, palette: &Palette) -> Vec<Span<'static>> {
    ThemeMode::ALL
        .into_iter()
        .flat_map(|mode| {
            let radio = if mode == current { "●" } else { "○" };
            let style = if mode == current {
                palette.accent()
            } else {
                palette.base()
            };
            [Span::styled(format!("{} {}", radio, mode.as_str()), style), Span::raw("  ")]
        })
        .collect()
}

pub fn render_settings_view(
    f: &mut Frame,
    area: Rect,
    draft: &SettingsDraft,
    selected_field: usize,
    focused: bool,
    palette: &Palette,
) {
    let saved = draft.is_saved(Instant::now());
    let title = if saved { "Settings - Saved!" } else { "Settings" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
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
            Constraint::Min(0),
        ])
        .split(inner);

    for (i, field) in SettingsField::ALL.into_iter().enumerate() {
        let label_style = if i == selected_field {
            palette.highlight()
        } else {
            palette.base()
        };
        let mut spans = vec![Span::styled(format!("{:<18}", field.label()), label_style), Span::raw(" ")];
        match field {
            SettingsField::Theme => spans.extend(theme_choices(draft.draft.theme, palette)),
            SettingsField::BackgroundQuery => spans.push(Span::raw(draft.text(field))),
            SettingsField::ApiKey => {
                spans.push(Span::styled(mask_secret(&draft.text(field)), palette.muted()))
            }
        }
        f.render_widget(Paragraph::new(Line::from(spans)), rows[i]);
    }

    let hint = if saved {
        "Settings saved."
    } else {
        "Changes apply after Ctrl+S."
    };
    f.render_widget(Paragraph::new(Span::styled(hint, palette.muted())), rows[4]);
}
