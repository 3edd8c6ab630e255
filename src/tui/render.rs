use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::models::View;
use crate::store::KeyValueStore;
use crate::tui::app::{App, Focus, PanelInput};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    bookmark_list::render_bookmark_list,
    color::Palette,
    command_bar::{render_command_bar, render_header, render_prompt},
    help::render_help,
    notes_view::{render_note_editor, render_notes_view},
    pomodoro_view::render_pomodoro_view,
    settings_view::render_settings_view,
    status_bar::render_status_bar,
    todo_list::render_todo_list,
};

pub fn render<S: KeyValueStore + Clone>(f: &mut Frame, app: &mut App<S>, layout: &Layout) {
    let palette = Palette::from_theme(&app.theme);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Startpage")
        .title_alignment(Alignment::Center)
        .style(palette.base());
    f.render_widget(outer_block, f.area());

    render_header(f, layout.header_area, &app.background, &palette);

    let command_focused = app.focus == Focus::CommandBar && app.panel_input.is_none();
    render_command_bar(
        f,
        layout.command_area,
        &app.command,
        command_focused,
        app.is_loading(),
        &palette,
    );

    if let Some(view) = app.views.active() {
        render_panel(f, app, view, layout.panel_area, &palette);
    }

    let hints = app.key_hints();
    render_status_bar(
        f,
        layout.status_area,
        app.status_message.as_deref(),
        &hints,
        &palette,
    );

    if app.show_help {
        render_help(f, f.area(), &palette);
    }
}

fn render_panel<S: KeyValueStore + Clone>(
    f: &mut Frame,
    app: &mut App<S>,
    view: View,
    area: Rect,
    palette: &Palette,
) {
    if let Some(PanelInput::NoteContent { id, editor }) = &app.panel_input {
        let title = app
            .dashboard
            .notes
            .notes()
            .iter()
            .find(|note| note.id == *id)
            .map(|note| note.title.clone())
            .unwrap_or_default();
        render_note_editor(f, area, &title, editor, palette);
        return;
    }

    let (list_area, prompt_area) = if app.panel_input.is_some() {
        let split = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let focused = app.focus == Focus::Panel && app.panel_input.is_none();
    match view {
        View::Bookmarks => render_bookmark_list(
            f,
            list_area,
            app.dashboard.bookmarks.bookmarks(),
            &mut app.bookmark_list,
            focused,
            palette,
        ),
        View::Todo => render_todo_list(
            f,
            list_area,
            app.dashboard.todos.todos(),
            app.dashboard.todos.remaining(),
            &mut app.todo_list,
            focused,
            palette,
        ),
        View::Notes => render_notes_view(
            f,
            list_area,
            app.dashboard.notes.notes(),
            app.note_list.selected(),
            focused,
            palette,
        ),
        View::Pomodoro => render_pomodoro_view(f, list_area, app.timer.state(), focused, palette),
        View::Settings => render_settings_view(
            f,
            list_area,
            &app.settings_draft,
            app.settings_field,
            focused,
            palette,
        ),
    }

    if let (Some(prompt_area), Some(input)) = (prompt_area, &app.panel_input) {
        let field = match input {
            PanelInput::BookmarkUrl(field)
            | PanelInput::BookmarkTitle { input: field, .. }
            | PanelInput::TodoText(field)
            | PanelInput::NoteTitle { input: field, .. }
            | PanelInput::SettingsText { input: field, .. } => field,
            PanelInput::NoteContent { .. } => return,
        };
        render_prompt(f, prompt_area, input.prompt(), field, palette);
    }
}
