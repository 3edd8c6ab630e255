use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::config::{Config, Theme};
use crate::dashboard::{ActionOutcome, Dashboard, Services};
use crate::models::View;
use crate::notes::NoteField;
use crate::notify::DesktopNotifier;
use crate::pomodoro::{IntervalScheduler, PomodoroMode, PomodoroTimer, TickOutcome};
use crate::router::{ActionName, RouteResult, route, search_url};
use crate::settings::{SettingsDraft, SettingsField};
use crate::store::{KeyValueStore, SqliteStore};
use crate::tui::error::TuiError;
use crate::tui::widgets::input::{InputEvent, TextArea, TextInput};
use crate::utils::{OpenUrlError, open_url};
use crate::views::ViewState;

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

/// Opens a URL in the user's browser
pub type UrlOpener = fn(&str) -> Result<(), OpenUrlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    CommandBar,
    Panel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundStatus {
    Loading,
    Ready(String),
    Unavailable,
}

/// An in-panel prompt or editor that captures keys until submitted or cancelled
#[derive(Debug, Clone)]
pub enum PanelInput {
    BookmarkUrl(TextInput),
    BookmarkTitle { url: String, input: TextInput },
    TodoText(TextInput),
    NoteTitle { id: i64, input: TextInput },
    NoteContent { id: i64, editor: TextArea },
    SettingsText { field: SettingsField, input: TextInput },
}

impl PanelInput {
    pub fn prompt(&self) -> &'static str {
        match self {
            PanelInput::BookmarkUrl(_) => "URL",
            PanelInput::BookmarkTitle { .. } => "Title (blank to look it up)",
            PanelInput::TodoText(_) => "New todo",
            PanelInput::NoteTitle { .. } => "Note title",
            PanelInput::NoteContent { .. } => "Note content (Ctrl+S to save, Esc to cancel)",
            PanelInput::SettingsText { field, .. } => field.label(),
        }
    }
}

/// Slow work (network lookups) deferred until a frame showing the loading state is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWork {
    Background,
    AddBookmark { url: String, title: Option<String> },
    Action(ActionName, String),
}

pub struct App<S = Rc<SqliteStore>> {
    pub config: Config,
    pub theme: Theme,
    pub dashboard: Dashboard<S>,
    pub services: Services,
    pub views: ViewState,
    pub focus: Focus,
    pub command: TextInput,
    pub timer: PomodoroTimer<IntervalScheduler, DesktopNotifier>,
    pub bookmark_list: ListState,
    pub todo_list: ListState,
    pub note_list: ListState,
    pub settings_field: usize,
    pub settings_draft: SettingsDraft,
    pub panel_input: Option<PanelInput>,
    pub background: BackgroundStatus,
    pub pending: Option<PendingWork>,
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
    pub show_help: bool,
    pub should_quit: bool,
    pub url_opener: UrlOpener,
}

impl<S: KeyValueStore + Clone> App<S> {
    pub fn new(
        config: Config,
        dashboard: Dashboard<S>,
        services: Services,
        initial_view: Option<View>,
    ) -> Self {
        let theme = config.theme_for(dashboard.settings.get().theme);
        let settings_draft = SettingsDraft::from_settings(dashboard.settings.get());
        let notifier = DesktopNotifier::new(config.desktop_notifications);

        let mut views = ViewState::default();
        if let Some(view) = initial_view {
            views.navigate(view);
        }
        let focus = if initial_view.is_some() {
            Focus::Panel
        } else {
            Focus::CommandBar
        };

        let mut app = Self {
            config,
            theme,
            dashboard,
            services,
            views,
            focus,
            command: TextInput::new(),
            timer: PomodoroTimer::new(IntervalScheduler::default(), notifier),
            bookmark_list: ListState::default(),
            todo_list: ListState::default(),
            note_list: ListState::default(),
            settings_field: 0,
            settings_draft,
            panel_input: None,
            background: BackgroundStatus::Loading,
            pending: Some(PendingWork::Background),
            status_message: None,
            status_message_time: None,
            show_help: false,
            should_quit: false,
            url_opener: open_url,
        };
        app.clamp_selections();
        app
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
        self.status_message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(set_at) = self.status_message_time {
            if set_at.elapsed() >= STATUS_MESSAGE_TIMEOUT && self.pending.is_none() {
                self.clear_status_message();
            }
        }
    }

    /// Terminal window title: the countdown while running, the app name otherwise
    pub fn window_title(&self) -> String {
        self.timer.state().status_title()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Run ticks that came due on the interval scheduler
    pub fn advance_timer(&mut self, due: u32) {
        if due == 0 {
            return;
        }
        if self.timer.advance(due) == TickOutcome::Completed {
            let label = self.timer.state().mode().label();
            self.set_status_message(format!("{} finished", label));
        }
    }

    /// Perform deferred slow work; the event loop calls this after drawing
    pub fn run_pending(&mut self) -> Result<(), TuiError> {
        let Some(work) = self.pending.take() else {
            return Ok(());
        };
        match work {
            PendingWork::Background => {
                self.background = match self.dashboard.load_background(&self.services) {
                    Some(url) => BackgroundStatus::Ready(url),
                    None => BackgroundStatus::Unavailable,
                };
            }
            PendingWork::AddBookmark { url, title } => {
                let added = self.dashboard.bookmarks.add_bookmark(
                    &url,
                    title.as_deref(),
                    self.services.metadata.as_ref(),
                    self.services.clock.as_ref(),
                )?;
                let outcome = added.map_or(ActionOutcome::Ignored, ActionOutcome::BookmarkAdded);
                self.after_bookmark_added(outcome);
            }
            PendingWork::Action(action, argument) => {
                let outcome = self.dashboard.run_action(action, &argument, &self.services)?;
                self.after_bookmark_added(outcome);
            }
        }
        Ok(())
    }

    fn after_bookmark_added(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::BookmarkAdded(bookmark) => {
                let index = self.dashboard.bookmarks.bookmarks().len().saturating_sub(1);
                self.bookmark_list.select(Some(index));
                self.set_status_message(format!("Bookmark added: {}", bookmark.name));
            }
            ActionOutcome::Ignored => self.set_status_message("Nothing to add"),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), TuiError> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return Ok(());
        }

        if self.show_help {
            self.show_help = false;
            return Ok(());
        }

        if self.panel_input.is_some() {
            return self.handle_panel_input(&key);
        }

        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return Ok(());
        }

        let before = self.views.active();
        if self.views.handle_key(&key) {
            self.on_view_changed(before);
            return Ok(());
        }

        if key.code == KeyCode::Tab && self.views.active().is_some() {
            self.focus = match self.focus {
                Focus::CommandBar => Focus::Panel,
                Focus::Panel => Focus::CommandBar,
            };
            return Ok(());
        }

        match (self.focus, self.views.active()) {
            (Focus::Panel, Some(view)) => self.handle_panel_key(view, &key),
            _ => self.handle_command_key(&key),
        }
    }

    fn on_view_changed(&mut self, before: Option<View>) {
        let now = self.views.active();
        if now == Some(View::Settings) && before != now {
            self.settings_draft = SettingsDraft::from_settings(self.dashboard.settings.get());
            self.settings_field = 0;
        }
        self.focus = if now.is_some() {
            Focus::Panel
        } else {
            Focus::CommandBar
        };
        self.clamp_selections();
    }

    fn handle_command_key(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        match self.command.handle_key(key) {
            InputEvent::Submitted => self.submit_command(),
            InputEvent::Cancelled => {
                self.command.clear();
                Ok(())
            }
            InputEvent::Changed | InputEvent::Ignored => Ok(()),
        }
    }

    /// Route the command bar text: open a panel, queue an action, or search the web
    pub fn submit_command(&mut self) -> Result<(), TuiError> {
        let input = self.command.value().trim().to_string();
        if input.is_empty() {
            return Ok(());
        }
        self.command.clear();

        match route(&input) {
            RouteResult::Navigate(view) => {
                let before = self.views.active();
                self.views.navigate(view);
                self.on_view_changed(before);
            }
            RouteResult::Action(action, argument) => {
                self.set_status_message("Fetching bookmark title...");
                self.pending = Some(PendingWork::Action(action, argument));
            }
            RouteResult::Unmatched => match search_url(&self.config.search_url, &input) {
                Ok(url) => self.open(url.as_str(), &format!("Searching the web for \"{}\"", input)),
                Err(e) => self.set_status_message(format!("Invalid search URL: {}", e)),
            },
        }
        Ok(())
    }

    fn open(&mut self, url: &str, success: &str) {
        match (self.url_opener)(url) {
            Ok(()) => self.set_status_message(success.to_string()),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to open browser");
                self.set_status_message(format!("Failed to open browser: {}", e));
            }
        }
    }

    fn handle_panel_key(&mut self, view: View, key: &KeyEvent) -> Result<(), TuiError> {
        match view {
            View::Bookmarks => self.handle_bookmarks_key(key),
            View::Todo => self.handle_todo_key(key),
            View::Notes => self.handle_notes_key(key),
            View::Pomodoro => {
                self.handle_pomodoro_key(key);
                Ok(())
            }
            View::Settings => self.handle_settings_key(key),
        }
    }

    fn handle_bookmarks_key(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        let len = self.dashboard.bookmarks.bookmarks().len();
        if move_selection(&mut self.bookmark_list, len, key) {
            return Ok(());
        }
        let selected = self
            .bookmark_list
            .selected()
            .and_then(|i| self.dashboard.bookmarks.bookmarks().get(i))
            .cloned();
        match key.code {
            KeyCode::Char('a') => {
                self.panel_input = Some(PanelInput::BookmarkUrl(TextInput::new()));
            }
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(bookmark) = selected {
                    self.open(&bookmark.url, &format!("Opened {}", bookmark.name));
                }
            }
            KeyCode::Char('y') => {
                if let Some(bookmark) = selected {
                    self.copy_to_clipboard(&bookmark.url);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(bookmark) = selected {
                    self.dashboard.bookmarks.delete_bookmark(bookmark.id)?;
                    self.set_status_message(format!("Deleted {}", bookmark.name));
                    self.clamp_selections();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match result {
            Ok(()) => self.set_status_message("URL copied to clipboard"),
            Err(e) => self.set_status_message(format!("Clipboard unavailable: {}", e)),
        }
    }

    fn handle_todo_key(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        let len = self.dashboard.todos.todos().len();
        if move_selection(&mut self.todo_list, len, key) {
            return Ok(());
        }
        let selected_id = self
            .todo_list
            .selected()
            .and_then(|i| self.dashboard.todos.todos().get(i))
            .map(|todo| todo.id);
        match key.code {
            KeyCode::Char('a') => {
                self.panel_input = Some(PanelInput::TodoText(TextInput::new()));
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = selected_id {
                    self.dashboard.todos.toggle_todo(id)?;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected_id {
                    self.dashboard.todos.delete_todo(id)?;
                    self.clamp_selections();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_notes_key(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        let len = self.dashboard.notes.notes().len();
        if move_selection(&mut self.note_list, len, key) {
            return Ok(());
        }
        let selected = self
            .note_list
            .selected()
            .and_then(|i| self.dashboard.notes.notes().get(i))
            .cloned();
        match key.code {
            KeyCode::Char('a') => {
                let note = self.dashboard.notes.add_note(self.services.clock.as_ref())?;
                self.note_list
                    .select(Some(self.dashboard.notes.notes().len() - 1));
                self.panel_input = Some(PanelInput::NoteTitle {
                    id: note.id,
                    input: TextInput::new(),
                });
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(note) = selected {
                    self.dashboard.notes.toggle_note(note.id)?;
                }
            }
            KeyCode::Char('r') => {
                if let Some(note) = selected {
                    self.panel_input = Some(PanelInput::NoteTitle {
                        id: note.id,
                        input: TextInput::with_value(&note.title),
                    });
                }
            }
            KeyCode::Char('e') => {
                if let Some(note) = selected {
                    self.panel_input = Some(PanelInput::NoteContent {
                        id: note.id,
                        editor: TextArea::with_value(&note.content),
                    });
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(note) = selected {
                    self.dashboard.notes.delete_note(note.id)?;
                    self.clamp_selections();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_pomodoro_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.timer.toggle(),
            KeyCode::Char('r') => self.timer.reset(),
            KeyCode::Char('1') | KeyCode::Char('w') => self.timer.change_mode(PomodoroMode::Work),
            KeyCode::Char('2') | KeyCode::Char('s') => {
                self.timer.change_mode(PomodoroMode::ShortBreak)
            }
            KeyCode::Char('3') | KeyCode::Char('l') => {
                self.timer.change_mode(PomodoroMode::LongBreak)
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let field = SettingsField::ALL[self.settings_field];
        match key.code {
            KeyCode::Char('s') if ctrl => self.save_settings()?,
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_field = self.settings_field.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings_field = (self.settings_field + 1).min(SettingsField::ALL.len() - 1);
            }
            KeyCode::Char('t') => self.settings_draft.cycle_theme(),
            KeyCode::Enter | KeyCode::Char('e') => match field {
                SettingsField::Theme => self.settings_draft.cycle_theme(),
                _ => {
                    self.panel_input = Some(PanelInput::SettingsText {
                        field,
                        input: TextInput::with_value(&self.settings_draft.text(field)),
                    });
                }
            },
            _ => {}
        }
        Ok(())
    }

    /// Persist the draft, refresh the palette, and re-resolve the background if its inputs changed
    pub fn save_settings(&mut self) -> Result<(), TuiError> {
        let previous = self.dashboard.settings.get().clone();
        self.settings_draft
            .save(&mut self.dashboard.settings, Instant::now())?;
        let saved = self.dashboard.settings.get().clone();
        self.theme = self.config.theme_for(saved.theme);
        if saved.background_query != previous.background_query
            || saved.api_key() != previous.api_key()
        {
            self.background = BackgroundStatus::Loading;
            self.pending = Some(PendingWork::Background);
        }
        tracing::info!(theme = saved.theme.as_str(), "settings saved");
        Ok(())
    }

    fn handle_panel_input(&mut self, key: &KeyEvent) -> Result<(), TuiError> {
        let Some(mut input) = self.panel_input.take() else {
            return Ok(());
        };
        let event = match &mut input {
            PanelInput::NoteContent { editor, .. } => editor.handle_key(key),
            PanelInput::BookmarkUrl(field)
            | PanelInput::BookmarkTitle { input: field, .. }
            | PanelInput::TodoText(field)
            | PanelInput::NoteTitle { input: field, .. }
            | PanelInput::SettingsText { input: field, .. } => field.handle_key(key),
        };
        match event {
            InputEvent::Submitted => self.submit_panel_input(input),
            InputEvent::Cancelled => Ok(()),
            InputEvent::Changed | InputEvent::Ignored => {
                self.panel_input = Some(input);
                Ok(())
            }
        }
    }

    fn submit_panel_input(&mut self, input: PanelInput) -> Result<(), TuiError> {
        match input {
            PanelInput::BookmarkUrl(field) => {
                let url = field.value().trim().to_string();
                if !url.is_empty() {
                    self.panel_input = Some(PanelInput::BookmarkTitle {
                        url,
                        input: TextInput::new(),
                    });
                }
            }
            PanelInput::BookmarkTitle { url, input } => {
                let title = input.value();
                let title = (!title.trim().is_empty()).then(|| title.trim().to_string());
                if title.is_none() {
                    self.set_status_message("Fetching bookmark title...");
                }
                self.pending = Some(PendingWork::AddBookmark { url, title });
            }
            PanelInput::TodoText(field) => {
                if self
                    .dashboard
                    .todos
                    .add_todo(&field.value(), self.services.clock.as_ref())?
                    .is_some()
                {
                    let index = self.dashboard.todos.todos().len() - 1;
                    self.todo_list.select(Some(index));
                }
            }
            PanelInput::NoteTitle { id, input } => {
                self.dashboard
                    .notes
                    .update_note(id, NoteField::Title, &input.value())?;
            }
            PanelInput::NoteContent { id, editor } => {
                self.dashboard
                    .notes
                    .update_note(id, NoteField::Content, &editor.value())?;
            }
            PanelInput::SettingsText { field, input } => {
                self.settings_draft.set_text(field, input.value());
            }
        }
        Ok(())
    }

    /// Keep list selections inside their collections after deletes and reloads
    pub fn clamp_selections(&mut self) {
        clamp(&mut self.bookmark_list, self.dashboard.bookmarks.bookmarks().len());
        clamp(&mut self.todo_list, self.dashboard.todos.todos().len());
        clamp(&mut self.note_list, self.dashboard.notes.notes().len());
    }

    /// Key hints for the status bar in the current focus
    pub fn key_hints(&self) -> Vec<String> {
        let panel_hints: &[&str] = match (&self.panel_input, self.focus, self.views.active()) {
            (Some(PanelInput::NoteContent { .. }), _, _) => &["Ctrl+S Save", "Esc Cancel"],
            (Some(_), _, _) => &["Enter Confirm", "Esc Cancel"],
            (None, Focus::Panel, Some(View::Bookmarks)) => {
                &["a Add", "Enter Open", "y Copy URL", "d Delete"]
            }
            (None, Focus::Panel, Some(View::Todo)) => &["a Add", "Space Toggle", "d Delete"],
            (None, Focus::Panel, Some(View::Notes)) => {
                &["a Add", "Enter Expand", "r Rename", "e Edit", "d Delete"]
            }
            (None, Focus::Panel, Some(View::Pomodoro)) => {
                &["Space Start/Pause", "r Reset", "1/2/3 Mode"]
            }
            (None, Focus::Panel, Some(View::Settings)) => {
                &["Enter Edit", "t Theme", "Ctrl+S Save"]
            }
            _ => &["Enter Go/Search", "+b <url> Bookmark"],
        };
        let mut hints: Vec<String> = panel_hints.iter().map(|h| h.to_string()).collect();
        if self.panel_input.is_none() {
            if self.views.active().is_some() {
                hints.push("Tab Focus".to_string());
                hints.push("Esc Close".to_string());
            }
            hints.push("Alt+B/T/N/P/S Panels".to_string());
            hints.push("F1 Help".to_string());
            hints.push("Ctrl+Q Quit".to_string());
        }
        hints
    }
}

fn clamp(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        None => state.select(Some(0)),
        Some(i) if i >= len => state.select(Some(len - 1)),
        Some(_) => {}
    }
}

/// Up/Down (and j/k) list navigation; returns whether the key moved the selection
fn move_selection(state: &mut ListState, len: usize, key: &KeyEvent) -> bool {
    if len == 0 {
        return false;
    }
    let current = state.selected().unwrap_or(0);
    let next = match key.code {
        KeyCode::Up | KeyCode::Char('k') => current.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (current + 1).min(len - 1),
        KeyCode::Home => 0,
        KeyCode::End => len - 1,
        _ => return false,
    };
    state.select(Some(next));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{LinkMetadataSource, PhotoSource, RemoteError};
    use crate::store::MemoryStore;
    use crate::utils::test_support::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    struct NoMetadata;

    impl LinkMetadataSource for NoMetadata {
        fn fetch_title(&self, _url: &str) -> Result<Option<String>, RemoteError> {
            Ok(Some("Fetched Title".to_string()))
        }
    }

    struct NoPhotos;

    impl PhotoSource for NoPhotos {
        fn random_photo(&self, _query: &str, _api_key: &str) -> Result<String, RemoteError> {
            Err(RemoteError::MissingField("urls.full"))
        }

        fn preload(&self, _image_url: &str) -> Result<usize, RemoteError> {
            Ok(0)
        }
    }

    fn no_browser(_url: &str) -> Result<(), OpenUrlError> {
        Ok(())
    }

    fn app() -> App<Rc<MemoryStore>> {
        let clock = FixedClock::new(
            1_700_000_000_000,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        let store = Rc::new(MemoryStore::default());
        let dashboard = Dashboard::load(store, &clock).unwrap();
        let services = Services {
            metadata: Box::new(NoMetadata),
            photos: Box::new(NoPhotos),
            clock: Box::new(clock),
        };
        let config = Config {
            desktop_notifications: false,
            ..Config::default()
        };
        let mut app = App::new(config, dashboard, services, None);
        app.url_opener = no_browser;
        app
    }

    fn press(app: &mut App<Rc<MemoryStore>>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn alt(app: &mut App<Rc<MemoryStore>>, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT))
            .unwrap();
    }

    fn type_line(app: &mut App<Rc<MemoryStore>>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn starts_loading_background() {
        let mut app = app();
        assert_eq!(app.background, BackgroundStatus::Loading);
        assert!(app.is_loading());
        app.run_pending().unwrap();
        assert_eq!(app.background, BackgroundStatus::Unavailable);
        assert!(!app.is_loading());
    }

    #[test]
    fn command_bar_navigates_to_panel() {
        let mut app = app();
        type_line(&mut app, "/notes");
        assert_eq!(app.views.active(), Some(View::Notes));
        assert_eq!(app.focus, Focus::Panel);
        assert!(app.command.is_empty());
    }

    #[test]
    fn command_bar_action_adds_bookmark_after_pending_work() {
        let mut app = app();
        app.run_pending().unwrap();
        type_line(&mut app, "+b https://example.com/page");
        assert_eq!(
            app.pending,
            Some(PendingWork::Action(
                ActionName::AddBookmark,
                "https://example.com/page".to_string()
            ))
        );
        app.run_pending().unwrap();
        let last = app.dashboard.bookmarks.bookmarks().last().unwrap();
        assert_eq!(last.name, "Fetched Title");
        assert_eq!(app.status_message.as_deref(), Some("Bookmark added: Fetched Title"));
    }

    #[test]
    fn unmatched_command_searches() {
        let mut app = app();
        type_line(&mut app, "rust lifetimes");
        assert_eq!(app.views.active(), None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Searching the web for \"rust lifetimes\"")
        );
    }

    #[test]
    fn browser_failure_is_reported_in_status() {
        fn unsupported(_url: &str) -> Result<(), OpenUrlError> {
            Err(OpenUrlError::Unsupported("plan9"))
        }
        let mut app = app();
        app.url_opener = unsupported;
        type_line(&mut app, "rust lifetimes");
        assert_eq!(
            app.status_message.as_deref(),
            Some("Failed to open browser: Opening URLs is unsupported on plan9")
        );
    }

    #[test]
    fn alt_shortcut_toggles_and_escape_closes() {
        let mut app = app();
        alt(&mut app, 't');
        assert_eq!(app.views.active(), Some(View::Todo));
        alt(&mut app, 't');
        assert_eq!(app.views.active(), None);
        alt(&mut app, 'p');
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.views.active(), None);
        assert_eq!(app.focus, Focus::CommandBar);
    }

    #[test]
    fn todo_panel_add_toggle_delete() {
        let mut app = app();
        alt(&mut app, 't');
        let before = app.dashboard.todos.todos().len();
        press(&mut app, KeyCode::Char('a'));
        type_line(&mut app, "water plants");
        assert_eq!(app.dashboard.todos.todos().len(), before + 1);
        assert_eq!(app.todo_list.selected(), Some(before));

        press(&mut app, KeyCode::Char(' '));
        assert!(app.dashboard.todos.todos()[before].completed);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.dashboard.todos.todos().len(), before);
        assert_eq!(app.todo_list.selected(), Some(before - 1));
    }

    #[test]
    fn escape_cancels_input_before_closing_panel() {
        let mut app = app();
        alt(&mut app, 't');
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert!(app.panel_input.is_none());
        assert_eq!(app.views.active(), Some(View::Todo));
    }

    #[test]
    fn note_add_then_title_and_content() {
        let mut app = app();
        alt(&mut app, 'n');
        press(&mut app, KeyCode::Char('a'));
        type_line(&mut app, "Groceries");
        let note = app.dashboard.notes.notes().last().unwrap().clone();
        assert_eq!(note.title, "Groceries");
        assert!(note.is_expanded);

        press(&mut app, KeyCode::Char('e'));
        for c in "milk".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        let edited = app.dashboard.notes.notes().last().unwrap();
        assert_eq!(edited.id, note.id);
        assert_eq!(edited.content, "milk");
    }

    #[test]
    fn pomodoro_keys_drive_timer() {
        let mut app = app();
        alt(&mut app, 'p');
        press(&mut app, KeyCode::Char(' '));
        assert!(app.timer.state().is_active());
        app.advance_timer(3);
        assert_eq!(app.timer.state().time_left(), 1500 - 3);
        assert_eq!(app.window_title(), "24:57 - Focus");
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.timer.state().mode(), PomodoroMode::ShortBreak);
        assert!(!app.timer.state().is_active());
        assert_eq!(app.window_title(), crate::pomodoro::DEFAULT_TITLE);
    }

    #[test]
    fn settings_save_requeues_background_when_query_changes() {
        let mut app = app();
        app.run_pending().unwrap();
        alt(&mut app, 's');
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        type_line(&mut app, "forest");
        assert_eq!(app.dashboard.settings.get().background_query, "mountains");

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(app.dashboard.settings.get().background_query, "forest");
        assert_eq!(app.pending, Some(PendingWork::Background));
        assert!(app.settings_draft.is_saved(Instant::now()));
    }

    #[test]
    fn ctrl_q_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(app.should_quit);
    }
}
