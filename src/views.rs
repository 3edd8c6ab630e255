use crate::models::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const ALT_SHORTCUTS: &[(char, View)] = &[
    ('b', View::Bookmarks),
    ('t', View::Todo),
    ('n', View::Notes),
    ('p', View::Pomodoro),
    ('s', View::Settings),
];

/// Which panel is open below the command bar (at most one)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    active: Option<View>,
}

impl ViewState {
    pub fn active(&self) -> Option<View> {
        self.active
    }

    pub fn navigate(&mut self, view: View) {
        self.active = Some(view);
    }

    /// Open `view`, or close it if it is already open
    pub fn toggle(&mut self, view: View) {
        self.active = if self.active == Some(view) {
            None
        } else {
            Some(view)
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Apply the global shortcuts; returns whether the key was consumed
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            self.clear();
            return true;
        }
        match shortcut_view(key) {
            Some(view) => {
                self.toggle(view);
                true
            }
            None => false,
        }
    }
}

/// Panel bound to an `Alt+<letter>` key, if any
pub fn shortcut_view(key: &KeyEvent) -> Option<View> {
    if !key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let c = c.to_ascii_lowercase();
    ALT_SHORTCUTS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, view)| *view)
}

pub fn shortcut_key(view: View) -> char {
    ALT_SHORTCUTS
        .iter()
        .find(|(_, v)| *v == view)
        .map(|(key, _)| key.to_ascii_uppercase())
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    #[test]
    fn alt_key_toggles_panel() {
        let mut views = ViewState::default();
        assert!(views.handle_key(&alt('t')));
        assert_eq!(views.active(), Some(View::Todo));
        assert!(views.handle_key(&alt('T')));
        assert_eq!(views.active(), None);
    }

    #[test]
    fn alt_key_switches_between_panels() {
        let mut views = ViewState::default();
        views.handle_key(&alt('b'));
        views.handle_key(&alt('p'));
        assert_eq!(views.active(), Some(View::Pomodoro));
    }

    #[test]
    fn escape_clears() {
        let mut views = ViewState::default();
        views.navigate(View::Notes);
        assert!(views.handle_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert_eq!(views.active(), None);
    }

    #[test]
    fn plain_letters_are_not_shortcuts() {
        let mut views = ViewState::default();
        assert!(!views.handle_key(&KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE)));
        assert!(!views.handle_key(&alt('x')));
        assert_eq!(views.active(), None);
    }

    #[test]
    fn every_view_has_a_shortcut() {
        for view in View::ALL {
            assert_ne!(shortcut_key(view), '?');
        }
    }
}
