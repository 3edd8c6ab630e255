use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_expanded: bool,
}

impl Note {
    pub fn general(id: i64, content: String) -> Self {
        Self {
            id,
            title: "General".to_string(),
            content,
            is_expanded: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_background_query")]
    pub background_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsplash_api_key: Option<String>,
}

fn default_background_query() -> String {
    "mountains".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            background_query: default_background_query(),
            unsplash_api_key: Some(String::new()),
        }
    }
}

impl Settings {
    /// API key with empty strings treated as absent
    pub fn api_key(&self) -> Option<&str> {
        self.unsplash_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedImage {
    pub url: String,
    pub date: String,
    pub stored_query: String,
}

impl CachedImage {
    pub fn is_valid_for(&self, today: &str, query: &str) -> bool {
        self.date == today && self.stored_query == query
    }
}

/// One of the five mutually exclusive panels under the command bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Bookmarks,
    Todo,
    Notes,
    Pomodoro,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Bookmarks,
        View::Todo,
        View::Notes,
        View::Pomodoro,
        View::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Bookmarks => "Bookmarks",
            View::Todo => "Todo",
            View::Notes => "Notes",
            View::Pomodoro => "Pomodoro",
            View::Settings => "Settings",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Bookmarks => "bookmarks",
            View::Todo => "todo",
            View::Notes => "notes",
            View::Pomodoro => "pomodoro",
            View::Settings => "settings",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn note_uses_camel_case_fields() {
        let note = Note::general(7, "hi".to_string());
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(
            json,
            r#"{"id":7,"title":"General","content":"hi","isExpanded":true}"#
        );
    }

    #[test]
    fn settings_round_trip_stored_layout() {
        let stored = r#"{"theme":"dark","backgroundQuery":"ocean","unsplashApiKey":"abc"}"#;
        let settings: Settings = serde_json::from_str(stored).unwrap();
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.background_query, "ocean");
        assert_eq!(settings.api_key(), Some("abc"));
    }

    #[test]
    fn settings_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.theme, ThemeMode::System);
        assert_eq!(settings.background_query, "mountains");
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn cached_image_validity_needs_day_and_query() {
        let cached = CachedImage {
            url: "u".to_string(),
            date: "Thu Oct 15 2026".to_string(),
            stored_query: "mountains".to_string(),
        };
        assert!(cached.is_valid_for("Thu Oct 15 2026", "mountains"));
        assert!(!cached.is_valid_for("Fri Oct 16 2026", "mountains"));
        assert!(!cached.is_valid_for("Thu Oct 15 2026", "ocean"));
    }
}
