//! Command bar routing.
//!
//! A line typed into the command bar is either a panel alias (`todo`,
//! `/notes`, `p`), an action shortcut (`+b https://example.com`), or neither,
//! in which case the caller runs a web search.

use crate::models::View;
use once_cell::sync::Lazy;
use regex::Regex;

static ACTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+(\w+)\s+(.*)$").expect("action pattern is valid"));

/// Side-effecting handlers reachable through `+<shortcut>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionName {
    AddBookmark,
}

impl ActionName {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::AddBookmark => "addBookmark",
        }
    }
}

const ACTION_SHORTCUTS: &[(&str, ActionName)] = &[("b", ActionName::AddBookmark)];

const VIEW_ALIASES: &[(&[&str], View)] = &[
    (&["bookmarks", "bookmark", "b"], View::Bookmarks),
    (&["todo", "todos", "t"], View::Todo),
    (&["notes", "note", "n"], View::Notes),
    (&["pomodoro", "timer", "p"], View::Pomodoro),
    (&["settings", "config", "s"], View::Settings),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResult {
    Navigate(View),
    Action(ActionName, String),
    Unmatched,
}

pub fn route(raw_input: &str) -> RouteResult {
    let input = raw_input.trim();

    if let Some(caps) = ACTION_PATTERN.captures(input) {
        let shortcut = caps[1].to_lowercase();
        return match ACTION_SHORTCUTS.iter().find(|(key, _)| *key == shortcut) {
            Some((_, action)) => RouteResult::Action(*action, caps[2].trim().to_string()),
            None => RouteResult::Unmatched,
        };
    }

    let command = input.strip_prefix('/').unwrap_or(input).to_lowercase();
    VIEW_ALIASES
        .iter()
        .find(|(aliases, _)| aliases.contains(&command.as_str()))
        .map(|(_, view)| RouteResult::Navigate(*view))
        .unwrap_or(RouteResult::Unmatched)
}

/// All aliases that open `view`, in table order
pub fn aliases_for(view: View) -> &'static [&'static str] {
    VIEW_ALIASES
        .iter()
        .find(|(_, v)| *v == view)
        .map(|(aliases, _)| *aliases)
        .unwrap_or(&[])
}

/// Web search URL for input the router did not recognise
pub fn search_url(base: &str, query: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse_with_params(base, &[("q", query)])
}
