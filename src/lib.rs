pub mod background;
pub mod bookmarks;
pub mod cli;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod notes;
pub mod notify;
pub mod pomodoro;
pub mod remote;
pub mod router;
pub mod settings;
pub mod store;
pub mod todos;
pub mod tui;
pub mod utils;
pub mod views;

pub use config::Config;
pub use models::{Bookmark, Note, Settings, Todo, View};
pub use store::{JsonStore, KeyValueStore, MemoryStore, SqliteStore};
pub use utils::Profile;
