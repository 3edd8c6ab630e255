use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::dashboard::{ActionOutcome, Dashboard, Services};
use crate::models::View;
use crate::router::{RouteResult, route, search_url};
use crate::store::{KeyValueStore, StoreError};
use crate::utils::{OpenUrlError, open_url};

#[derive(Parser)]
#[command(name = "startpage")]
#[command(about = "Terminal start page: command bar, bookmarks, todos, notes and a Pomodoro timer")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Add a bookmark, looking up its title unless one is given
    AddBookmark {
        /// Bookmark URL
        url: String,
        /// Title to use instead of the looked-up one
        #[arg(long)]
        title: Option<String>,
    },
    /// Quickly add a todo
    AddTodo {
        /// Todo text
        text: String,
    },
    /// Print bookmarks, todos and notes
    List,
    /// Run a command-bar line: open a panel, run an action, or search the web
    Go {
        /// e.g. "todo", "/notes", "+b https://example.com", "rust lifetimes"
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Resolve and print today's background image URL
    Background,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Invalid search URL: {0}")]
    SearchUrlError(#[from] url::ParseError),
    #[error("Failed to open browser: {0}")]
    OpenError(#[from] OpenUrlError),
}

/// What `go` decided to do with its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoOutcome {
    /// Caller should start the TUI with this panel open
    OpenView(View),
    Done,
}

/// Handle the add-bookmark command
pub fn handle_add_bookmark<S: KeyValueStore + Clone>(
    url: String,
    title: Option<String>,
    dashboard: &mut Dashboard<S>,
    services: &Services,
) -> Result<(), CliError> {
    let added = dashboard.bookmarks.add_bookmark(
        &url,
        title.as_deref(),
        services.metadata.as_ref(),
        services.clock.as_ref(),
    )?;
    match added {
        Some(bookmark) => println!("Bookmark added: {} ({})", bookmark.name, bookmark.url),
        None => println!("Nothing to add: URL is empty"),
    }
    Ok(())
}

/// Handle the add-todo command
pub fn handle_add_todo<S: KeyValueStore + Clone>(
    text: String,
    dashboard: &mut Dashboard<S>,
    services: &Services,
) -> Result<(), CliError> {
    match dashboard.todos.add_todo(&text, services.clock.as_ref())? {
        Some(todo) => println!("Todo added (ID: {})", todo.id),
        None => println!("Nothing to add: text is empty"),
    }
    Ok(())
}

/// Handle the list command
pub fn handle_list<S: KeyValueStore + Clone>(dashboard: &Dashboard<S>) {
    println!("Bookmarks:");
    for bookmark in dashboard.bookmarks.bookmarks() {
        println!("  {}  {}", bookmark.name, bookmark.url);
    }
    println!();
    println!("Todo ({} open):", dashboard.todos.remaining());
    for todo in dashboard.todos.todos() {
        let mark = if todo.completed { "x" } else { " " };
        println!("  [{}] {}", mark, todo.text);
    }
    println!();
    println!("Notes:");
    for note in dashboard.notes.notes() {
        let title = if note.title.is_empty() { "Untitled" } else { note.title.as_str() };
        println!("  {} ({} chars)", title, note.content.chars().count());
    }
}

/// Handle the go command
pub fn handle_go<S: KeyValueStore + Clone>(
    input: &str,
    search_base: &str,
    dashboard: &mut Dashboard<S>,
    services: &Services,
) -> Result<GoOutcome, CliError> {
    match route(input) {
        RouteResult::Navigate(view) => Ok(GoOutcome::OpenView(view)),
        RouteResult::Action(action, argument) => {
            match dashboard.run_action(action, &argument, services)? {
                ActionOutcome::BookmarkAdded(bookmark) => {
                    println!("Bookmark added: {} ({})", bookmark.name, bookmark.url)
                }
                ActionOutcome::Ignored => println!("Nothing to do for {}", action.as_str()),
            }
            Ok(GoOutcome::Done)
        }
        RouteResult::Unmatched => {
            let url = search_url(search_base, input.trim())?;
            open_url(url.as_str())?;
            println!("Searching: {}", url);
            Ok(GoOutcome::Done)
        }
    }
}

/// Handle the background command
pub fn handle_background<S: KeyValueStore + Clone>(dashboard: &Dashboard<S>, services: &Services) {
    match dashboard.load_background(services) {
        Some(url) => println!("{}", url),
        None => println!("No background image (check the Unsplash API key in settings)"),
    }
}
