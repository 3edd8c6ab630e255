use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use std::path::PathBuf;
use std::rc::Rc;
use startpage::cli::{Cli, Commands, GoOutcome};
use startpage::dashboard::{Dashboard, Services};
use startpage::store::SqliteStore;
use startpage::{Config, Profile};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(&PathBuf::from(path))?,
        None => Config::load_with_profile(profile)?,
    };

    init_logging(&config)?;
    tracing::info!(?profile, "starting startpage");

    let db_path = config.get_database_path();
    let store = Rc::new(
        SqliteStore::open(&db_path)
            .wrap_err_with(|| format!("failed to open database at {}", db_path.display()))?,
    );
    let services = Services::from_config(&config)?;
    let mut dashboard = Dashboard::load(store, services.clock.as_ref())?;

    match cli.command {
        None | Some(Commands::Tui) => {
            let app = startpage::tui::App::new(config, dashboard, services, None);
            startpage::tui::run_event_loop(app)?;
        }
        Some(Commands::AddBookmark { url, title }) => {
            startpage::cli::handle_add_bookmark(url, title, &mut dashboard, &services)?;
        }
        Some(Commands::AddTodo { text }) => {
            startpage::cli::handle_add_todo(text, &mut dashboard, &services)?;
        }
        Some(Commands::List) => {
            startpage::cli::handle_list(&dashboard);
        }
        Some(Commands::Go { input }) => {
            let input = input.join(" ");
            let search_base = config.search_url.clone();
            if let GoOutcome::OpenView(view) =
                startpage::cli::handle_go(&input, &search_base, &mut dashboard, &services)?
            {
                let app = startpage::tui::App::new(config, dashboard, services, Some(view));
                startpage::tui::run_event_loop(app)?;
            }
        }
        Some(Commands::Background) => {
            startpage::cli::handle_background(&dashboard, &services);
        }
    }

    Ok(())
}

/// Log to a file beside the database; the terminal belongs to the TUI
fn init_logging(config: &Config) -> Result<()> {
    let log_path = config.get_log_path();
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("failed to create log directory '{}'", parent.display())
            })?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("failed to open log file '{}'", log_path.display()))?;

    let level = config.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|e| eyre!("failed to initialise logging: {e}"))?;

    Ok(())
}
