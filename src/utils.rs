use chrono::{Local, NaiveDate};
use directories::{BaseDirs, ProjectDirs};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "startpage-dev",
            Profile::Prod => "startpage",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "startpage-dev" instead of "startpage"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "startpage", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (database and log file live here)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "startpage", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Source of "now" for ids and the daily image cache.
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
    /// Current local calendar day
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Calendar-day key stored with the cached background image, e.g. "Thu Oct 15 2026"
pub fn calendar_day_string(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Hostname of a URL, or the trimmed input itself when it does not parse
pub fn extract_hostname(raw: &str) -> String {
    let trimmed = raw.trim();
    url::Url::parse(trimmed)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| trimmed.to_string())
}

/// Format seconds as MM:SS
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Program and leading arguments used to hand a URL to the desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOpenCommand {
    pub program: String,
    pub prefix_args: Vec<OsString>,
}

impl UrlOpenCommand {
    pub fn for_os(target_os: &str) -> Option<Self> {
        match target_os {
            "macos" => Some(Self {
                program: "open".to_string(),
                prefix_args: Vec::new(),
            }),
            // Not `cmd /C start`: cmd.exe splits on `&` and `|`
            "windows" => Some(Self {
                program: "rundll32".to_string(),
                prefix_args: vec![OsString::from("url.dll,FileProtocolHandler")],
            }),
            "linux" | "freebsd" | "openbsd" | "netbsd" => Some(Self {
                program: "xdg-open".to_string(),
                prefix_args: Vec::new(),
            }),
            _ => None,
        }
    }

    /// Full argument list for opening `url`; the URL is always one argument
    pub fn args_for(&self, url: &str) -> Vec<OsString> {
        let mut args = self.prefix_args.clone();
        args.push(OsString::from(url));
        args
    }
}

#[derive(Debug, Error)]
pub enum OpenUrlError {
    #[error("Opening URLs is unsupported on {0}")]
    Unsupported(&'static str),
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Open a URL in the user's browser without waiting for it
pub fn open_url(url: &str) -> Result<(), OpenUrlError> {
    let os = std::env::consts::OS;
    let command = UrlOpenCommand::for_os(os).ok_or(OpenUrlError::Unsupported(os))?;
    launch_detached(&command.program, command.args_for(url))?;
    Ok(())
}

/// Spawn `program` and reap it on a background thread
fn launch_detached(
    program: &str,
    args: Vec<OsString>,
) -> Result<JoinHandle<Option<ExitStatus>>, OpenUrlError> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OpenUrlError::Launch {
            program: program.to_string(),
            source,
        })?;
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!(error = %e, "url opener did not exit cleanly");
            None
        }
    }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Clock;
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Clock that only moves when told to
    pub struct FixedClock {
        pub millis: Cell<i64>,
        pub day: Cell<NaiveDate>,
    }

    impl FixedClock {
        pub fn new(millis: i64, day: NaiveDate) -> Self {
            Self {
                millis: Cell::new(millis),
                day: Cell::new(day),
            }
        }
    }

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.millis.get()
        }

        fn today(&self) -> NaiveDate {
            self.day.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_falls_back_to_input() {
        assert_eq!(extract_hostname("https://docs.rs/serde"), "docs.rs");
        assert_eq!(extract_hostname("  not a url "), "not a url");
    }

    #[test]
    fn calendar_day_matches_stored_format() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(calendar_day_string(day), "Mon Oct 05 2026");
    }

    #[test]
    fn format_time_pads() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn url_open_command_per_platform() {
        assert_eq!(UrlOpenCommand::for_os("macos").unwrap().program, "open");
        assert_eq!(UrlOpenCommand::for_os("linux").unwrap().program, "xdg-open");
        assert!(UrlOpenCommand::for_os("plan9").is_none());
    }

    #[test]
    fn windows_opener_keeps_query_string_intact() {
        let url = "https://x.com/?a=1&b=2|c";
        let windows = UrlOpenCommand::for_os("windows").unwrap();
        assert_ne!(windows.program, "cmd");
        assert_eq!(
            windows.args_for(url),
            vec![
                OsString::from("url.dll,FileProtocolHandler"),
                OsString::from(url),
            ]
        );

        let linux = UrlOpenCommand::for_os("linux").unwrap();
        assert_eq!(linux.args_for(url), vec![OsString::from(url)]);
    }

    #[cfg(unix)]
    #[test]
    fn launched_opener_is_reaped() {
        let reaper = launch_detached("true", Vec::new()).unwrap();
        let status = reaper.join().unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[test]
    fn missing_opener_reports_program() {
        let err = launch_detached("startpage-no-such-opener", Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to launch startpage-no-such-opener"));
    }
}
