use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use startpage::dashboard::{Dashboard, Services};
use startpage::remote::{LinkMetadataSource, PhotoSource, RemoteError};
use startpage::store::{KeyValueStore, NOTES_KEY, SqliteStore};
use startpage::utils::Clock;
use startpage::{Settings, models::ThemeMode};
use tempfile::TempDir;

struct StepClock {
    millis: Cell<i64>,
}

impl Clock for StepClock {
    fn now_millis(&self) -> i64 {
        let now = self.millis.get();
        self.millis.set(now + 1);
        now
    }

    fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }
}

struct TitleFromHost;

impl LinkMetadataSource for TitleFromHost {
    fn fetch_title(&self, url: &str) -> Result<Option<String>, RemoteError> {
        Ok(Some(format!("Title of {}", url)))
    }
}

#[derive(Default)]
struct CountingPhotos {
    requests: Rc<RefCell<Vec<String>>>,
}

impl PhotoSource for CountingPhotos {
    fn random_photo(&self, query: &str, _api_key: &str) -> Result<String, RemoteError> {
        self.requests.borrow_mut().push(query.to_string());
        Ok(format!("https://images.example/{}.jpg", query))
    }

    fn preload(&self, _image_url: &str) -> Result<usize, RemoteError> {
        Ok(1024)
    }
}

fn services(requests: Rc<RefCell<Vec<String>>>) -> Services {
    Services {
        metadata: Box::new(TitleFromHost),
        photos: Box::new(CountingPhotos { requests }),
        clock: Box::new(StepClock {
            millis: Cell::new(1_760_000_000_000),
        }),
    }
}

fn open(dir: &TempDir) -> Rc<SqliteStore> {
    Rc::new(SqliteStore::open(&dir.path().join("data").join("startpage.db")).unwrap())
}

#[test]
fn changes_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let requests = Rc::new(RefCell::new(Vec::new()));
    let services = services(requests.clone());

    {
        let mut dashboard = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
        dashboard
            .bookmarks
            .add_bookmark(
                "https://docs.rs",
                None,
                services.metadata.as_ref(),
                services.clock.as_ref(),
            )
            .unwrap();
        dashboard
            .todos
            .add_todo("  ship it  ", services.clock.as_ref())
            .unwrap();
        let note = dashboard.notes.add_note(services.clock.as_ref()).unwrap();
        dashboard
            .notes
            .update_note(note.id, startpage::notes::NoteField::Title, "Ideas")
            .unwrap();
        dashboard
            .settings
            .save(Settings {
                theme: ThemeMode::Dark,
                background_query: "forest".to_string(),
                unsplash_api_key: Some("key".to_string()),
            })
            .unwrap();
    }

    let dashboard = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
    let names: Vec<&str> = dashboard
        .bookmarks
        .bookmarks()
        .iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(names, vec!["Google", "React Docs", "Title of https://docs.rs"]);
    assert_eq!(dashboard.todos.todos().last().unwrap().text, "ship it");
    assert_eq!(dashboard.notes.notes().last().unwrap().title, "Ideas");
    assert_eq!(dashboard.settings.get().theme, ThemeMode::Dark);
    assert_eq!(dashboard.settings.get().background_query, "forest");
}

#[test]
fn legacy_plain_text_notes_migrate_once() {
    let dir = TempDir::new().unwrap();
    let requests = Rc::new(RefCell::new(Vec::new()));
    let services = services(requests);

    open(&dir)
        .set_raw(NOTES_KEY, "remember the milk")
        .unwrap();

    let first = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
    assert_eq!(first.notes.notes().len(), 1);
    assert_eq!(first.notes.notes()[0].content, "remember the milk");
    assert!(first.notes.notes()[0].is_expanded);
    drop(first);

    let second = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
    assert_eq!(second.notes.notes().len(), 1);
    assert_eq!(second.notes.notes()[0].content, "remember the milk");
}

#[test]
fn background_is_fetched_once_per_day_and_query() {
    let dir = TempDir::new().unwrap();
    let requests = Rc::new(RefCell::new(Vec::new()));
    let services = services(requests.clone());

    let mut dashboard = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
    assert_eq!(dashboard.load_background(&services), None);
    assert!(requests.borrow().is_empty());

    dashboard
        .settings
        .save(Settings {
            unsplash_api_key: Some("key".to_string()),
            ..Settings::default()
        })
        .unwrap();
    let url = dashboard.load_background(&services);
    assert_eq!(url.as_deref(), Some("https://images.example/mountains.jpg"));

    let reopened = Dashboard::load(open(&dir), services.clock.as_ref()).unwrap();
    assert_eq!(reopened.load_background(&services), url);
    assert_eq!(requests.borrow().as_slice(), ["mountains".to_string()]);
}
