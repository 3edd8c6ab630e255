//! Notes and the one-time upgrade of older stored note formats.
//!
//! Earlier versions stored a single note blob under the same key, either as a
//! bare string or as an object with a `content` field, and list entries used
//! `isOpen` where the current format uses `isExpanded`.

use crate::collection::{next_id, remove_by_id, update_by_id};
use crate::models::Note;
use crate::store::{JsonStore, KeyValueStore, NOTES_KEY, NOTES_MIGRATED_KEY, StoreError};
use crate::utils::Clock;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// What was found under the notes key before migration
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyShape {
    Missing,
    List(Vec<Value>),
    SingleObject(Map<String, Value>),
    PlainString(String),
}

impl LegacyShape {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return LegacyShape::Missing;
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => LegacyShape::List(items),
            Ok(Value::Object(map)) => LegacyShape::SingleObject(map),
            Ok(Value::String(text)) => LegacyShape::PlainString(text),
            Ok(other) => LegacyShape::PlainString(other.to_string()),
            // Not JSON at all: the oldest format stored the text as-is
            Err(_) => LegacyShape::PlainString(raw.to_string()),
        }
    }

    pub fn normalize(self, clock: &dyn Clock) -> Vec<Note> {
        match self {
            LegacyShape::Missing => normalize_missing(clock),
            LegacyShape::List(items) => normalize_list(items, clock),
            LegacyShape::SingleObject(map) => normalize_object(map, clock),
            LegacyShape::PlainString(text) => normalize_string(text, clock),
        }
    }
}

fn normalize_missing(clock: &dyn Clock) -> Vec<Note> {
    vec![Note::general(clock.now_millis(), String::new())]
}

fn normalize_string(text: String, clock: &dyn Clock) -> Vec<Note> {
    vec![Note::general(clock.now_millis(), text)]
}

fn normalize_object(map: Map<String, Value>, clock: &dyn Clock) -> Vec<Note> {
    let content = match map.get("content") {
        Some(Value::String(content)) if !content.is_empty() => content.clone(),
        _ => Value::Object(map).to_string(),
    };
    vec![Note::general(clock.now_millis(), content)]
}

fn normalize_list(items: Vec<Value>, clock: &dyn Clock) -> Vec<Note> {
    let mut notes: Vec<Note> = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for item in items {
        let (id, title, content, is_expanded) = match item {
            Value::Object(map) => {
                let text = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let is_expanded = map
                    .get("isExpanded")
                    .or_else(|| map.get("isOpen"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                (
                    map.get("id").and_then(Value::as_i64),
                    text("title"),
                    text("content"),
                    is_expanded,
                )
            }
            Value::String(content) => (None, "General".to_string(), content, true),
            other => {
                tracing::warn!(value = %other, "skipping unrecognised stored note");
                continue;
            }
        };

        let id = match id {
            Some(id) if !seen.contains(&id) => id,
            _ => next_id(clock, &notes),
        };
        seen.insert(id);
        notes.push(Note {
            id,
            title,
            content,
            is_expanded,
        });
    }
    notes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

pub struct NoteManager<S> {
    store: JsonStore<S>,
    notes: Vec<Note>,
}

impl<S: KeyValueStore> NoteManager<S> {
    /// Load notes, upgrading older formats first if that has not happened yet
    pub fn load(store: S, clock: &dyn Clock) -> Result<Self, StoreError> {
        let mut manager = Self {
            store: JsonStore::new(store),
            notes: Vec::new(),
        };
        if manager.migrate(clock)? {
            return Ok(manager);
        }
        manager.notes = manager.store.get_or(NOTES_KEY, Vec::new());
        Ok(manager)
    }

    /// Normalize whatever is stored under the notes key.
    ///
    /// Runs once per store: a persisted marker is written afterwards and
    /// later calls return `Ok(false)` without touching anything.
    pub fn migrate(&mut self, clock: &dyn Clock) -> Result<bool, StoreError> {
        if self.store.get::<bool>(NOTES_MIGRATED_KEY).unwrap_or(false) {
            return Ok(false);
        }
        let raw = self.store.get_raw(NOTES_KEY);
        let shape = LegacyShape::parse(raw.as_deref());
        tracing::info!(shape = shape_name(&shape), "migrating stored notes");

        self.notes = shape.normalize(clock);
        self.persist()?;
        self.store.set(NOTES_MIGRATED_KEY, &true)?;
        Ok(true)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn add_note(&mut self, clock: &dyn Clock) -> Result<Note, StoreError> {
        let note = Note {
            id: next_id(clock, &self.notes),
            title: String::new(),
            content: String::new(),
            is_expanded: true,
        };
        self.notes.push(note.clone());
        self.persist()?;
        Ok(note)
    }

    pub fn update_note(&mut self, id: i64, field: NoteField, value: &str) -> Result<bool, StoreError> {
        let changed = update_by_id(&mut self.notes, id, |note| match field {
            NoteField::Title => note.title = value.to_string(),
            NoteField::Content => note.content = value.to_string(),
        });
        if !changed {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn toggle_note(&mut self, id: i64) -> Result<bool, StoreError> {
        if !update_by_id(&mut self.notes, id, |n| n.is_expanded = !n.is_expanded) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete_note(&mut self, id: i64) -> Result<bool, StoreError> {
        if !remove_by_id(&mut self.notes, id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.set(NOTES_KEY, &self.notes)
    }
}

fn shape_name(shape: &LegacyShape) -> &'static str {
    match shape {
        LegacyShape::Missing => "missing",
        LegacyShape::List(_) => "list",
        LegacyShape::SingleObject(_) => "object",
        LegacyShape::PlainString(_) => "string",
    }
}
