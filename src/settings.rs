use crate::models::{Settings, ThemeMode};
use crate::store::{JsonStore, KeyValueStore, SETTINGS_KEY, StoreError};
use std::time::{Duration, Instant};

/// How long the "Saved" confirmation stays visible
pub const SAVED_FLASH: Duration = Duration::from_secs(2);

pub struct SettingsStore<S> {
    store: JsonStore<S>,
    settings: Settings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn load(store: S) -> Self {
        let store = JsonStore::new(store);
        let settings = store.get_or_else(SETTINGS_KEY, Settings::default);
        Self { store, settings }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Replace the whole record
    pub fn save(&mut self, settings: Settings) -> Result<(), StoreError> {
        self.store.set(SETTINGS_KEY, &settings)?;
        tracing::info!(theme = settings.theme.as_str(), query = %settings.background_query, "settings saved");
        self.settings = settings;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Theme,
    BackgroundQuery,
    ApiKey,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::Theme,
        SettingsField::BackgroundQuery,
        SettingsField::ApiKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Theme => "Theme",
            SettingsField::BackgroundQuery => "Background query",
            SettingsField::ApiKey => "Unsplash API key",
        }
    }
}

/// Local edit buffer for the settings panel; nothing is stored until `save`
#[derive(Debug, Clone)]
pub struct SettingsDraft {
    pub draft: Settings,
    saved_at: Option<Instant>,
}

impl SettingsDraft {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            draft: settings.clone(),
            saved_at: None,
        }
    }

    pub fn cycle_theme(&mut self) {
        self.draft.theme = self.draft.theme.next();
        self.saved_at = None;
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.draft.theme = theme;
        self.saved_at = None;
    }

    pub fn set_text(&mut self, field: SettingsField, value: String) {
        match field {
            SettingsField::Theme => return,
            SettingsField::BackgroundQuery => self.draft.background_query = value,
            SettingsField::ApiKey => self.draft.unsplash_api_key = Some(value),
        }
        self.saved_at = None;
    }

    pub fn text(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Theme => self.draft.theme.as_str().to_string(),
            SettingsField::BackgroundQuery => self.draft.background_query.clone(),
            SettingsField::ApiKey => self.draft.unsplash_api_key.clone().unwrap_or_default(),
        }
    }

    pub fn save<S: KeyValueStore>(
        &mut self,
        target: &mut SettingsStore<S>,
        now: Instant,
    ) -> Result<(), StoreError> {
        target.save(self.draft.clone())?;
        self.saved_at = Some(now);
        Ok(())
    }

    pub fn is_saved(&self, now: Instant) -> bool {
        self.saved_at
            .is_some_and(|at| now.saturating_duration_since(at) < SAVED_FLASH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::rc::Rc;

    #[test]
    fn defaults_when_nothing_stored() {
        let store = SettingsStore::load(MemoryStore::new());
        assert_eq!(store.get(), &Settings::default());
        assert_eq!(store.get().background_query, "mountains");
        assert_eq!(store.get().theme, ThemeMode::System);
    }

    #[test]
    fn draft_save_overwrites_whole_record() {
        let backend = Rc::new(MemoryStore::new());
        let mut store = SettingsStore::load(backend.clone());
        let mut draft = SettingsDraft::from_settings(store.get());
        draft.set_theme(ThemeMode::Dark);
        draft.set_text(SettingsField::BackgroundQuery, "ocean".to_string());
        draft.set_text(SettingsField::ApiKey, "k-123".to_string());
        assert_eq!(store.get().background_query, "mountains");

        let now = Instant::now();
        draft.save(&mut store, now).unwrap();
        assert!(draft.is_saved(now));
        assert!(!draft.is_saved(now + SAVED_FLASH));

        let reloaded = SettingsStore::load(backend);
        assert_eq!(reloaded.get().theme, ThemeMode::Dark);
        assert_eq!(reloaded.get().background_query, "ocean");
        assert_eq!(reloaded.get().api_key(), Some("k-123"));
    }

    #[test]
    fn editing_clears_saved_flag() {
        let mut store = SettingsStore::load(MemoryStore::new());
        let mut draft = SettingsDraft::from_settings(store.get());
        let now = Instant::now();
        draft.save(&mut store, now).unwrap();
        draft.cycle_theme();
        assert!(!draft.is_saved(now));
    }
}
