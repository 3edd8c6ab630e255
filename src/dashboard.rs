//! The owned state behind the start page, shared by the CLI and the TUI.

use crate::background::BackgroundResolver;
use crate::bookmarks::BookmarkManager;
use crate::config::Config;
use crate::models::Bookmark;
use crate::notes::NoteManager;
use crate::remote::{LinkMetadataSource, MetadataClient, PhotoSource, RemoteError, UnsplashClient};
use crate::router::ActionName;
use crate::settings::SettingsStore;
use crate::store::{KeyValueStore, StoreError};
use crate::todos::TodoManager;
use crate::utils::{Clock, SystemClock};

/// External collaborators the managers call out to
pub struct Services {
    pub metadata: Box<dyn LinkMetadataSource>,
    pub photos: Box<dyn PhotoSource>,
    pub clock: Box<dyn Clock>,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        let timeout = config.request_timeout();
        Ok(Self {
            metadata: Box::new(MetadataClient::new(config.metadata_endpoint.clone(), timeout)?),
            photos: Box::new(UnsplashClient::new(config.photo_endpoint.clone(), timeout)?),
            clock: Box::new(SystemClock),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    BookmarkAdded(Bookmark),
    /// The handler ran but had nothing to do (e.g. a blank URL)
    Ignored,
}

pub struct Dashboard<S> {
    pub settings: SettingsStore<S>,
    pub bookmarks: BookmarkManager<S>,
    pub todos: TodoManager<S>,
    pub notes: NoteManager<S>,
    pub background: BackgroundResolver<S>,
}

impl<S: KeyValueStore + Clone> Dashboard<S> {
    pub fn load(store: S, clock: &dyn Clock) -> Result<Self, StoreError> {
        Ok(Self {
            settings: SettingsStore::load(store.clone()),
            bookmarks: BookmarkManager::load(store.clone()),
            todos: TodoManager::load(store.clone()),
            notes: NoteManager::load(store.clone(), clock)?,
            background: BackgroundResolver::new(store),
        })
    }

    /// Run a `+<shortcut>` command from the command bar
    pub fn run_action(
        &mut self,
        action: ActionName,
        argument: &str,
        services: &Services,
    ) -> Result<ActionOutcome, StoreError> {
        tracing::debug!(action = action.as_str(), argument, "running command bar action");
        match action {
            ActionName::AddBookmark => {
                let added = self.bookmarks.add_bookmark(
                    argument,
                    None,
                    services.metadata.as_ref(),
                    services.clock.as_ref(),
                )?;
                Ok(added.map_or(ActionOutcome::Ignored, ActionOutcome::BookmarkAdded))
            }
        }
    }

    /// Today's background for the saved settings, fully downloaded
    pub fn load_background(&self, services: &Services) -> Option<String> {
        let settings = self.settings.get();
        self.background.resolve_and_preload(
            &settings.background_query,
            settings.api_key(),
            services.photos.as_ref(),
            services.clock.as_ref(),
        )
    }
}
