use crate::collection::{next_id, remove_by_id};
use crate::models::Bookmark;
use crate::remote::LinkMetadataSource;
use crate::store::{BOOKMARKS_KEY, JsonStore, KeyValueStore, StoreError};
use crate::utils::{Clock, extract_hostname};

pub fn default_bookmarks() -> Vec<Bookmark> {
    vec![
        Bookmark {
            id: 1,
            name: "Google".to_string(),
            url: "https://google.com".to_string(),
        },
        Bookmark {
            id: 2,
            name: "React Docs".to_string(),
            url: "https://react.dev".to_string(),
        },
    ]
}

/// Pick the display name for a new bookmark.
///
/// A non-blank manual title wins outright and the lookup is skipped.
/// Otherwise the hostname is the fallback, replaced by the looked-up title
/// when the lookup succeeds with a non-empty one.
pub fn resolve_title(
    url: &str,
    manual_title: Option<&str>,
    metadata: &dyn LinkMetadataSource,
) -> String {
    if let Some(title) = manual_title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let fallback = extract_hostname(url);
    match metadata.fetch_title(url) {
        Ok(Some(title)) if !title.trim().is_empty() => title,
        Ok(_) => fallback,
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to fetch bookmark title");
            fallback
        }
    }
}

pub struct BookmarkManager<S> {
    store: JsonStore<S>,
    bookmarks: Vec<Bookmark>,
}

impl<S: KeyValueStore> BookmarkManager<S> {
    pub fn load(store: S) -> Self {
        let store = JsonStore::new(store);
        let bookmarks = store.get_or_else(BOOKMARKS_KEY, default_bookmarks);
        Self { store, bookmarks }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Add a bookmark; blank URLs are ignored and return `Ok(None)`
    pub fn add_bookmark(
        &mut self,
        url: &str,
        manual_title: Option<&str>,
        metadata: &dyn LinkMetadataSource,
        clock: &dyn Clock,
    ) -> Result<Option<Bookmark>, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }

        let name = resolve_title(url, manual_title, metadata);
        let bookmark = Bookmark {
            id: next_id(clock, &self.bookmarks),
            name,
            url: url.to_string(),
        };
        tracing::debug!(id = bookmark.id, url = %bookmark.url, "adding bookmark");
        self.bookmarks.push(bookmark.clone());
        self.persist()?;
        Ok(Some(bookmark))
    }

    pub fn delete_bookmark(&mut self, id: i64) -> Result<bool, StoreError> {
        if !remove_by_id(&mut self.bookmarks, id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.set(BOOKMARKS_KEY, &self.bookmarks)
    }
}
