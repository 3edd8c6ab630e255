use crate::models::CachedImage;
use crate::remote::PhotoSource;
use crate::store::{BACKGROUND_IMAGE_KEY, JsonStore, KeyValueStore};
use crate::utils::{Clock, calendar_day_string};

/// Daily background photo, cached per query.
pub struct BackgroundResolver<S> {
    store: JsonStore<S>,
}

impl<S: KeyValueStore> BackgroundResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: JsonStore::new(store),
        }
    }

    pub fn cached(&self) -> Option<CachedImage> {
        self.store.get(BACKGROUND_IMAGE_KEY)
    }

    /// Image URL for `query`, from today's cache entry or a fresh request.
    ///
    /// Returns `None` without any request when either input is empty, and
    /// `None` with the cache untouched when the request fails.
    pub fn resolve(
        &self,
        query: &str,
        api_key: Option<&str>,
        photos: &dyn PhotoSource,
        clock: &dyn Clock,
    ) -> Option<String> {
        let api_key = api_key.filter(|k| !k.is_empty())?;
        if query.is_empty() {
            return None;
        }

        let today = calendar_day_string(clock.today());
        if let Some(cached) = self.cached() {
            if cached.is_valid_for(&today, query) {
                tracing::debug!(query, "using cached background image");
                return Some(cached.url);
            }
        }

        let url = match photos.random_photo(query, api_key) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(query, error = %e, "failed to fetch background image");
                return None;
            }
        };

        let entry = CachedImage {
            url: url.clone(),
            date: today,
            stored_query: query.to_string(),
        };
        if let Err(e) = self.store.set(BACKGROUND_IMAGE_KEY, &entry) {
            tracing::warn!(error = %e, "failed to cache background image");
        }
        Some(url)
    }

    /// Like [`resolve`](Self::resolve), but only returns once the image has
    /// been fully downloaded, so callers never show a half-loaded image
    pub fn resolve_and_preload(
        &self,
        query: &str,
        api_key: Option<&str>,
        photos: &dyn PhotoSource,
        clock: &dyn Clock,
    ) -> Option<String> {
        let url = self.resolve(query, api_key, photos, clock)?;
        match photos.preload(&url) {
            Ok(bytes) => {
                tracing::debug!(bytes, "background image preloaded");
                Some(url)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to preload background image");
                None
            }
        }
    }
}
