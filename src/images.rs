use std::collections::{HashMap, HashSet};

use iced::widget::image::Handle;
use iced::Task;

use crate::media::Message;
use crate::tmdb::fetch_image_bytes;

/// In-memory poster and backdrop handles keyed by URL. Nothing is written
/// to disk.
#[derive(Debug, Default)]
pub struct ImageCache {
    cache: HashMap<String, Handle>,
    pending: HashSet<String>,
    failed: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.cache.get(url)
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.failed.remove(&url);
        self.cache.insert(url, handle);
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn mark_pending(&mut self, url: String) {
        self.pending.insert(url);
    }

    /// Failed URLs stay on the built-in placeholder tile for the session.
    pub fn mark_failed(&mut self, url: String) {
        self.pending.remove(&url);
        self.failed.insert(url);
    }

    pub fn needs_fetch(&self, url: &str) -> bool {
        self.get(url).is_none() && !self.is_pending(url) && !self.failed.contains(url)
    }

    /// `LoadImage` for every URL not yet cached, pending or failed.
    pub fn request<I>(&self, urls: I) -> Task<Message>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let tasks: Vec<Task<Message>> = urls
            .into_iter()
            .filter(|url| self.needs_fetch(url) && seen.insert(url.clone()))
            .map(|url| Task::done(Message::LoadImage(url)))
            .collect();
        Task::batch(tasks)
    }
}

pub fn load_image(cache: &mut ImageCache, url: String) -> Task<Message> {
    if !cache.needs_fetch(&url) {
        return Task::none();
    }
    cache.mark_pending(url.clone());

    Task::perform(
        async move {
            let bytes = fetch_image_bytes(url.clone()).await;
            (url, bytes)
        },
        |(url, result)| Message::ImageLoaded(url, result.map(Handle::from_bytes)),
    )
}

pub fn image_loaded(cache: &mut ImageCache, url: String, result: Result<Handle, String>) {
    match result {
        Ok(handle) => cache.insert(url, handle),
        Err(error) => {
            tracing::debug!(%url, %error, "image fetch failed");
            cache.mark_failed(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://image.tmdb.org/t/p/w500/a.jpg";

    #[test]
    fn test_pending_url_is_not_fetched_twice() {
        // Arrange
        let mut cache = ImageCache::new();

        // Act
        cache.mark_pending(String::from(URL));

        // Assert
        assert!(cache.is_pending(URL));
        assert!(!cache.needs_fetch(URL));
    }

    #[test]
    fn test_insert_clears_pending() {
        let mut cache = ImageCache::new();
        cache.mark_pending(String::from(URL));

        cache.insert(String::from(URL), Handle::from_bytes(vec![0_u8; 4]));

        assert!(!cache.is_pending(URL));
        assert!(cache.get(URL).is_some());
        assert!(!cache.needs_fetch(URL));
    }

    #[test]
    fn test_failed_image_is_not_retried() {
        // Arrange
        let mut cache = ImageCache::new();
        cache.mark_pending(String::from(URL));

        // Act
        image_loaded(&mut cache, String::from(URL), Err(String::from("404")));

        // Assert
        assert!(!cache.is_pending(URL));
        assert!(cache.get(URL).is_none());
        assert!(!cache.needs_fetch(URL));
    }
}
