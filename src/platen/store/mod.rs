//! # Storage Layer
//!
//! This module defines the persistence abstraction for platen. The
//! [`StoreBackend`] trait covers the raw load/save of the whole site
//! aggregate; [`ContentStore`] layers the content operations the controllers
//! need on top of any backend.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** (browser storage, sync, etc.) without changing
//!   core logic
//! - Keep editing logic **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - The whole site lives in one `site.json` file
//!   - A missing or unreadable file loads as an empty site
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## Aggregate Pattern
//!
//! The site is always read and written as one [`SiteData`] aggregate. Every
//! mutating operation on [`ContentStore`] is a read-modify-write of that
//! aggregate, so a completed call means the change is persisted; there is no
//! separate flush step.
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <site dir>/
//! ├── site.json       # Posts, pages and settings (one JSON document)
//! └── config.json     # Site configuration
//! ```

use crate::error::{PlatenError, Result};
use crate::model::{slugify_title, ContentItem, ContentType, SiteData};
use crate::router::Route;
use chrono::Utc;

pub mod fs;
pub mod memory;

/// Raw persistence for the site aggregate.
pub trait StoreBackend {
    /// Load the whole site. Absent data loads as an empty site.
    fn load(&self) -> Result<SiteData>;

    /// Persist the whole site, replacing whatever was stored before.
    fn save(&mut self, data: &SiteData) -> Result<()>;
}

/// Content operations over any [`StoreBackend`].
///
/// Holds no cached copy of the data: each operation loads the aggregate,
/// applies its change and saves it back.
pub struct ContentStore<S: StoreBackend> {
    backend: S,
}

impl<S: StoreBackend> ContentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn load(&self) -> Result<SiteData> {
        self.backend.load()
    }

    pub fn save(&mut self, data: &SiteData) -> Result<()> {
        self.backend.save(data)
    }

    /// Look an item up by type and slug.
    pub fn resolve(&self, kind: ContentType, slug: &str) -> Result<Option<ContentItem>> {
        Ok(self.load()?.find(kind, slug).cloned())
    }

    /// Look the target of a parsed address up.
    pub fn resolve_route(&self, route: &Route) -> Result<Option<ContentItem>> {
        let (kind, slug) = route.target();
        self.resolve(kind, slug)
    }

    /// Create or update an item and return it as stored.
    ///
    /// A placeholder becomes a new post: it gets a slug derived from its
    /// title (made unique within posts), the next free id and fresh date
    /// stamps. Anything else must already exist; only its title, content and
    /// modified stamp change, so slug, id and creation date are stable across
    /// updates.
    pub fn upsert(&mut self, item: &ContentItem) -> Result<ContentItem> {
        let mut data = self.load()?;
        let now = Utc::now();

        let stored = if item.is_placeholder() {
            let mut new_post = item.clone();
            new_post.kind = ContentType::Post;
            new_post.slug = data.unique_slug(ContentType::Post, &slugify_title(&item.title));
            new_post.id = Some(data.next_post_id());
            new_post.date = now;
            new_post.modified = now;
            data.posts.push(new_post.clone());
            new_post
        } else {
            let existing = data
                .collection_mut(item.kind)
                .iter_mut()
                .find(|candidate| candidate.id == item.id && candidate.slug == item.slug)
                .ok_or_else(|| PlatenError::ItemNotFound(item.kind, item.slug.clone()))?;
            existing.title = item.title.clone();
            existing.content = item.content.clone();
            existing.modified = now;
            existing.clone()
        };

        self.save(&data)?;
        Ok(stored)
    }

    /// Remove a post by id and return it. Only posts can be deleted.
    pub fn delete_post(&mut self, id: u64) -> Result<ContentItem> {
        let mut data = self.load()?;
        let index = data
            .posts
            .iter()
            .position(|post| post.id == Some(id))
            .ok_or_else(|| PlatenError::ItemNotFound(ContentType::Post, format!("id {}", id)))?;
        let removed = data.posts.remove(index);
        self.save(&data)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryStore;
    use super::*;
    use crate::model::PLACEHOLDER_SLUG;

    fn store_with(data: SiteData) -> ContentStore<InMemoryStore> {
        ContentStore::new(InMemoryStore::with_data(data))
    }

    fn placeholder_titled(title: &str) -> ContentItem {
        let mut item = ContentItem::placeholder();
        item.title = title.to_string();
        item.content = format!("<p>{}</p>", title);
        item
    }

    #[test]
    fn upsert_placeholder_creates_a_post() {
        let mut store = store_with(SiteData::default());

        let stored = store.upsert(&placeholder_titled("Hello World")).unwrap();

        assert_eq!(stored.slug, "hello-world");
        assert_eq!(stored.id, Some(1));
        assert_eq!(stored.kind, ContentType::Post);
        assert_eq!(stored.date, stored.modified);

        let data = store.load().unwrap();
        assert_eq!(data.posts.len(), 1);
        assert_eq!(data.posts[0], stored);
    }

    #[test]
    fn upsert_placeholder_uniquifies_colliding_slugs() {
        let mut store = store_with(SiteData::default());
        store.upsert(&placeholder_titled("Launch")).unwrap();

        let second = store.upsert(&placeholder_titled("Launch")).unwrap();

        assert_eq!(second.slug, "launch-1");
        assert_eq!(second.id, Some(2));
    }

    #[test]
    fn upsert_existing_touches_title_content_and_modified_only() {
        let mut store = store_with(SiteData::default());
        let stored = store.upsert(&placeholder_titled("Launch")).unwrap();

        let mut edited = stored.clone();
        edited.title = "Launch Week".to_string();
        edited.content = "<p>changed</p>".to_string();
        let updated = store.upsert(&edited).unwrap();

        assert_eq!(updated.slug, "launch");
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.date, stored.date);
        assert_eq!(updated.title, "Launch Week");
        assert_eq!(updated.content, "<p>changed</p>");
        assert!(updated.modified >= stored.modified);
    }

    #[test]
    fn upsert_unchanged_item_touches_only_modified() {
        let mut store = store_with(SiteData::default());
        let stored = store.upsert(&placeholder_titled("Launch")).unwrap();

        let again = store.upsert(&stored).unwrap();

        assert_eq!(again.id, stored.id);
        assert_eq!(again.slug, stored.slug);
        assert_eq!(again.title, stored.title);
        assert_eq!(again.content, stored.content);
        assert_eq!(again.date, stored.date);
        assert!(again.modified >= stored.modified);
        assert_eq!(store.load().unwrap().posts.len(), 1);
    }

    #[test]
    fn upsert_unknown_item_is_not_found() {
        let mut store = store_with(SiteData::default());
        let mut ghost = ContentItem::new(
            ContentType::Page,
            "ghost".to_string(),
            "Ghost".to_string(),
            String::new(),
        );
        ghost.id = Some(9);

        let err = store.upsert(&ghost).unwrap_err();
        assert!(matches!(err, PlatenError::ItemNotFound(ContentType::Page, _)));
    }

    #[test]
    fn delete_post_removes_it_and_nothing_else() {
        let mut store = store_with(SiteData::starter());
        let before = store.load().unwrap();
        let stored = store.upsert(&placeholder_titled("Short Lived")).unwrap();

        let removed = store.delete_post(stored.id.unwrap()).unwrap();

        assert_eq!(removed.slug, "short-lived");
        assert!(store
            .resolve(ContentType::Post, "short-lived")
            .unwrap()
            .is_none());
        // Every other item, in every collection, is exactly as it was.
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn delete_post_with_unknown_id_is_not_found() {
        let mut store = store_with(SiteData::default());
        let err = store.delete_post(42).unwrap_err();
        assert!(matches!(err, PlatenError::ItemNotFound(ContentType::Post, _)));
    }

    #[test]
    fn resolve_is_scoped_to_one_collection() {
        let mut store = store_with(SiteData::starter());
        store.upsert(&placeholder_titled("About")).unwrap();

        let page = store.resolve(ContentType::Page, "about").unwrap().unwrap();
        let post = store.resolve(ContentType::Post, "about").unwrap().unwrap();

        assert_eq!(page.kind, ContentType::Page);
        assert_eq!(post.kind, ContentType::Post);
    }

    #[test]
    fn resolve_miss_is_ok_none() {
        let store = store_with(SiteData::default());
        assert!(store.resolve(ContentType::Post, "nope").unwrap().is_none());
    }

    #[test]
    fn placeholder_slug_never_survives_a_save() {
        let mut store = store_with(SiteData::default());
        let stored = store.upsert(&placeholder_titled("Anything")).unwrap();
        assert_ne!(stored.slug, PLACEHOLDER_SLUG);
    }
}
