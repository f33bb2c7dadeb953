use super::StoreBackend;
use crate::error::Result;
use crate::model::SiteData;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    data: SiteData,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SiteData) -> Self {
        Self { data }
    }
}

impl StoreBackend for InMemoryStore {
    fn load(&self) -> Result<SiteData> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &SiteData) -> Result<()> {
        self.data = data.clone();
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{ContentItem, ContentType};

    pub struct SiteFixture {
        pub data: SiteData,
    }

    impl Default for SiteFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SiteFixture {
        pub fn new() -> Self {
            Self {
                data: SiteData::default(),
            }
        }

        pub fn starter() -> Self {
            Self {
                data: SiteData::starter(),
            }
        }

        pub fn with_post(mut self, slug: &str, title: &str, content: &str) -> Self {
            let mut post = ContentItem::new(
                ContentType::Post,
                slug.to_string(),
                title.to_string(),
                content.to_string(),
            );
            post.id = Some(self.data.next_post_id());
            self.data.posts.push(post);
            self
        }

        pub fn with_page(mut self, slug: &str, title: &str, content: &str) -> Self {
            self.data.pages.push(ContentItem::new(
                ContentType::Page,
                slug.to_string(),
                title.to_string(),
                content.to_string(),
            ));
            self
        }

        pub fn with_setting(mut self, slug: &str, title: &str, content: &str) -> Self {
            self.data.settings.push(ContentItem::new(
                ContentType::Setting,
                slug.to_string(),
                title.to_string(),
                content.to_string(),
            ));
            self
        }

        pub fn build(self) -> InMemoryStore {
            InMemoryStore::with_data(self.data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::SiteFixture;
    use super::*;

    #[test]
    fn starts_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().unwrap(), SiteData::default());
    }

    #[test]
    fn save_replaces_the_whole_aggregate() {
        let mut store = InMemoryStore::with_data(SiteData::starter());

        let replacement = SiteFixture::new()
            .with_page("only", "Only Page", "<p>alone</p>")
            .data;
        store.save(&replacement).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, replacement);
        assert!(loaded.posts.is_empty());
    }

    #[test]
    fn fixture_posts_get_sequential_ids() {
        let store = SiteFixture::new()
            .with_post("first", "First", "<p>1</p>")
            .with_post("second", "Second", "<p>2</p>")
            .build();

        let data = store.load().unwrap();
        assert_eq!(data.posts[0].id, Some(1));
        assert_eq!(data.posts[1].id, Some(2));
        assert_eq!(data.next_post_id(), 3);
    }
}
