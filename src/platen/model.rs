use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Slug reserved for a post that exists only in the editor session and has
/// not been written to the store yet.
pub const PLACEHOLDER_SLUG: &str = "_new";

/// Well-known setting slugs wired to the site chrome.
pub const SITE_NAME_SLUG: &str = "site-name";
pub const SITE_DESCRIPTION_SLUG: &str = "site-description";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Page,
    Setting,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Post, ContentType::Page, ContentType::Setting];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Page => "page",
            ContentType::Setting => "setting",
        }
    }

    /// Name of the collection the type belongs to, as it appears in the
    /// stored site file and in menu headings.
    pub fn collection_name(&self) -> &'static str {
        match self {
            ContentType::Post => "posts",
            ContentType::Page => "pages",
            ContentType::Setting => "settings",
        }
    }

    /// Parses a user-supplied type name, accepting singular and plural forms.
    pub fn parse(name: &str) -> Option<ContentType> {
        match name.trim().to_lowercase().as_str() {
            "post" | "posts" => Some(ContentType::Post),
            "page" | "pages" => Some(ContentType::Page),
            "setting" | "settings" => Some(ContentType::Setting),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    // Only posts receive ids; None also marks the unsaved placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(kind: ContentType, slug: String, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            kind,
            slug,
            title,
            content,
            date: now,
            modified: now,
        }
    }

    /// A fresh, unsaved post as the editor's "add new" action creates it.
    pub fn placeholder() -> Self {
        Self::new(
            ContentType::Post,
            PLACEHOLDER_SLUG.to_string(),
            String::new(),
            String::new(),
        )
    }

    pub fn is_placeholder(&self) -> bool {
        self.slug == PLACEHOLDER_SLUG
    }
}

/// The whole persisted site: three flat collections, loaded and saved as one
/// aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(default)]
    pub posts: Vec<ContentItem>,
    #[serde(default)]
    pub pages: Vec<ContentItem>,
    #[serde(default)]
    pub settings: Vec<ContentItem>,
}

impl SiteData {
    pub fn collection(&self, kind: ContentType) -> &[ContentItem] {
        match kind {
            ContentType::Post => &self.posts,
            ContentType::Page => &self.pages,
            ContentType::Setting => &self.settings,
        }
    }

    pub fn collection_mut(&mut self, kind: ContentType) -> &mut Vec<ContentItem> {
        match kind {
            ContentType::Post => &mut self.posts,
            ContentType::Page => &mut self.pages,
            ContentType::Setting => &mut self.settings,
        }
    }

    pub fn find(&self, kind: ContentType, slug: &str) -> Option<&ContentItem> {
        self.collection(kind).iter().find(|item| item.slug == slug)
    }

    /// Next free post id: one past the highest id in use, starting at 1.
    pub fn next_post_id(&self) -> u64 {
        self.posts
            .iter()
            .filter_map(|post| post.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Returns `candidate` if no item of `kind` uses it yet, otherwise the
    /// first free variant among `candidate-1`, `candidate-2`, ...
    pub fn unique_slug(&self, kind: ContentType, candidate: &str) -> String {
        let taken: HashSet<&str> = self
            .collection(kind)
            .iter()
            .map(|item| item.slug.as_str())
            .collect();
        if !taken.contains(candidate) {
            return candidate.to_string();
        }
        let mut n = 1u64;
        loop {
            let variant = format!("{}-{}", candidate, n);
            if !taken.contains(variant.as_str()) {
                return variant;
            }
            n += 1;
        }
    }

    /// The item shown when an address resolves to nothing: the landing page,
    /// then a page named "home", then any page, then the newest post.
    pub fn default_item(&self, landing_slug: &str) -> Option<&ContentItem> {
        self.find(ContentType::Page, landing_slug)
            .or_else(|| self.find(ContentType::Page, "home"))
            .or_else(|| self.pages.first())
            .or_else(|| self.posts.iter().max_by_key(|post| post.date))
    }

    /// Seed content for a brand new site.
    pub fn starter() -> SiteData {
        STARTER.clone()
    }
}

/// Turns a title into its address form: trim, drop anything that is not
/// alphanumeric or whitespace, lowercase, then map each whitespace character
/// to a hyphen. Runs of spaces become runs of hyphens on purpose.
pub fn slugify_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| {
            if c.is_whitespace() {
                '-'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

static STARTER: Lazy<SiteData> = Lazy::new(|| {
    let post = |id: u64, slug: &str, title: &str, content: &str| {
        let mut item = ContentItem::new(
            ContentType::Post,
            slug.to_string(),
            title.to_string(),
            content.to_string(),
        );
        item.id = Some(id);
        item
    };
    let page = |id: u64, slug: &str, title: &str, content: &str| {
        let mut item = ContentItem::new(
            ContentType::Page,
            slug.to_string(),
            title.to_string(),
            content.to_string(),
        );
        item.id = Some(id);
        item
    };
    let setting = |id: u64, slug: &str, title: &str, content: &str| {
        let mut item = ContentItem::new(
            ContentType::Setting,
            slug.to_string(),
            title.to_string(),
            content.to_string(),
        );
        item.id = Some(id);
        item
    };

    SiteData {
        posts: vec![
            post(
                1,
                "hello-platen",
                "Hello Platen",
                "<p>This is your first post. Open the editor, change a few words \
                 and save. The list under the blog page picks the change up right \
                 away, and so does the stored site file.</p>",
            ),
            post(
                2,
                "writing-posts",
                "Writing Posts",
                "<p>New posts get an address under blog/ built from their title. \
                 Add one from the posts menu in the editor and watch the address \
                 bar follow it after the first save.</p>",
            ),
        ],
        pages: vec![
            page(
                1,
                "home",
                "Home",
                "<p>Welcome to your new Platen site. Everything here lives in one \
                 local file, and the overlay editor changes it in place.</p>",
            ),
            page(
                2,
                "about",
                "About",
                "<p>Platen is a local-first blog engine. This page is a good spot \
                 to say who you are.</p>",
            ),
            page(3, "blog", "Blog", "<p>Latest posts.</p>"),
        ],
        settings: vec![
            setting(1, "site-name", "Site Name", "Platen"),
            setting(
                2,
                "site-description",
                "Site Description",
                "A little site, edited in place",
            ),
        ],
    }
});
