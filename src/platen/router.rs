//! Fragment-style navigation addresses.
//!
//! An address is the part of a location after its first `#`, split on `/`:
//!
//! ```text
//! #               the home page
//! #about          the page with slug "about"
//! #blog           the blog landing page
//! #blog/a-post    the post with slug "a-post"
//! #settings/x     the setting with slug "x"
//! ```
//!
//! Parsing never fails. Anything that does not resolve to a stored item is
//! handled by the default-item fallback at resolution time, not here.

use crate::model::{ContentItem, ContentType, SiteData};

const BLOG_PREFIX: &str = "blog";
const SETTINGS_PREFIX: &str = "settings";
const HOME_SLUG: &str = "home";

/// Splits a raw location into address segments. Everything up to and
/// including the first `#` is dropped; a location without one is taken to be
/// the address itself.
pub fn parse_fragment(raw: &str) -> Vec<String> {
    let fragment = match raw.find('#') {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    };
    if fragment.is_empty() {
        return Vec::new();
    }
    fragment.split('/').map(str::to_string).collect()
}

/// A parsed navigation address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Page(String),
    Post(String),
    Setting(String),
}

impl Route {
    /// Parses address segments. The first segment disambiguates: the `blog`
    /// and `settings` keywords qualify a second segment, anything else is a
    /// page slug. Trailing segments beyond the grammar are ignored.
    pub fn parse<S: AsRef<str>>(segments: &[S]) -> Route {
        let mut parts = segments.iter().map(AsRef::as_ref);
        match parts.next() {
            None | Some("") => Route::Home,
            Some(BLOG_PREFIX) => match parts.next() {
                // A bare "blog" is the landing page itself
                None => Route::Page(BLOG_PREFIX.to_string()),
                Some(slug) => Route::Post(slug.to_string()),
            },
            Some(SETTINGS_PREFIX) => match parts.next() {
                None => Route::Page(SETTINGS_PREFIX.to_string()),
                Some(slug) => Route::Setting(slug.to_string()),
            },
            Some(slug) => Route::Page(slug.to_string()),
        }
    }

    pub fn from_fragment(raw: &str) -> Route {
        Route::parse(&parse_fragment(raw))
    }

    /// The collection and slug this route points at. The home route reads as
    /// the page named "home"; whether that page exists is the resolver's
    /// problem.
    pub fn target(&self) -> (ContentType, &str) {
        match self {
            Route::Home => (ContentType::Page, HOME_SLUG),
            Route::Page(slug) => (ContentType::Page, slug),
            Route::Post(slug) => (ContentType::Post, slug),
            Route::Setting(slug) => (ContentType::Setting, slug),
        }
    }

    /// The address for this route, without the leading `#`.
    pub fn fragment(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::Page(slug) => slug.clone(),
            Route::Post(slug) => format!("{}/{}", BLOG_PREFIX, slug),
            Route::Setting(slug) => format!("{}/{}", SETTINGS_PREFIX, slug),
        }
    }

    /// The canonical route for a stored item.
    pub fn for_item(item: &ContentItem) -> Route {
        match item.kind {
            ContentType::Post => Route::Post(item.slug.clone()),
            ContentType::Page => Route::Page(item.slug.clone()),
            ContentType::Setting => Route::Setting(item.slug.clone()),
        }
    }
}

/// Resolves a raw location against the site, falling back to the default
/// item when the address points at nothing.
pub fn resolve_address(data: &SiteData, raw: &str, landing_slug: &str) -> Option<ContentItem> {
    let route = Route::from_fragment(raw);
    let (kind, slug) = route.target();
    data.find(kind, slug)
        .or_else(|| data.default_item(landing_slug))
        .cloned()
}

/// The ambient navigation address, owned by the host.
///
/// The engine reads it when resolving and writes it when saves or editor
/// transitions move the visitor somewhere else. Fragments are stored without
/// the leading `#`.
pub trait AddressBar {
    fn fragment(&self) -> String;
    fn set_fragment(&mut self, fragment: &str);
}

/// Address bar backed by a plain string, for tests and terminal hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressBar {
    fragment: String,
}

impl InMemoryAddressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(fragment: &str) -> Self {
        Self {
            fragment: fragment.to_string(),
        }
    }
}

impl AddressBar for InMemoryAddressBar {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_location_has_no_segments() {
        assert!(parse_fragment("").is_empty());
        assert!(parse_fragment("#").is_empty());
    }

    #[test]
    fn segments_come_from_after_the_first_hash() {
        assert_eq!(parse_fragment("#blog/hello"), vec!["blog", "hello"]);
        assert_eq!(
            parse_fragment("http://localhost/#settings/site-name"),
            vec!["settings", "site-name"]
        );
    }

    #[test]
    fn location_without_a_hash_is_the_address_itself() {
        assert_eq!(parse_fragment("blog/hello"), vec!["blog", "hello"]);
    }

    #[test]
    fn no_segments_is_home() {
        assert_eq!(Route::parse::<&str>(&[]), Route::Home);
        assert_eq!(Route::from_fragment("#"), Route::Home);
    }

    #[test]
    fn one_segment_is_a_page_slug() {
        assert_eq!(Route::from_fragment("#about"), Route::Page("about".into()));
    }

    #[test]
    fn bare_blog_keyword_is_the_landing_page() {
        assert_eq!(Route::from_fragment("#blog"), Route::Page("blog".into()));
    }

    #[test]
    fn blog_prefix_qualifies_a_post_slug() {
        assert_eq!(
            Route::from_fragment("#blog/hello-world"),
            Route::Post("hello-world".into())
        );
    }

    #[test]
    fn settings_prefix_qualifies_a_setting_slug() {
        assert_eq!(
            Route::from_fragment("#settings/site-name"),
            Route::Setting("site-name".into())
        );
    }

    #[test]
    fn trailing_segments_are_ignored() {
        assert_eq!(
            Route::from_fragment("#blog/hello/extra"),
            Route::Post("hello".into())
        );
        assert_eq!(Route::from_fragment("#about/extra"), Route::Page("about".into()));
    }

    #[test]
    fn home_targets_the_home_page() {
        assert_eq!(Route::Home.target(), (ContentType::Page, "home"));
    }

    #[test]
    fn fragments_round_trip_through_parse() {
        for route in [
            Route::Page("about".into()),
            Route::Page("blog".into()),
            Route::Post("hello".into()),
            Route::Setting("site-name".into()),
            Route::Home,
        ] {
            assert_eq!(Route::from_fragment(&route.fragment()), route);
        }
    }

    #[test]
    fn resolve_address_finds_stored_items() {
        let data = SiteData::starter();
        let item = resolve_address(&data, "#blog/hello-platen", "blog").unwrap();
        assert_eq!(item.slug, "hello-platen");
        assert_eq!(item.kind, ContentType::Post);
    }

    #[test]
    fn resolve_address_falls_back_to_the_landing_page() {
        let data = SiteData::starter();
        let item = resolve_address(&data, "#no-such-page", "blog").unwrap();
        assert_eq!(item.slug, "blog");
    }

    #[test]
    fn resolve_address_on_an_empty_site_is_none() {
        assert!(resolve_address(&SiteData::default(), "#anything", "blog").is_none());
    }

    #[test]
    fn address_bar_stores_what_it_is_given() {
        let mut bar = InMemoryAddressBar::new();
        bar.set_fragment("blog/hello");
        assert_eq!(bar.fragment(), "blog/hello");
    }
}
