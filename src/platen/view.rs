//! The visitor-facing side of the page.
//!
//! The view tracks one current item and renders it into the surface's title
//! and content anchors. When the current item is the landing page it also
//! renders the post list under the content. Site chrome (name, description,
//! main nav) renders separately so saves to settings can refresh it without
//! touching the content area.

use crate::model::{ContentItem, ContentType, SiteData, SITE_DESCRIPTION_SLUG, SITE_NAME_SLUG};
use crate::render::{Anchor, NodeId, NodeKind, RenderSurface, UiAction};
use crate::router::Route;

const INACTIVE_CLASS: &str = "inactive";
const EXCERPT_TRIGGER: usize = 100;
const EXCERPT_LEN: usize = 60;

pub struct View {
    current: Option<ContentItem>,
    links_enabled: bool,
    landing_slug: String,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            current: None,
            links_enabled: true,
            landing_slug: "blog".to_string(),
        }
    }

    pub fn with_landing_slug(mut self, slug: &str) -> Self {
        self.landing_slug = slug.to_string();
        self
    }

    pub fn current(&self) -> Option<&ContentItem> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, item: Option<ContentItem>) {
        self.current = item;
    }

    pub fn landing_slug(&self) -> &str {
        &self.landing_slug
    }

    pub fn links_enabled(&self) -> bool {
        self.links_enabled
    }

    /// Render the current item into the title and content anchors. On the
    /// landing page the post list follows the page's own content.
    pub fn update<R: RenderSurface>(&self, surface: &mut R, data: &SiteData) {
        let title = surface.anchor(Anchor::PageTitle);
        let content = surface.anchor(Anchor::PageContent);
        surface.clear_children(content);

        match &self.current {
            Some(item) => {
                surface.set_text(title, &item.title);
                surface.set_rich_text(content, &item.content);
                if item.kind == ContentType::Page && item.slug == self.landing_slug {
                    self.render_post_list(surface, content, data);
                }
            }
            None => {
                surface.set_text(title, "");
                surface.set_rich_text(content, "");
            }
        }
    }

    /// Render the site chrome: name, description and the page nav.
    pub fn render_chrome<R: RenderSurface>(&self, surface: &mut R, data: &SiteData) {
        if let Some(setting) = data.find(ContentType::Setting, SITE_NAME_SLUG) {
            let name = surface.anchor(Anchor::SiteName);
            surface.set_text(name, &setting.content);
        }
        if let Some(setting) = data.find(ContentType::Setting, SITE_DESCRIPTION_SLUG) {
            let description = surface.anchor(Anchor::SiteDescription);
            surface.set_text(description, &setting.content);
        }
        self.render_nav(surface, data);
    }

    /// Blank the title and content anchors without touching the current item.
    pub fn clear_content<R: RenderSurface>(&self, surface: &mut R) {
        let title = surface.anchor(Anchor::PageTitle);
        let content = surface.anchor(Anchor::PageContent);
        surface.set_text(title, "");
        surface.set_rich_text(content, "");
        surface.clear_children(content);
    }

    // Live hooks: the editor calls these on every keystroke so the page
    // previews unsaved edits.

    pub fn update_title<R: RenderSurface>(&self, surface: &mut R, text: &str) {
        let title = surface.anchor(Anchor::PageTitle);
        surface.set_text(title, text);
    }

    pub fn update_content<R: RenderSurface>(&self, surface: &mut R, markup: &str) {
        let content = surface.anchor(Anchor::PageContent);
        surface.set_rich_text(content, markup);
    }

    pub fn update_site_name<R: RenderSurface>(&self, surface: &mut R, text: &str) {
        let name = surface.anchor(Anchor::SiteName);
        surface.set_text(name, text);
    }

    pub fn update_site_description<R: RenderSurface>(&self, surface: &mut R, text: &str) {
        let description = surface.anchor(Anchor::SiteDescription);
        surface.set_text(description, text);
    }

    /// Enable or disable view links. While disabled the view root carries the
    /// `inactive` class and nav links render without bindings; hosts must not
    /// deliver actions bound under view anchors while the root is inactive.
    pub fn set_links_enabled<R: RenderSurface>(
        &mut self,
        surface: &mut R,
        data: &SiteData,
        enabled: bool,
    ) {
        self.links_enabled = enabled;
        let root = surface.anchor(Anchor::ViewRoot);
        if enabled {
            surface.remove_class(root, INACTIVE_CLASS);
        } else {
            surface.add_class(root, INACTIVE_CLASS);
        }
        self.render_nav(surface, data);
    }

    fn render_nav<R: RenderSurface>(&self, surface: &mut R, data: &SiteData) {
        let nav = surface.anchor(Anchor::MainNav);
        surface.clear_children(nav);
        for page in &data.pages {
            let item = surface.create(NodeKind::ListItem);
            let link = surface.create(NodeKind::Link);
            surface.set_text(link, &page.title);
            surface.set_attr(link, "href", &format!("#{}", page.slug));
            if self.links_enabled {
                surface.bind(link, UiAction::Navigate(Route::Page(page.slug.clone())));
            }
            surface.append(item, link);
            surface.append(nav, item);
        }
    }

    fn render_post_list<R: RenderSurface>(
        &self,
        surface: &mut R,
        container: NodeId,
        data: &SiteData,
    ) {
        for post in &data.posts {
            let route = Route::for_item(post);
            let article = surface.create(NodeKind::Block);
            let heading = surface.create(NodeKind::Heading);
            let link = surface.create(NodeKind::Link);
            surface.set_text(link, &post.title);
            surface.set_attr(link, "href", &format!("#{}", route.fragment()));
            if self.links_enabled {
                surface.bind(link, UiAction::Navigate(route));
            }
            surface.append(heading, link);
            surface.append(article, heading);

            let body = surface.create(NodeKind::Block);
            surface.set_rich_text(body, &excerpt(&post.content));
            surface.append(article, body);

            surface.append(container, article);
        }
    }
}

/// Shortens list entries: anything over 100 characters shows as its first 60
/// plus an ellipsis, markup and all.
fn excerpt(content: &str) -> String {
    if content.chars().count() > EXCERPT_TRIGGER {
        let mut cut: String = content.chars().take(EXCERPT_LEN).collect();
        cut.push('\u{2026}');
        cut
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tree::TreeSurface;

    fn view_at(data: &SiteData, kind: ContentType, slug: &str) -> View {
        let mut view = View::new();
        view.set_current(data.find(kind, slug).cloned());
        view
    }

    #[test]
    fn update_renders_the_current_item() {
        let data = SiteData::starter();
        let view = view_at(&data, ContentType::Page, "about");
        let mut surface = TreeSurface::new();

        view.update(&mut surface, &data);

        assert_eq!(surface.text_of(Anchor::PageTitle), "About");
        assert!(surface.text_of(Anchor::PageContent).contains("local-first"));
        assert!(surface.children_of(Anchor::PageContent).is_empty());
    }

    #[test]
    fn update_without_a_current_item_blanks_the_page() {
        let data = SiteData::default();
        let view = View::new();
        let mut surface = TreeSurface::new();

        view.update(&mut surface, &data);

        assert_eq!(surface.text_of(Anchor::PageTitle), "");
        assert_eq!(surface.text_of(Anchor::PageContent), "");
    }

    #[test]
    fn landing_page_lists_every_post() {
        let data = SiteData::starter();
        let view = view_at(&data, ContentType::Page, "blog");
        let mut surface = TreeSurface::new();

        view.update(&mut surface, &data);

        let articles = surface.children_of(Anchor::PageContent);
        assert_eq!(articles.len(), data.posts.len());

        let heading = surface.node(articles[0]).children[0];
        let link = surface.node(heading).children[0];
        assert_eq!(surface.node(link).text, "Hello Platen");
        assert_eq!(
            surface.node(link).attrs.get("href").map(String::as_str),
            Some("#blog/hello-platen")
        );
        assert_eq!(
            surface.node(link).binding,
            Some(UiAction::Navigate(Route::Post("hello-platen".to_string())))
        );
    }

    #[test]
    fn long_posts_are_excerpted_in_the_list() {
        let data = SiteData::starter();
        let view = view_at(&data, ContentType::Page, "blog");
        let mut surface = TreeSurface::new();

        view.update(&mut surface, &data);

        let article = surface.children_of(Anchor::PageContent)[0];
        let body = surface.node(article).children[1];
        let shown = &surface.node(body).text;
        assert!(shown.ends_with('\u{2026}'));
        assert_eq!(shown.chars().count(), EXCERPT_LEN + 1);
    }

    #[test]
    fn excerpt_leaves_short_content_alone() {
        assert_eq!(excerpt("short"), "short");
        let exactly_hundred: String = std::iter::repeat('x').take(100).collect();
        assert_eq!(excerpt(&exactly_hundred), exactly_hundred);
    }

    #[test]
    fn excerpt_cuts_on_characters_not_bytes() {
        let long: String = std::iter::repeat('é').take(120).collect();
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_LEN + 1);
    }

    #[test]
    fn chrome_renders_settings_and_page_nav() {
        let data = SiteData::starter();
        let view = View::new();
        let mut surface = TreeSurface::new();

        view.render_chrome(&mut surface, &data);

        assert_eq!(surface.text_of(Anchor::SiteName), "Platen");
        assert_eq!(
            surface.text_of(Anchor::SiteDescription),
            "A little site, edited in place"
        );
        assert_eq!(surface.children_of(Anchor::MainNav).len(), data.pages.len());
    }

    #[test]
    fn chrome_skips_missing_settings() {
        let data = SiteData::default();
        let view = View::new();
        let mut surface = TreeSurface::new();

        view.render_chrome(&mut surface, &data);

        assert!(surface.anchor_id(Anchor::SiteName).is_none());
    }

    #[test]
    fn disabling_links_marks_the_view_and_unbinds_the_nav() {
        let data = SiteData::starter();
        let mut view = View::new();
        let mut surface = TreeSurface::new();
        view.render_chrome(&mut surface, &data);
        assert!(!surface.bindings_under(Anchor::MainNav).is_empty());

        view.set_links_enabled(&mut surface, &data, false);

        assert!(surface.has_class(Anchor::ViewRoot, INACTIVE_CLASS));
        assert!(surface.bindings_under(Anchor::MainNav).is_empty());
        // Link nodes are still there for display, just not actionable.
        assert_eq!(surface.children_of(Anchor::MainNav).len(), data.pages.len());

        view.set_links_enabled(&mut surface, &data, true);
        assert!(!surface.has_class(Anchor::ViewRoot, INACTIVE_CLASS));
        assert!(!surface.bindings_under(Anchor::MainNav).is_empty());
    }

    #[test]
    fn live_hooks_write_straight_to_the_anchors() {
        let view = View::new();
        let mut surface = TreeSurface::new();

        view.update_title(&mut surface, "Draft Title");
        view.update_content(&mut surface, "<p>draft</p>");
        view.update_site_name(&mut surface, "New Name");
        view.update_site_description(&mut surface, "New tagline");

        assert_eq!(surface.text_of(Anchor::PageTitle), "Draft Title");
        assert_eq!(surface.text_of(Anchor::PageContent), "<p>draft</p>");
        assert_eq!(surface.text_of(Anchor::SiteName), "New Name");
        assert_eq!(surface.text_of(Anchor::SiteDescription), "New tagline");
    }
}
