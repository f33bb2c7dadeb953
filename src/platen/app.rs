//! One running site: store, view, editor and the host-provided collaborators,
//! wired together behind a single dispatch entry point.
//!
//! Hosts construct an [`App`] from their five collaborator implementations,
//! call [`App::boot`] once, then feed every interaction through
//! [`App::dispatch`] and poll [`App::tick`] from their render loop. The
//! controllers never call back into the host; everything the host needs to
//! draw is on the render surface afterwards.

use std::time::Instant;

use crate::editor::{ConfirmPrompt, Editor};
use crate::error::Result;
use crate::render::{RenderSurface, UiAction};
use crate::router::{resolve_address, AddressBar, Route};
use crate::store::{ContentStore, StoreBackend};
use crate::view::View;
use crate::widget::WidgetFactory;

pub struct App<S, R, A, C, F>
where
    S: StoreBackend,
    R: RenderSurface,
    A: AddressBar,
    C: ConfirmPrompt,
    F: WidgetFactory,
{
    store: ContentStore<S>,
    view: View,
    editor: Editor<F::Widget>,
    surface: R,
    address: A,
    confirm: C,
    widgets: F,
}

impl<S, R, A, C, F> App<S, R, A, C, F>
where
    S: StoreBackend,
    R: RenderSurface,
    A: AddressBar,
    C: ConfirmPrompt,
    F: WidgetFactory,
{
    pub fn new(backend: S, surface: R, address: A, confirm: C, widgets: F) -> Self {
        Self {
            store: ContentStore::new(backend),
            view: View::new(),
            editor: Editor::new(),
            surface,
            address,
            confirm,
            widgets,
        }
    }

    /// Use a landing page other than "blog". Call before [`App::boot`].
    pub fn with_landing_slug(mut self, slug: &str) -> Self {
        self.view = std::mem::take(&mut self.view).with_landing_slug(slug);
        self
    }

    /// First render: chrome, the item the address resolves to, and the
    /// closed editor shell.
    pub fn boot(&mut self) -> Result<()> {
        let data = self.store.load()?;
        self.editor.init(&mut self.surface);
        self.view.render_chrome(&mut self.surface, &data);
        let current = resolve_address(&data, &self.address.fragment(), self.view.landing_slug());
        self.view.set_current(current);
        self.view.update(&mut self.surface, &data);
        Ok(())
    }

    /// Apply one interaction.
    pub fn dispatch(&mut self, action: UiAction) -> Result<()> {
        match action {
            UiAction::Navigate(route) => self.navigate(&route),
            UiAction::ToggleEditor => self.editor.toggle(
                &self.store,
                &mut self.view,
                &mut self.surface,
                &mut self.address,
                &mut self.widgets,
            ),
            UiAction::EditorHome => {
                self.editor.go_home(&mut self.surface);
                Ok(())
            }
            UiAction::ChooseType(kind) => {
                self.editor.choose_type(&self.store, &mut self.surface, kind)
            }
            UiAction::OpenItem(kind, slug) => self.editor.open_item(
                &self.store,
                &mut self.view,
                &mut self.surface,
                &mut self.widgets,
                kind,
                &slug,
            ),
            UiAction::NewPost => {
                self.editor
                    .new_post(&mut self.view, &mut self.surface, &mut self.widgets);
                Ok(())
            }
            UiAction::Save => self.editor.save(
                &mut self.store,
                &mut self.view,
                &mut self.surface,
                &mut self.address,
                Instant::now(),
            ),
            UiAction::Delete => self.editor.delete(
                &mut self.store,
                &mut self.view,
                &mut self.surface,
                &mut self.confirm,
            ),
            UiAction::TitleInput(text) => {
                self.editor.title_input(&self.view, &mut self.surface, &text);
                Ok(())
            }
            UiAction::ContentInput(markup) => {
                self.editor
                    .content_input(&self.view, &mut self.surface, &markup);
                Ok(())
            }
        }
    }

    /// Flush time-based cosmetics (the save-button label sequence).
    pub fn tick(&mut self, now: Instant) {
        self.editor.tick(&mut self.surface, now);
    }

    fn navigate(&mut self, route: &Route) -> Result<()> {
        self.address.set_fragment(&route.fragment());
        let data = self.store.load()?;
        let current = resolve_address(&data, &route.fragment(), self.view.landing_slug());
        self.view.set_current(current);
        self.view.update(&mut self.surface, &data);
        // Navigating under an open editor re-binds the session to the new
        // item; an unsaved placeholder is discarded.
        if self.editor.is_open() {
            self.editor
                .rebind_to_view(&self.view, &mut self.surface, &mut self.widgets);
        }
        Ok(())
    }

    pub fn store(&self) -> &ContentStore<S> {
        &self.store
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn editor(&self) -> &Editor<F::Widget> {
        &self.editor
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn address(&self) -> &A {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ScriptedConfirm;
    use crate::model::{ContentType, SiteData};
    use crate::render::tree::TreeSurface;
    use crate::render::Anchor;
    use crate::router::InMemoryAddressBar;
    use crate::store::memory::InMemoryStore;
    use crate::widget::BufferWidgetFactory;

    type TestApp = App<
        InMemoryStore,
        TreeSurface,
        InMemoryAddressBar,
        ScriptedConfirm,
        BufferWidgetFactory,
    >;

    fn app_over(data: SiteData, fragment: &str) -> TestApp {
        let mut app = App::new(
            InMemoryStore::with_data(data),
            TreeSurface::new(),
            InMemoryAddressBar::at(fragment),
            ScriptedConfirm::answering(&[true]),
            BufferWidgetFactory::new(),
        );
        app.boot().unwrap();
        app
    }

    #[test]
    fn boot_resolves_the_address_and_renders() {
        let app = app_over(SiteData::starter(), "about");
        assert_eq!(app.view().current().map(|i| i.slug.as_str()), Some("about"));
        assert_eq!(app.surface().text_of(Anchor::PageTitle), "About");
        assert_eq!(app.surface().text_of(Anchor::SiteName), "Platen");
        assert!(app.surface().has_class(Anchor::EditorRoot, "hidden"));
    }

    #[test]
    fn boot_on_a_bad_address_falls_back_to_the_landing_page() {
        let app = app_over(SiteData::starter(), "no-such-page");
        assert_eq!(app.view().current().map(|i| i.slug.as_str()), Some("blog"));
    }

    #[test]
    fn navigate_moves_address_view_and_page() {
        let mut app = app_over(SiteData::starter(), "");
        app.dispatch(UiAction::Navigate(Route::Post("hello-platen".into())))
            .unwrap();

        assert_eq!(app.address().fragment(), "blog/hello-platen");
        assert_eq!(
            app.view().current().map(|i| i.slug.as_str()),
            Some("hello-platen")
        );
        assert_eq!(app.surface().text_of(Anchor::PageTitle), "Hello Platen");
    }

    #[test]
    fn navigating_under_an_open_editor_rebinds_the_session() {
        let mut app = app_over(SiteData::starter(), "about");
        app.dispatch(UiAction::ToggleEditor).unwrap();
        app.dispatch(UiAction::Navigate(Route::Post("hello-platen".into())))
            .unwrap();

        assert!(app.editor().is_open());
        assert_eq!(
            app.editor().session().current.as_ref().map(|i| i.slug.as_str()),
            Some("hello-platen")
        );
        assert_eq!(app.surface().text_of(Anchor::EditTitle), "Hello Platen");
    }

    #[test]
    fn navigation_discards_a_placeholder_session() {
        let mut app = app_over(SiteData::starter(), "about");
        app.dispatch(UiAction::ToggleEditor).unwrap();
        app.dispatch(UiAction::EditorHome).unwrap();
        app.dispatch(UiAction::ChooseType(ContentType::Post)).unwrap();
        app.dispatch(UiAction::NewPost).unwrap();

        app.dispatch(UiAction::Navigate(Route::Page("home".into())))
            .unwrap();

        let bound = app.editor().session().current.as_ref();
        assert_eq!(bound.map(|i| i.slug.as_str()), Some("home"));
    }

    #[test]
    fn the_toggle_binding_survives_a_full_session() {
        let mut app = app_over(SiteData::starter(), "");
        app.dispatch(UiAction::ToggleEditor).unwrap();
        app.dispatch(UiAction::ToggleEditor).unwrap();

        let toggle = app.surface().anchor_id(Anchor::EditorToggle).unwrap();
        assert_eq!(
            app.surface().node(toggle).binding,
            Some(UiAction::ToggleEditor)
        );
    }

    #[test]
    fn landing_slug_is_configurable() {
        let mut data = SiteData::starter();
        for page in &mut data.pages {
            if page.slug == "blog" {
                page.slug = "journal".to_string();
            }
        }
        let mut app = App::new(
            InMemoryStore::with_data(data),
            TreeSurface::new(),
            InMemoryAddressBar::at("nowhere"),
            ScriptedConfirm::answering(&[]),
            BufferWidgetFactory::new(),
        )
        .with_landing_slug("journal");
        app.boot().unwrap();

        assert_eq!(app.view().current().map(|i| i.slug.as_str()), Some("journal"));
        // The landing page lists posts wherever it lives
        assert_eq!(
            app.surface().children_of(Anchor::PageContent).len(),
            app.store().load().unwrap().posts.len()
        );
    }
}
