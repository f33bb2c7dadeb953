//! The overlay editor.
//!
//! The editor sits on top of the view as a hidden panel. Opening it binds the
//! item the view is showing into an edit session; everything after that is a
//! small state machine over three admin menus:
//!
//! ```text
//! primary (type chooser) -> secondary (item list) -> edit panel
//!        ^      "Admin" crumb      |   type crumb       |
//!        +-------------------------+--------------------+
//! ```
//!
//! Exactly one menu is active while the editor is open. Every transition
//! clears the previous menu's nodes and rebuilds its own, so bindings never
//! outlive the menu that created them.
//!
//! Edits preview live on the page through the view's hooks but touch the
//! store only on save. Closing the editor re-syncs the address from the
//! viewed item and re-renders from the store, so an unsaved preview does not
//! outlive the session that typed it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::{PlatenError, Result};
use crate::model::{
    ContentItem, ContentType, SiteData, SITE_DESCRIPTION_SLUG, SITE_NAME_SLUG,
};
use crate::render::{Anchor, NodeKind, RenderSurface, UiAction};
use crate::router::{resolve_address, AddressBar, Route};
use crate::store::{ContentStore, StoreBackend};
use crate::view::View;
use crate::widget::{RichTextWidget, WidgetFactory};

const ACTIVE_CLASS: &str = "active";
const HIDDEN_CLASS: &str = "hidden";
const OPEN_CLASS: &str = "open";

const SAVING_LABEL: &str = "Saving...";
const SAVED_LABEL: &str = "Saved!";
const SAVE_LABEL: &str = "Save";
const UPDATE_LABEL: &str = "Update";
const HOME_CRUMB: &str = "Admin";
const DELETE_PROMPT: &str = "Are you sure you want to delete this post?";

/// How long the save button reads "Saving..." before flipping to "Saved!".
pub const SAVED_DELAY: Duration = Duration::from_millis(900);
/// How long "Saved!" stays up before the button returns to its resting label.
pub const RESTING_DELAY: Duration = Duration::from_millis(1000);

/// Which admin menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Primary,
    Secondary,
    Edit,
}

/// Everything the editor knows between interactions.
#[derive(Debug, Clone)]
pub struct Session {
    /// The item bound to the edit form, unsaved edits included.
    pub current: Option<ContentItem>,
    /// The collection the admin menus are working through.
    pub kind: Option<ContentType>,
    pub menu: Menu,
    pub visible: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current: None,
            kind: None,
            menu: Menu::Edit,
            visible: false,
        }
    }
}

/// Asks the visitor to confirm a destructive step.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Prompt with canned answers, for tests and non-interactive hosts. Once the
/// answers run out it refuses everything.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
}

impl ScriptedConfirm {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
        }
    }
}

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Pending save-button labels, keyed by the moment they come due.
///
/// Saves are synchronous; the "Saving... / Saved!" exchange is purely
/// cosmetic. Instead of sleeping, the indicator records deadlines and the
/// host polls [`Editor::tick`]. Overlapping saves queue their steps side by
/// side and the latest-scheduled step wins a tie, so the button always ends
/// on the newest sequence's label.
#[derive(Debug, Default)]
struct SaveIndicator {
    steps: Vec<(Instant, &'static str)>,
}

impl SaveIndicator {
    fn begin(&mut self, now: Instant) {
        self.steps.push((now + SAVED_DELAY, SAVED_LABEL));
        self.steps.push((now + SAVED_DELAY + RESTING_DELAY, UPDATE_LABEL));
    }

    fn poll(&mut self, now: Instant) -> Option<&'static str> {
        let mut latest: Option<(Instant, &'static str)> = None;
        for (at, label) in &self.steps {
            if *at <= now {
                match latest {
                    Some((t, _)) if *at < t => {}
                    _ => latest = Some((*at, *label)),
                }
            }
        }
        self.steps.retain(|(at, _)| *at > now);
        latest.map(|(_, label)| label)
    }
}

pub struct Editor<W: RichTextWidget> {
    session: Session,
    widget: Option<W>,
    indicator: SaveIndicator,
}

impl<W: RichTextWidget> Default for Editor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: RichTextWidget> Editor<W> {
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            widget: None,
            indicator: SaveIndicator::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session.visible
    }

    /// The live content widget, while the edit panel is up.
    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    /// One-time surface setup: hide the overlay and bind the toggle.
    pub fn init<R: RenderSurface>(&mut self, surface: &mut R) {
        let root = surface.anchor(Anchor::EditorRoot);
        surface.add_class(root, HIDDEN_CLASS);
        let toggle = surface.anchor(Anchor::EditorToggle);
        surface.bind(toggle, UiAction::ToggleEditor);
    }

    /// Open the overlay on the viewed item, or close it and hand the page
    /// back to the visitor.
    pub fn toggle<S, R, A, F>(
        &mut self,
        store: &ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        address: &mut A,
        factory: &mut F,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        A: AddressBar,
        F: WidgetFactory<Widget = W>,
    {
        if self.session.visible {
            self.close(store, view, surface, address)
        } else {
            self.open(store, view, surface, factory)
        }
    }

    fn open<S, R, F>(
        &mut self,
        store: &ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        factory: &mut F,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        F: WidgetFactory<Widget = W>,
    {
        let data = store.load()?;
        self.session.visible = true;
        self.session.current = view.current().cloned();
        self.session.kind = self.session.current.as_ref().map(|item| item.kind);

        let root = surface.anchor(Anchor::EditorRoot);
        surface.remove_class(root, HIDDEN_CLASS);
        let toggle = surface.anchor(Anchor::EditorToggle);
        surface.add_class(toggle, OPEN_CLASS);

        view.set_links_enabled(surface, &data, false);
        view.update(surface, &data);

        self.clear_menus(surface);
        self.show_edit_panel(surface, factory);
        Ok(())
    }

    fn close<S, R, A>(
        &mut self,
        store: &ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        address: &mut A,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        A: AddressBar,
    {
        let data = store.load()?;
        self.session.visible = false;

        let root = surface.anchor(Anchor::EditorRoot);
        surface.add_class(root, HIDDEN_CLASS);
        let toggle = surface.anchor(Anchor::EditorToggle);
        surface.remove_class(toggle, OPEN_CLASS);

        let had_placeholder = self
            .session
            .current
            .as_ref()
            .map(ContentItem::is_placeholder)
            .unwrap_or(false);
        if had_placeholder {
            self.session.current = None;
        }
        // The address resyncs from the viewed item; discarding an unsaved
        // draft over anything but a post lands on the landing page instead.
        match view.current() {
            Some(viewed) if viewed.kind == ContentType::Post || !had_placeholder => {
                address.set_fragment(&Route::for_item(viewed).fragment());
            }
            Some(_) => address.set_fragment(view.landing_slug()),
            None if had_placeholder => address.set_fragment(view.landing_slug()),
            None => {}
        }

        self.clear_edit_form(surface);
        self.clear_menus(surface);

        view.set_links_enabled(surface, &data, true);
        let current = resolve_address(&data, &address.fragment(), view.landing_slug());
        view.set_current(current);
        view.update(surface, &data);
        Ok(())
    }

    /// Back to the type chooser; drops whatever item was bound.
    pub fn go_home<R: RenderSurface>(&mut self, surface: &mut R) {
        self.session.current = None;
        self.session.kind = None;
        self.clear_edit_form(surface);
        self.clear_menus(surface);
        self.show_primary(surface);
    }

    /// Show the item list for one collection.
    pub fn choose_type<S, R>(
        &mut self,
        store: &ContentStore<S>,
        surface: &mut R,
        kind: ContentType,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
    {
        let data = store.load()?;
        self.session.kind = Some(kind);
        self.clear_edit_form(surface);
        self.clear_menus(surface);
        self.show_secondary(surface, &data);
        Ok(())
    }

    /// Load a stored item into the edit form. Posts and pages also become
    /// the viewed item so edits preview in place; the address stays put
    /// until a save re-derives it.
    pub fn open_item<S, R, F>(
        &mut self,
        store: &ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        factory: &mut F,
        kind: ContentType,
        slug: &str,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        F: WidgetFactory<Widget = W>,
    {
        let data = store.load()?;
        let item = data
            .find(kind, slug)
            .cloned()
            .ok_or_else(|| PlatenError::ItemNotFound(kind, slug.to_string()))?;

        self.session.kind = Some(kind);
        self.session.current = Some(item.clone());
        if kind != ContentType::Setting {
            view.set_current(Some(item));
            view.update(surface, &data);
        }

        self.clear_menus(surface);
        self.show_edit_panel(surface, factory);
        Ok(())
    }

    /// Bind a fresh, unsaved post to the edit form.
    pub fn new_post<R, F>(&mut self, view: &mut View, surface: &mut R, factory: &mut F)
    where
        R: RenderSurface,
        F: WidgetFactory<Widget = W>,
    {
        self.session.current = Some(ContentItem::placeholder());
        self.session.kind = Some(ContentType::Post);
        view.clear_content(surface);
        self.clear_menus(surface);
        self.show_edit_panel(surface, factory);
    }

    /// Re-bind the session to whatever the view is showing now. Called when
    /// navigation happens under an open editor; an unsaved placeholder is
    /// discarded.
    pub fn rebind_to_view<R, F>(&mut self, view: &View, surface: &mut R, factory: &mut F)
    where
        R: RenderSurface,
        F: WidgetFactory<Widget = W>,
    {
        self.session.current = view.current().cloned();
        self.session.kind = self.session.current.as_ref().map(|item| item.kind);
        self.clear_menus(surface);
        self.show_edit_panel(surface, factory);
    }

    /// The title field changed. Settings titles are locked and ignore this.
    pub fn title_input<R: RenderSurface>(&mut self, view: &View, surface: &mut R, text: &str) {
        let Some(item) = self.session.current.as_mut() else {
            return;
        };
        if item.kind == ContentType::Setting {
            return;
        }
        item.title = text.to_string();
        let field = surface.anchor(Anchor::EditTitle);
        surface.set_text(field, text);
        view.update_title(surface, text);
    }

    /// The content widget changed. Posts and pages preview into the page
    /// body; the two chrome settings route to their own hooks, other
    /// settings update silently.
    pub fn content_input<R: RenderSurface>(&mut self, view: &View, surface: &mut R, markup: &str) {
        let Some(item) = self.session.current.as_mut() else {
            return;
        };
        item.content = markup.to_string();
        if let Some(widget) = self.widget.as_mut() {
            widget.load(markup);
        }
        match item.kind {
            ContentType::Setting => match item.slug.as_str() {
                SITE_NAME_SLUG => view.update_site_name(surface, markup),
                SITE_DESCRIPTION_SLUG => view.update_site_description(surface, markup),
                _ => {}
            },
            _ => view.update_content(surface, markup),
        }
    }

    /// Persist the bound item and kick off the save-button label sequence.
    pub fn save<S, R, A>(
        &mut self,
        store: &mut ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        address: &mut A,
        now: Instant,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        A: AddressBar,
    {
        let Some(mut item) = self.session.current.clone() else {
            return Ok(());
        };
        if let Some(widget) = &self.widget {
            item.content = widget.read();
        }

        let stored = store.upsert(&item)?;
        self.session.current = Some(stored.clone());
        self.session.kind = Some(stored.kind);

        let data = store.load()?;
        match stored.kind {
            // Settings have no page address and refresh the chrome instead
            ContentType::Setting => view.render_chrome(surface, &data),
            _ => {
                address.set_fragment(&Route::for_item(&stored).fragment());
                view.set_current(Some(stored));
            }
        }
        view.update(surface, &data);

        let button = surface.anchor(Anchor::SaveButton);
        surface.set_text(button, SAVING_LABEL);
        self.indicator.begin(now);
        Ok(())
    }

    /// Delete the bound post after confirmation. Pages and settings cannot
    /// be deleted, and an unsaved placeholder has nothing to delete.
    pub fn delete<S, R, C>(
        &mut self,
        store: &mut ContentStore<S>,
        view: &mut View,
        surface: &mut R,
        confirm: &mut C,
    ) -> Result<()>
    where
        S: StoreBackend,
        R: RenderSurface,
        C: ConfirmPrompt,
    {
        let Some(item) = self.session.current.clone() else {
            return Ok(());
        };
        if item.kind != ContentType::Post {
            return Ok(());
        }
        let Some(id) = item.id else {
            return Ok(());
        };
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(());
        }

        store.delete_post(id)?;
        let data = store.load()?;
        self.session.current = None;

        // The address is left alone on purpose: it may now point at
        // nothing, which the resolver's fallback absorbs next time.
        view.set_current(data.default_item(view.landing_slug()).cloned());
        view.update(surface, &data);

        self.clear_edit_form(surface);
        self.clear_menus(surface);
        self.show_secondary(surface, &data);
        Ok(())
    }

    /// Flush any save-button label that came due by `now`.
    pub fn tick<R: RenderSurface>(&mut self, surface: &mut R, now: Instant) {
        if let Some(label) = self.indicator.poll(now) {
            let button = surface.anchor(Anchor::SaveButton);
            surface.set_text(button, label);
        }
    }

    fn clear_menus<R: RenderSurface>(&mut self, surface: &mut R) {
        for anchor in [Anchor::NavPrimary, Anchor::NavSecondary, Anchor::NavEdit] {
            let id = surface.anchor(anchor);
            surface.remove_class(id, ACTIVE_CLASS);
        }
        let primary = surface.anchor(Anchor::NavPrimary);
        surface.clear_children(primary);
        let list = surface.anchor(Anchor::SecondaryList);
        surface.clear_children(list);
        let add_new = surface.anchor(Anchor::AddNew);
        surface.add_class(add_new, HIDDEN_CLASS);
        surface.clear_binding(add_new);
        let crumb = surface.anchor(Anchor::Breadcrumb);
        surface.clear_children(crumb);
    }

    fn show_primary<R: RenderSurface>(&mut self, surface: &mut R) {
        self.session.menu = Menu::Primary;
        let nav = surface.anchor(Anchor::NavPrimary);
        surface.add_class(nav, ACTIVE_CLASS);
        for kind in ContentType::ALL {
            let row = surface.create(NodeKind::ListItem);
            let link = surface.create(NodeKind::Link);
            surface.set_text(link, menu_label(kind));
            surface.bind(link, UiAction::ChooseType(kind));
            surface.append(row, link);
            surface.append(nav, row);
        }
        self.update_breadcrumb(surface);
    }

    fn show_secondary<R: RenderSurface>(&mut self, surface: &mut R, data: &SiteData) {
        let Some(kind) = self.session.kind else {
            return;
        };
        self.session.menu = Menu::Secondary;
        let nav = surface.anchor(Anchor::NavSecondary);
        surface.add_class(nav, ACTIVE_CLASS);

        let list = surface.anchor(Anchor::SecondaryList);
        for item in data.collection(kind) {
            let row = surface.create(NodeKind::ListItem);
            let link = surface.create(NodeKind::Link);
            surface.set_text(link, &item.title);
            surface.bind(link, UiAction::OpenItem(kind, item.slug.clone()));
            surface.append(row, link);
            surface.append(list, row);
        }

        // Only posts can be created from the editor
        if kind == ContentType::Post {
            let add_new = surface.anchor(Anchor::AddNew);
            surface.remove_class(add_new, HIDDEN_CLASS);
            surface.bind(add_new, UiAction::NewPost);
        }
        self.update_breadcrumb(surface);
    }

    fn show_edit_panel<R, F>(&mut self, surface: &mut R, factory: &mut F)
    where
        R: RenderSurface,
        F: WidgetFactory<Widget = W>,
    {
        self.session.menu = Menu::Edit;
        self.clear_edit_form(surface);

        let nav = surface.anchor(Anchor::NavEdit);
        surface.add_class(nav, ACTIVE_CLASS);

        let (title, content, kind, is_new) = match &self.session.current {
            Some(item) => (
                item.title.clone(),
                item.content.clone(),
                Some(item.kind),
                item.is_placeholder(),
            ),
            None => (String::new(), String::new(), self.session.kind, false),
        };

        let title_field = surface.anchor(Anchor::EditTitle);
        surface.set_text(title_field, &title);
        if kind == Some(ContentType::Setting) {
            surface.set_attr(title_field, "readonly", "readonly");
        }

        let content_field = surface.anchor(Anchor::EditContent);
        let mut widget = factory.create(content_field);
        widget.load(&content);
        self.widget = Some(widget);

        let save = surface.anchor(Anchor::SaveButton);
        surface.set_text(save, if is_new { SAVE_LABEL } else { UPDATE_LABEL });
        surface.bind(save, UiAction::Save);

        let deletable = matches!(
            &self.session.current,
            Some(item) if item.kind == ContentType::Post && item.id.is_some()
        );
        let delete = surface.anchor(Anchor::DeleteButton);
        if deletable {
            surface.remove_class(delete, HIDDEN_CLASS);
            surface.bind(delete, UiAction::Delete);
        }

        self.update_breadcrumb(surface);
    }

    fn clear_edit_form<R: RenderSurface>(&mut self, surface: &mut R) {
        let title_field = surface.anchor(Anchor::EditTitle);
        surface.set_text(title_field, "");
        surface.remove_attr(title_field, "readonly");

        let save = surface.anchor(Anchor::SaveButton);
        surface.clear_binding(save);
        let delete = surface.anchor(Anchor::DeleteButton);
        surface.add_class(delete, HIDDEN_CLASS);
        surface.clear_binding(delete);

        if let Some(mut widget) = self.widget.take() {
            widget.remove();
        }
    }

    /// Rebuild the "Admin / <type>" breadcrumb for the current menu.
    fn update_breadcrumb<R: RenderSurface>(&mut self, surface: &mut R) {
        let crumb = surface.anchor(Anchor::Breadcrumb);
        surface.clear_children(crumb);

        let home = surface.create(NodeKind::Link);
        surface.set_text(home, HOME_CRUMB);
        surface.bind(home, UiAction::EditorHome);
        surface.append(crumb, home);

        match (self.session.menu, self.session.kind) {
            (Menu::Secondary, Some(kind)) => {
                let label = surface.create(NodeKind::Text);
                surface.set_text(label, kind.collection_name());
                surface.append(crumb, label);
            }
            (Menu::Edit, Some(kind)) => {
                let link = surface.create(NodeKind::Link);
                surface.set_text(link, kind.collection_name());
                surface.bind(link, UiAction::ChooseType(kind));
                surface.append(crumb, link);
            }
            _ => {}
        }
    }
}

fn menu_label(kind: ContentType) -> &'static str {
    match kind {
        ContentType::Post => "Posts",
        ContentType::Page => "Pages",
        ContentType::Setting => "Settings",
    }
}
