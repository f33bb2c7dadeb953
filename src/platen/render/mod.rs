//! # Render Surface
//!
//! The engine never talks to a concrete UI. Controllers render through the
//! [`RenderSurface`] trait: a small retained-node surface with the handful of
//! capabilities they actually use (anchor lookup, node creation, text,
//! attributes, classes and action bindings).
//!
//! Interactions flow back as data instead of callbacks. A controller *binds*
//! a [`UiAction`] to a node; the host draws whatever affordance it likes for
//! the binding and feeds the action into
//! [`App::dispatch`](crate::app::App::dispatch) when the visitor triggers it.
//! Binding is a replace, not an add: a node carries at most one action, so
//! re-rendering a menu can never stack stale handlers behind fresh ones.

use crate::model::ContentType;
use crate::router::Route;

pub mod tree;

pub type NodeId = usize;

/// Fixed points of the page. Hosts provide these; controllers look them up
/// instead of holding references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    // Visitor-facing chrome and content
    SiteName,
    SiteDescription,
    MainNav,
    ViewRoot,
    PageTitle,
    PageContent,
    // Editor overlay
    EditorRoot,
    EditorToggle,
    NavPrimary,
    NavSecondary,
    SecondaryList,
    AddNew,
    NavEdit,
    Breadcrumb,
    EditTitle,
    EditContent,
    SaveButton,
    DeleteButton,
}

/// Shape of a created node, for hosts that render elements differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Block,
    Heading,
    Link,
    ListItem,
    Text,
}

/// An interaction the host hands back to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Go to an address (main nav, post list).
    Navigate(Route),
    /// Open or close the editor overlay.
    ToggleEditor,
    /// Back to the editor's type chooser (the "Admin" crumb).
    EditorHome,
    /// Show the item list for one content type.
    ChooseType(ContentType),
    /// Load an item into the edit form.
    OpenItem(ContentType, String),
    /// Start a new, unsaved post.
    NewPost,
    /// Persist the item bound to the edit form.
    Save,
    /// Delete the bound post, subject to confirmation.
    Delete,
    /// The title field changed to this text.
    TitleInput(String),
    /// The content widget changed to this markup.
    ContentInput(String),
}

/// What the engine needs from a page it renders into.
pub trait RenderSurface {
    /// Node for a fixed point of the page, created on first use.
    fn anchor(&mut self, anchor: Anchor) -> NodeId;

    /// Create a detached node.
    fn create(&mut self, kind: NodeKind) -> NodeId;

    /// Attach `child` under `parent`, after its current children.
    fn append(&mut self, parent: NodeId, child: NodeId);

    /// Drop all children of a node. Their bindings go with them.
    fn clear_children(&mut self, node: NodeId);

    /// Set plain text content.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Set content that hosts may interpret as markup.
    fn set_rich_text(&mut self, node: NodeId, markup: &str);

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attr(&mut self, node: NodeId, name: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Bind an action to a node, replacing any previous binding.
    fn bind(&mut self, node: NodeId, action: UiAction);

    /// Remove a node's binding, if any.
    fn clear_binding(&mut self, node: NodeId);
}
