use super::{Anchor, NodeId, NodeKind, RenderSurface, UiAction};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A node in a [`TreeSurface`].
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
    /// Whether `text` was written as markup rather than plain text.
    pub rich: bool,
    pub attrs: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub children: Vec<NodeId>,
    pub binding: Option<UiAction>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            rich: false,
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            children: Vec::new(),
            binding: None,
        }
    }
}

/// A retained node tree.
///
/// This is the surface terminal hosts render from and the one tests inspect:
/// it keeps exactly what the controllers wrote and exposes read access for
/// walking it. Nodes live in an arena; clearing children orphans them there,
/// nothing dereferences an orphan again.
#[derive(Debug, Default)]
pub struct TreeSurface {
    nodes: Vec<Node>,
    anchors: HashMap<Anchor, NodeId>,
}

impl TreeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Node id for an anchor if a controller has touched it.
    pub fn anchor_id(&self, anchor: Anchor) -> Option<NodeId> {
        self.anchors.get(&anchor).copied()
    }

    /// Text of an anchor, or empty if it was never written.
    pub fn text_of(&self, anchor: Anchor) -> &str {
        self.anchor_id(anchor)
            .map(|id| self.nodes[id].text.as_str())
            .unwrap_or("")
    }

    pub fn children_of(&self, anchor: Anchor) -> &[NodeId] {
        self.anchor_id(anchor)
            .map(|id| self.nodes[id].children.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, anchor: Anchor, class: &str) -> bool {
        self.anchor_id(anchor)
            .map(|id| self.nodes[id].classes.contains(class))
            .unwrap_or(false)
    }

    pub fn attr_of(&self, anchor: Anchor, name: &str) -> Option<&str> {
        self.anchor_id(anchor)
            .and_then(|id| self.nodes[id].attrs.get(name))
            .map(String::as_str)
    }

    /// All bound nodes at or under an anchor, depth-first. This is what a
    /// terminal host numbers its menu with.
    pub fn bindings_under(&self, anchor: Anchor) -> Vec<(NodeId, UiAction)> {
        let mut found = Vec::new();
        if let Some(id) = self.anchor_id(anchor) {
            self.collect_bindings(id, &mut found);
        }
        found
    }

    fn collect_bindings(&self, id: NodeId, found: &mut Vec<(NodeId, UiAction)>) {
        if let Some(action) = &self.nodes[id].binding {
            found.push((id, action.clone()));
        }
        for child in &self.nodes[id].children {
            self.collect_bindings(*child, found);
        }
    }
}

impl RenderSurface for TreeSurface {
    fn anchor(&mut self, anchor: Anchor) -> NodeId {
        if let Some(id) = self.anchors.get(&anchor) {
            return *id;
        }
        let id = self.create(NodeKind::Block);
        self.anchors.insert(anchor, id);
        id
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        self.nodes.len() - 1
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].children.push(child);
    }

    fn clear_children(&mut self, node: NodeId) {
        self.nodes[node].children.clear();
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let node = &mut self.nodes[node];
        node.text = text.to_string();
        node.rich = false;
    }

    fn set_rich_text(&mut self, node: NodeId, markup: &str) {
        let node = &mut self.nodes[node];
        node.text = markup.to_string();
        node.rich = true;
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node].attrs.insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.nodes[node].attrs.remove(name);
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node].classes.insert(class.to_string());
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node].classes.remove(class);
    }

    fn bind(&mut self, node: NodeId, action: UiAction) {
        self.nodes[node].binding = Some(action);
    }

    fn clear_binding(&mut self, node: NodeId) {
        self.nodes[node].binding = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_created_once() {
        let mut surface = TreeSurface::new();
        let first = surface.anchor(Anchor::PageTitle);
        let second = surface.anchor(Anchor::PageTitle);
        assert_eq!(first, second);
    }

    #[test]
    fn untouched_anchor_reads_as_empty() {
        let surface = TreeSurface::new();
        assert_eq!(surface.text_of(Anchor::PageTitle), "");
        assert!(surface.anchor_id(Anchor::PageTitle).is_none());
    }

    #[test]
    fn rich_text_is_marked() {
        let mut surface = TreeSurface::new();
        let id = surface.anchor(Anchor::PageContent);
        surface.set_rich_text(id, "<p>hi</p>");
        assert!(surface.node(id).rich);
        surface.set_text(id, "hi");
        assert!(!surface.node(id).rich);
    }

    #[test]
    fn classes_toggle() {
        let mut surface = TreeSurface::new();
        let id = surface.anchor(Anchor::ViewRoot);
        surface.add_class(id, "inactive");
        assert!(surface.has_class(Anchor::ViewRoot, "inactive"));
        surface.remove_class(id, "inactive");
        assert!(!surface.has_class(Anchor::ViewRoot, "inactive"));
    }

    #[test]
    fn clear_children_detaches_bound_nodes() {
        let mut surface = TreeSurface::new();
        let list = surface.anchor(Anchor::SecondaryList);
        let item = surface.create(NodeKind::Link);
        surface.bind(item, UiAction::NewPost);
        surface.append(list, item);
        assert_eq!(surface.bindings_under(Anchor::SecondaryList).len(), 1);

        surface.clear_children(list);
        assert!(surface.bindings_under(Anchor::SecondaryList).is_empty());
    }

    #[test]
    fn bind_replaces_the_previous_action() {
        let mut surface = TreeSurface::new();
        let id = surface.anchor(Anchor::SaveButton);
        surface.bind(id, UiAction::Save);
        surface.bind(id, UiAction::Delete);
        assert_eq!(surface.node(id).binding, Some(UiAction::Delete));
    }

    #[test]
    fn bindings_are_collected_depth_first() {
        let mut surface = TreeSurface::new();
        let nav = surface.anchor(Anchor::MainNav);
        for slug in ["home", "about"] {
            let link = surface.create(NodeKind::Link);
            surface.bind(
                link,
                UiAction::Navigate(crate::router::Route::Page(slug.to_string())),
            );
            surface.append(nav, link);
        }

        let actions = surface.bindings_under(Anchor::MainNav);
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0].1,
            UiAction::Navigate(crate::router::Route::Page("home".to_string()))
        );
    }
}
