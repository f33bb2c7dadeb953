//! Rich-text editing widgets.
//!
//! The content field of the edit form is a host-provided widget rather than a
//! plain node: a browser host brings a wysiwyg control, a terminal host
//! brings a buffer. The editor drives whichever one it gets through
//! [`RichTextWidget`] and obtains a fresh instance from the host's
//! [`WidgetFactory`] each time it fills the edit form.
//!
//! Content edits travel as [`UiAction::ContentInput`](crate::render::UiAction)
//! like every other interaction; the editor mirrors them into the live widget
//! so that `read` always reflects the session.

use crate::render::NodeId;

pub trait RichTextWidget {
    /// Replace the widget's content with the given markup.
    fn load(&mut self, markup: &str);

    /// The widget's current content as markup.
    fn read(&self) -> String;

    /// Tear the widget down. It will not be asked anything again.
    fn remove(&mut self);
}

/// Builds widgets on demand. The editor asks for one per edit form and drops
/// it when the form clears.
pub trait WidgetFactory {
    type Widget: RichTextWidget;

    /// Build a widget living inside the given container node.
    fn create(&mut self, container: NodeId) -> Self::Widget;
}

/// A widget that is just a string buffer, for tests and terminal hosts.
#[derive(Debug, Clone, Default)]
pub struct BufferWidget {
    markup: String,
    container: Option<NodeId>,
}

impl BufferWidget {
    /// Where the host should draw the buffer, while the widget is live.
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }
}

impl RichTextWidget for BufferWidget {
    fn load(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }

    fn read(&self) -> String {
        self.markup.clone()
    }

    fn remove(&mut self) {
        self.markup.clear();
        self.container = None;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BufferWidgetFactory;

impl BufferWidgetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl WidgetFactory for BufferWidgetFactory {
    type Widget = BufferWidget;

    fn create(&mut self, container: NodeId) -> BufferWidget {
        BufferWidget {
            markup: String::new(),
            container: Some(container),
        }
    }
}
