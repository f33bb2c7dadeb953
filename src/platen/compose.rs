use crate::error::{PlatenError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Content exchanged with the user's text editor.
/// Buffer format: title\n\ncontent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeBuffer {
    pub title: String,
    pub content: String,
}

impl ComposeBuffer {
    pub fn new(title: String, content: String) -> Self {
        Self { title, content }
    }

    /// Formats the buffer for the editor.
    pub fn to_buffer(&self) -> String {
        if self.content.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.content)
        }
    }

    /// Parses an edited buffer: first line is the title, one blank separator
    /// line is skipped if present, the rest is content.
    pub fn from_buffer(buffer: &str) -> Self {
        let mut lines = buffer.lines();
        let title = lines.next().unwrap_or("").trim().to_string();
        let mut rest: Vec<&str> = lines.collect();
        if rest.first().map(|line| line.trim().is_empty()).unwrap_or(false) {
            rest.remove(0);
        }
        Self {
            title,
            content: rest.join("\n").trim_end().to_string(),
        }
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(editor) = env::var("VISUAL") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    // Try common fallbacks
    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(PlatenError::Editor(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| PlatenError::Editor(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(PlatenError::Editor(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(PlatenError::Io)
}

/// Opens an editor with initial content and returns the edited buffer.
/// Creates a temporary file with the given extension.
pub fn compose(initial: &ComposeBuffer, file_extension: &str) -> Result<ComposeBuffer> {
    let temp_dir = env::temp_dir();
    let temp_file = temp_dir.join(format!("platen_compose{}", file_extension));

    // Write initial content
    fs::write(&temp_file, initial.to_buffer()).map_err(PlatenError::Io)?;

    // Open editor
    let result = open_in_editor(&temp_file)?;

    // Clean up temp file
    let _ = fs::remove_file(&temp_file);

    Ok(ComposeBuffer::from_buffer(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_buffer_with_content() {
        let buffer = ComposeBuffer::new("My Post".to_string(), "<p>Some html.</p>".to_string());
        assert_eq!(buffer.to_buffer(), "My Post\n\n<p>Some html.</p>");
    }

    #[test]
    fn test_to_buffer_empty_content() {
        let buffer = ComposeBuffer::new("My Post".to_string(), String::new());
        assert_eq!(buffer.to_buffer(), "My Post\n\n");
    }

    #[test]
    fn test_from_buffer_normal() {
        let parsed = ComposeBuffer::from_buffer("My Post\n\n<p>First.</p>\n<p>Second.</p>");
        assert_eq!(parsed.title, "My Post");
        assert_eq!(parsed.content, "<p>First.</p>\n<p>Second.</p>");
    }

    #[test]
    fn test_from_buffer_empty_content() {
        let parsed = ComposeBuffer::from_buffer("My Post\n\n");
        assert_eq!(parsed.title, "My Post");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_from_buffer_title_only() {
        let parsed = ComposeBuffer::from_buffer("My Post");
        assert_eq!(parsed.title, "My Post");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_from_buffer_empty() {
        let parsed = ComposeBuffer::from_buffer("");
        assert_eq!(parsed.title, "");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_from_buffer_no_blank_separator() {
        // If there's no blank line, content starts immediately after the title
        let parsed = ComposeBuffer::from_buffer("Title\n<p>straight in</p>");
        assert_eq!(parsed.title, "Title");
        assert_eq!(parsed.content, "<p>straight in</p>");
    }

    #[test]
    fn test_roundtrip() {
        let original = ComposeBuffer::new(
            "Test Title".to_string(),
            "<p>Test content</p>\n<p>with lines</p>".to_string(),
        );
        let parsed = ComposeBuffer::from_buffer(&original.to_buffer());
        assert_eq!(original, parsed);
    }
}
