//! Output tree for generated components.
//!
//! Content is assembled as [`Node`]s first and turned into text by the
//! [`Printer`](super::printer::Printer) afterwards, so nothing here needs to
//! know how deep it ends up nested.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single line at the current indentation.
    Line(String),
    /// An empty line.
    Blank,
    /// `// ...`, one marker per line of text.
    Comment(String),
    /// Pre-formatted, possibly multi-line code. Common indentation is removed
    /// and the printer re-indents every line.
    Code(String),
    /// `open`, then `body` one level deeper, then `close`.
    Block {
        open: String,
        body: Vec<Node>,
        close: String,
    },
    /// `/** ... */` with one line per entry.
    DocComment(Vec<String>),
}

impl Node {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::Code(text.into())
    }

    pub fn block(open: impl Into<String>, body: Vec<Node>, close: impl Into<String>) -> Self {
        Self::Block {
            open: open.into(),
            body,
            close: close.into(),
        }
    }
}

/// Joins groups of nodes with a blank line between non-empty groups.
pub fn separated(groups: impl IntoIterator<Item = Vec<Node>>) -> Vec<Node> {
    let mut out = Vec::new();
    for group in groups.into_iter().filter(|group| !group.is_empty()) {
        if !out.is_empty() {
            out.push(Node::Blank);
        }
        out.extend(group);
    }
    out
}
