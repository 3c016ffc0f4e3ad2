//! Source documents: plain scripts or HTML pages with inline scripts.

pub mod html;
pub mod resources;

use crate::errors::Result;
use crate::io;
use std::path::{Path, PathBuf};

pub use resources::collect_resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Script,
    Html,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("html") | Some("htm") => Self::Html,
            _ => Self::Script,
        }
    }
}

/// One input file, held entirely in memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub raw: String,
    /// File stem, used for the component and output names.
    pub base_name: String,
    /// File name including extension, as shown in reports.
    pub file_name: String,
    /// Directory relative references are resolved against.
    pub directory: PathBuf,
    pub kind: DocumentKind,
}

impl SourceDocument {
    pub fn new(raw: impl Into<String>, path: &Path) -> Self {
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "component".to_string());
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| base_name.clone());
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            raw: raw.into(),
            base_name,
            file_name,
            directory,
            kind: DocumentKind::from_path(path),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(io::read_file(path)?, path))
    }

    /// The JavaScript to convert: the whole file, or the inline scripts of a page.
    pub fn script_text(&self) -> String {
        match self.kind {
            DocumentKind::Script => self.raw.clone(),
            DocumentKind::Html => html::inline_scripts(&self.raw).join("\n"),
        }
    }

    /// Rules from embedded `<style>` blocks, if any.
    pub fn embedded_styles(&self) -> Option<String> {
        match self.kind {
            DocumentKind::Script => None,
            DocumentKind::Html => {
                let blocks = html::style_blocks(&self.raw);
                if blocks.is_empty() {
                    None
                } else {
                    Some(blocks.join("\n\n"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_documents_use_whole_text() {
        let doc = SourceDocument::new("let a = 1;", Path::new("/site/js/app.js"));
        assert_eq!(doc.kind, DocumentKind::Script);
        assert_eq!(doc.base_name, "app");
        assert_eq!(doc.file_name, "app.js");
        assert_eq!(doc.directory, PathBuf::from("/site/js"));
        assert_eq!(doc.script_text(), "let a = 1;");
        assert!(doc.embedded_styles().is_none());
    }

    #[test]
    fn html_documents_split_scripts_and_styles() {
        let page = "<style>.a { color: red; }</style><script>let a = 1;</script>\
                    <script src=\"x.js\"></script><script>let b = 2;</script>";
        let doc = SourceDocument::new(page, Path::new("index.HTML"));
        assert_eq!(doc.kind, DocumentKind::Html);
        assert_eq!(doc.script_text(), "let a = 1;\nlet b = 2;");
        assert_eq!(doc.embedded_styles().as_deref(), Some(".a { color: red; }"));
    }
}
