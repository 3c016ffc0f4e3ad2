//! Code Generator.
//!
//! Turns a finished [`ComponentDescriptor`] into component source, an
//! optional sibling stylesheet and a [`ConversionReport`]. Generation never
//! fails and never checks that the output is valid JavaScript; it only
//! arranges what the extractor recorded, in the order it was recorded.

pub mod component;
pub mod markup;
pub mod printer;
pub mod report;
pub mod tree;

pub use printer::Printer;
pub use report::{AnimationNote, ConversionReport};
pub use tree::Node;

use crate::descriptor::ComponentDescriptor;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Extension of the sibling stylesheet for embedded styles.
    pub stylesheet_extension: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            stylesheet_extension: "css".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStylesheet {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedComponent {
    pub component_name: String,
    pub code: String,
    pub stylesheet: Option<GeneratedStylesheet>,
    pub report: ConversionReport,
}

pub fn generate(descriptor: &ComponentDescriptor, options: &CodegenOptions) -> GeneratedComponent {
    let stylesheet = descriptor
        .embedded_styles
        .as_ref()
        .filter(|styles| !styles.trim().is_empty())
        .map(|styles| GeneratedStylesheet {
            file_name: component::stylesheet_name(
                &descriptor.source_name,
                &options.stylesheet_extension,
            ),
            contents: format!("{}\n", crate::text::dedent(&crate::text::tidy_lines(styles))),
        });
    let stylesheet_name = stylesheet.as_ref().map(|sheet| sheet.file_name.as_str());

    let report = ConversionReport::new(descriptor, stylesheet_name);
    let code = Printer::print(&component::component_tree(descriptor, stylesheet_name, &report));
    debug!(
        component = %descriptor.component_name,
        bytes = code.len(),
        "generated component"
    );

    GeneratedComponent {
        component_name: descriptor.component_name.clone(),
        code,
        stylesheet,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ComponentBuilder;

    #[test]
    fn embedded_styles_become_a_stylesheet() {
        let mut builder = ComponentBuilder::new("Index", "index.html");
        builder.set_embedded_styles(Some("\n    .a { color: red; }\n    .b { color: blue; }\n".into()));
        let generated = generate(&builder.finish(), &CodegenOptions::default());
        let sheet = generated.stylesheet.unwrap();
        assert_eq!(sheet.file_name, "index.styles.css");
        assert_eq!(sheet.contents, ".a { color: red; }\n.b { color: blue; }\n");
        assert!(generated.code.contains("import './index.styles.css';\n"));
    }

    #[test]
    fn scripts_have_no_stylesheet() {
        let generated = generate(
            &ComponentBuilder::new("App", "app.js").finish(),
            &CodegenOptions::default(),
        );
        assert!(generated.stylesheet.is_none());
        assert_eq!(generated.component_name, "App");
        assert!(generated.code.ends_with(" */\n"));
    }
}
