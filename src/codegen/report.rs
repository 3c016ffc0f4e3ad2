//! The conversion report appended to every generated component.
//!
//! Everything the converter could not translate ends up here: each animation
//! with its migration advice, each warning, and a checklist of the manual
//! work left. The same data is returned as a struct for the CLI summary.

use super::tree::Node;
use crate::descriptor::{ComponentDescriptor, ConversionStats, ResourceKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationNote {
    /// `#box.fadeIn()`
    pub usage: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub source_name: String,
    pub component_name: String,
    pub stats: ConversionStats,
    pub animations: Vec<AnimationNote>,
    pub warnings: Vec<String>,
    pub checklist: Vec<String>,
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn checklist(descriptor: &ComponentDescriptor, stylesheet: Option<&str>) -> Vec<String> {
    let mut items =
        vec!["Replace the placeholder markup with the real page structure and keep the ref attributes".to_string()];

    if !descriptor.handlers.is_empty() {
        items.push("Check that each listener effect is attached to the element it was written for".to_string());
    }
    if descriptor.handlers.iter().any(|h| h.delegation_parent.is_some()) {
        items.push("Delegated handlers still filter on the child selector; consider moving them onto the child elements".to_string());
    }
    if !descriptor.remote_calls.is_empty() {
        items.push(format!(
            "Review {}: request bodies are now sent as JSON",
            plural(descriptor.remote_calls.len(), "fetch call", "fetch calls")
        ));
    }
    if !descriptor.animations.is_empty() {
        items.push(format!(
            "Recreate {} listed above with CSS or an animation library",
            plural(descriptor.animations.len(), "animation", "animations")
        ));
    }
    if !descriptor.warnings.is_empty() {
        items.push(format!(
            "Resolve {} listed above",
            plural(descriptor.warnings.len(), "warning", "warnings")
        ));
    }
    if descriptor
        .reactive_states()
        .any(|state| state.purpose.is_none())
    {
        items.push("Confirm which reassigned variables are rendered; the others can become refs or plain variables".to_string());
    }
    if let Some(stylesheet) = stylesheet {
        items.push(format!("Check the embedded styles moved to {stylesheet}"));
    }
    for resource in &descriptor.resources {
        let name = resource
            .resolved_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| resource.original_reference.clone());
        items.push(match resource.kind {
            ResourceKind::Stylesheet => format!("Import the copied stylesheet {name} where the app starts"),
            ResourceKind::Script => format!("Convert or import the copied script utils/{name}"),
        });
    }
    items
}

impl ConversionReport {
    pub fn new(descriptor: &ComponentDescriptor, stylesheet: Option<&str>) -> Self {
        Self {
            source_name: descriptor.source_name.clone(),
            component_name: descriptor.component_name.clone(),
            stats: descriptor.stats(),
            animations: descriptor
                .animations
                .iter()
                .map(|animation| AnimationNote {
                    usage: animation.label(),
                    suggestion: animation.suggestion.clone(),
                })
                .collect(),
            warnings: descriptor.warnings.clone(),
            checklist: checklist(descriptor, stylesheet),
        }
    }

    /// Lines of the trailing report comment, without comment markers.
    pub fn lines(&self) -> Vec<String> {
        let stats = &self.stats;
        let mut lines = vec![
            format!("Conversion report for {}", self.source_name),
            String::new(),
            format!("Selectors:       {}", stats.selectors),
            format!("Event handlers:  {}", stats.event_handlers),
            format!("DOM mutations:   {}", stats.mutations),
            format!("Style mutations: {}", stats.style_mutations),
            format!("Remote calls:    {}", stats.remote_calls),
            format!("Animations:      {}", stats.animations),
        ];

        if !self.animations.is_empty() {
            lines.push(String::new());
            lines.push("Animations (not translated):".to_string());
            for note in &self.animations {
                lines.push(format!("  - {}: {}", note.usage, note.suggestion));
            }
        }
        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|warning| format!("  - {warning}")));
        }
        lines.push(String::new());
        lines.push("Checklist:".to_string());
        lines.extend(self.checklist.iter().map(|item| format!("  [ ] {item}")));
        lines
    }

    pub fn to_node(&self) -> Node {
        Node::DocComment(self.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AnimationUsage, ComponentBuilder};

    fn descriptor_with_animation() -> ComponentDescriptor {
        let mut builder = ComponentBuilder::new("Box", "box.js");
        builder.ensure_reference("#box");
        builder.record_selector("#box");
        builder.add_animation(AnimationUsage {
            selector: "#box".into(),
            method: "fadeIn".into(),
            arguments: String::new(),
            suggestion: "Use a CSS opacity transition".into(),
        });
        builder.finish()
    }

    #[test]
    fn every_animation_is_listed_with_advice() {
        let report = ConversionReport::new(&descriptor_with_animation(), None);
        assert_eq!(report.animations.len(), 1);
        let lines = report.lines();
        assert!(lines.contains(&"  - #box.fadeIn(): Use a CSS opacity transition".to_string()));
        assert!(lines.contains(&"Animations:      1".to_string()));
        assert!(report
            .checklist
            .iter()
            .any(|item| item.starts_with("Recreate 1 animation listed")));
    }

    #[test]
    fn checklist_always_mentions_the_markup() {
        let descriptor = ComponentBuilder::new("Empty", "empty.js").finish();
        let report = ConversionReport::new(&descriptor, None);
        assert_eq!(report.checklist.len(), 1);
        assert!(report.lines().last().is_some_and(|line| line.starts_with("  [ ] Replace")));
    }

    #[test]
    fn stylesheets_are_mentioned() {
        let descriptor = ComponentBuilder::new("Page", "page.html").finish();
        let report = ConversionReport::new(&descriptor, Some("page.styles.css"));
        assert!(report.checklist.contains(&"Check the embedded styles moved to page.styles.css".to_string()));
    }
}
