//! Pass 8: every selector string gets a reference, in document order.

use super::context::ScriptContext;
use super::selectors::{direct_target, Target};
use crate::descriptor::ComponentBuilder;
use tracing::debug;

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let before = builder.references().len();
    ctx.walk(|node| {
        if let Some(Target::Selector(selector)) = direct_target(node, ctx.source()) {
            builder.record_selector(&selector);
            builder.ensure_reference_named(&selector, ctx.reference_name(&selector));
        }
    });
    debug!(
        added = builder.references().len() - before,
        "references from bare selectors"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::context::parse_script;

    #[test]
    fn collects_distinct_selectors_in_order() {
        let source = "$('#b').hide();\nvar $a = $('.a');\n$('#b').show();\njQuery('#c');";
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        builder.ensure_reference("#c");
        extract(&ctx, &mut builder);
        let finished = builder.finish();
        assert_eq!(finished.selectors, vec!["#b", ".a", "#c"]);
        let refs: Vec<_> = finished.references.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(refs, vec!["cRef", "bRef", "aRef"]);
    }

    #[test]
    fn globals_and_functions_are_not_selectors() {
        let source = "$(document).ready(function () {});\n$(window).scroll(f);\n$(function () {});";
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        extract(&ctx, &mut builder);
        assert!(builder.references().is_empty());
    }
}
