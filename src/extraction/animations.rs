//! Pass 5: visual effects are recorded with advice, never translated.

use super::context::ScriptContext;
use super::selectors::{
    animation_suggestion, flatten_chain, is_chain_head, is_function_like, MethodCall, MethodRole,
    Target,
};
use crate::descriptor::{AnimationUsage, ComponentBuilder};
use tracing::debug;

const MAX_ARGUMENT_WIDTH: usize = 40;

/// Arguments as a single short line for the report.
fn summarize_arguments(call: &MethodCall, ctx: &ScriptContext) -> String {
    call.arguments
        .iter()
        .map(|argument| {
            if is_function_like(*argument) {
                return "callback".to_string();
            }
            let flat = ctx.text(*argument).split_whitespace().collect::<Vec<_>>().join(" ");
            if flat.chars().count() > MAX_ARGUMENT_WIDTH {
                let cut: String = flat.chars().take(MAX_ARGUMENT_WIDTH).collect();
                format!("{cut}...")
            } else {
                flat
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn usage(target: &Target, call: &MethodCall, ctx: &ScriptContext) -> AnimationUsage {
    AnimationUsage {
        selector: target.label(),
        method: call.name.to_string(),
        arguments: summarize_arguments(call, ctx),
        suggestion: animation_suggestion(call.name).to_string(),
    }
}

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let mut count = 0;
    ctx.walk(|node| {
        if node.kind() != "call_expression" || !is_chain_head(node) {
            return;
        }
        let Some(chain) = flatten_chain(node, ctx) else {
            return;
        };
        for call in chain.effective_calls() {
            if call.role() == MethodRole::Animation {
                builder.add_animation(usage(&chain.target, call, ctx));
                count += 1;
            }
        }
    });
    debug!(count, "animations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::context::parse_script;

    fn animations(source: &str) -> Vec<AnimationUsage> {
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        extract(&ctx, &mut builder);
        builder.animations().to_vec()
    }

    #[test]
    fn records_each_occurrence_with_advice() {
        let found = animations("$('#box').fadeIn();\n$('#box').fadeIn();\n$('.menu').slideUp(200);");
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].label(), "#box.fadeIn()");
        assert!(found[0].suggestion.contains("CSS"));
        assert_eq!(found[2].label(), ".menu.slideUp(200)");
    }

    #[test]
    fn finds_animations_in_chains_and_handlers() {
        let source = "$('#go').click(function () {\n  $(this).addClass('x').animate({ left: 10 }, 500);\n});";
        let found = animations(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selector, "$(this)");
        assert_eq!(found[0].arguments, "{ left: 10 }, 500");
    }

    #[test]
    fn long_arguments_are_shortened() {
        let found = animations(
            "$('#a').animate({ opacity: 0.5, height: '100px', width: '200px', left: '10px' });",
        );
        assert!(found[0].arguments.ends_with("..."));
        assert_eq!(found[0].arguments.chars().count(), MAX_ARGUMENT_WIDTH + 3);
    }

    #[test]
    fn plain_show_is_not_an_animation() {
        assert!(animations("$('#a').show();").is_empty());
        assert_eq!(animations("$('#a').show(300);").len(), 1);
    }
}
