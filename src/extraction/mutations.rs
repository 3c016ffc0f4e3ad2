//! Pass 7: direct DOM mutations synthesize the state that replaces them.

use super::context::ScriptContext;
use super::selectors::{flatten_chain, is_chain_head, MethodRole, Target};
use crate::descriptor::{ComponentBuilder, MutationKind, MutationSite, StateVariable};
use crate::naming;
use tracing::debug;

fn initial_value(kind: MutationKind, method: &str) -> &'static str {
    match (kind, method) {
        // An element that is first shown starts hidden.
        (MutationKind::Visibility, "show") => "false",
        _ => kind.default_initial_value(),
    }
}

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let mut sites = 0;
    let mut synthesized = 0;

    ctx.walk(|node| {
        if node.kind() != "call_expression" || !is_chain_head(node) {
            return;
        }
        let Some(chain) = flatten_chain(node, ctx) else {
            return;
        };
        let label = chain.target.label();

        for call in &chain.calls {
            match call.role() {
                MethodRole::Mutation(kind) => {
                    builder.record_mutation(MutationSite {
                        selector: label.clone(),
                        method: call.name.to_string(),
                        kind,
                    });
                    sites += 1;
                    let Target::Selector(selector) = &chain.target else {
                        continue;
                    };
                    let name = naming::state_name(selector, kind);
                    if builder.state(&name).is_none()
                        && builder.add_state(
                            StateVariable::reactive(&name, initial_value(kind, call.name))
                                .with_purpose(selector.clone(), kind),
                        )
                    {
                        synthesized += 1;
                    }
                }
                MethodRole::Traversal => {
                    builder.add_warning(format!(
                        "{label}.{}() walks the DOM from a selection; the rest of that chain is kept as direct DOM code",
                        call.name
                    ));
                    break;
                }
                MethodRole::Unknown => builder.add_warning(format!(
                    "{label}.{}() has no React equivalent and is kept as a call on the element",
                    call.name
                )),
                MethodRole::Binding if !ctx.is_scope_expression(node) => {
                    builder.add_warning(format!(
                        "{label}.{}() binds an event inside nested code; move it into an effect by hand",
                        call.name
                    ));
                }
                _ => {}
            }
        }
    });
    debug!(sites, synthesized, "direct mutations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ComponentDescriptor, StateKind};
    use crate::extraction::context::parse_script;

    fn descriptor(source: &str) -> ComponentDescriptor {
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        extract(&ctx, &mut builder);
        builder.finish()
    }

    #[test]
    fn synthesizes_one_state_per_selector_and_kind() {
        let source = "$('#status').text('a');\n$('#status').text('b');\n$('#status').html('<b>c</b>');";
        let descriptor = descriptor(source);
        let names: Vec<_> = descriptor.states.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(names, vec!["statusText", "statusHtml"]);
        assert_eq!(descriptor.mutations.len(), 3);
        assert!(descriptor.states.iter().all(|s| s.kind == StateKind::Reactive));
        assert_eq!(descriptor.states[0].initial_value, "''");
    }

    #[test]
    fn visibility_starts_from_first_call() {
        let descriptor = descriptor("$('#panel').show();\n$('#panel').hide();\n$('#menu').toggle();");
        assert_eq!(descriptor.states[0].identifier, "panelVisible");
        assert_eq!(descriptor.states[0].initial_value, "false");
        assert_eq!(descriptor.states[1].identifier, "menuVisible");
        assert_eq!(descriptor.states[1].initial_value, "true");
    }

    #[test]
    fn style_mutations_are_counted_separately() {
        let descriptor = descriptor("$('#box').css('color', 'red');\n$('#box').addClass('on');");
        let stats = descriptor.stats();
        assert_eq!(stats.mutations, 1);
        assert_eq!(stats.style_mutations, 1);
        assert_eq!(descriptor.states[0].initial_value, "{}");
    }

    #[test]
    fn this_mutations_are_counted_without_state() {
        let descriptor = descriptor("$(document).on('click', 'a', function () { $(this).hide(); });");
        assert_eq!(descriptor.mutations.len(), 1);
        assert!(descriptor.states.is_empty());
    }

    #[test]
    fn plugins_and_nested_bindings_warn() {
        let source = "$('#date').datepicker();\nfunction f() { $('#x').on('click', g); }";
        let descriptor = descriptor(source);
        assert_eq!(descriptor.warnings.len(), 2);
        assert!(descriptor.warnings[0].starts_with("#date.datepicker()"));
        assert!(descriptor.warnings[1].contains("nested code"));
    }

    #[test]
    fn getters_are_not_mutations() {
        let descriptor = descriptor("var v = $('#name').val();");
        assert!(descriptor.mutations.is_empty());
        assert!(descriptor.states.is_empty());
    }
}
