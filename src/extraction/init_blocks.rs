//! Pass 2: ready handlers and loose top-level code become mount effects.
//!
//! Statements that another pass owns (declarations, functions, event
//! bindings, nested scopes) are left out. Requests become data-fetch
//! effects of their own.

use super::context::{is_simple_declaration, statement_expression, ScopeKind, ScriptContext};
use super::remote::remote_chain;
use super::selectors::{flatten_chain, MethodRole, Target};
use super::translate::Translator;
use crate::descriptor::ComponentBuilder;
use tracing::debug;
use tree_sitter::Node;

/// True when a scope statement is handled by some other pass.
pub fn is_claimed<'a>(statement: Node<'a>, ctx: &ScriptContext<'a>) -> bool {
    match statement.kind() {
        "function_declaration" | "generator_function_declaration" => true,
        "lexical_declaration" | "variable_declaration" => is_simple_declaration(statement),
        "import_statement" | "empty_statement" => true,
        "expression_statement" => {
            let Some(expr) = statement_expression(statement) else {
                return true;
            };
            if expr.kind() == "string" || ctx.is_scope_statement(statement) {
                return true;
            }
            flatten_chain(expr, ctx).is_some_and(|chain| {
                chain.target != Target::This && chain.has_role(|role| role == MethodRole::Binding)
            })
        }
        _ => false,
    }
}

fn fetch_description<'a>(statement: Node<'a>, ctx: &ScriptContext<'a>) -> Option<String> {
    let expr = statement_expression(statement)?;
    let request = remote_chain(expr, ctx)?;
    let url = request.url_text(ctx);
    Some(if url.is_empty() {
        "Load remote data on mount".to_string()
    } else {
        format!("Load data from {url} on mount")
    })
}

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let translator = Translator::new(ctx);
    let mut top_level = Vec::new();
    // (mount code for ready scopes, data fetches) per scope, in scope order
    let mut per_scope: Vec<(Option<String>, Vec<(String, String)>)> = Vec::new();

    for scope in ctx.scopes() {
        let mut mount = Vec::new();
        let mut fetches = Vec::new();
        for statement in super::context::statements_of(scope.body) {
            if is_claimed(statement, ctx) {
                continue;
            }
            let code = translator.fragment(statement);
            match fetch_description(statement, ctx) {
                Some(description) => fetches.push((code, description)),
                None if scope.kind == ScopeKind::TopLevel => top_level.push(code),
                None => mount.push(code),
            }
        }
        let mount = (!mount.is_empty()).then(|| mount.join("\n"));
        per_scope.push((mount, fetches));
    }

    let mut added = 0;
    if !top_level.is_empty() {
        builder.add_mount_effect(top_level.join("\n"), "Run top-level statements once on mount");
        added += 1;
    }
    for (mount, fetches) in per_scope {
        if let Some(code) = mount {
            builder.add_mount_effect(code, "Run once on mount (converted from a ready handler)");
            added += 1;
        }
        for (code, description) in fetches {
            builder.add_data_fetch_effect(code, description);
            added += 1;
        }
    }
    debug!(count = added, "mount and data-fetch effects");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ComponentDescriptor, EffectTrigger};
    use crate::extraction::context::parse_script;
    use indoc::indoc;

    fn descriptor(source: &str) -> ComponentDescriptor {
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        extract(&ctx, &mut builder);
        builder.finish()
    }

    #[test]
    fn ready_body_becomes_mount_effect() {
        let source = indoc! {r#"
            $(document).ready(function () {
              var count = 0;
              console.log('ready');
              $('#save').on('click', save);
              if (window.debug) {
                console.log('debug');
              }
            });
        "#};
        let descriptor = descriptor(source);
        assert_eq!(descriptor.effects.len(), 1);
        let effect = &descriptor.effects[0];
        assert_eq!(effect.trigger, EffectTrigger::Mount);
        assert!(effect.dependencies.is_empty());
        assert_eq!(
            effect.code,
            "console.log('ready');\nif (window.debug) {\n  console.log('debug');\n}"
        );
    }

    #[test]
    fn requests_become_data_fetch_effects() {
        let source = indoc! {r#"
            $(function () {
              $.getJSON('/api/items', function (items) { render(items); });
            });
        "#};
        let descriptor = descriptor(source);
        assert_eq!(descriptor.effects.len(), 1);
        assert_eq!(descriptor.effects[0].trigger, EffectTrigger::DataFetch);
        assert_eq!(descriptor.effects[0].description, "Load data from /api/items on mount");
        assert!(descriptor.effects[0].code.starts_with("fetch('/api/items')"));
    }

    #[test]
    fn top_level_statements_come_first() {
        let source = indoc! {r#"
            $(function () { start(); });
            'use strict';
            setup();
        "#};
        let descriptor = descriptor(source);
        let codes: Vec<_> = descriptor.effects.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["setup();", "start();"]);
        assert_eq!(descriptor.effects[0].description, "Run top-level statements once on mount");
    }

    #[test]
    fn wrappers_are_unwrapped() {
        let source = "(function ($) {\n  boot();\n})(jQuery);";
        let descriptor = descriptor(source);
        assert_eq!(descriptor.effects[0].code, "boot();");
    }

    #[test]
    fn empty_scripts_add_nothing() {
        assert!(descriptor("").effects.is_empty());
        assert!(descriptor("function f() {}\nvar a = 1;").effects.is_empty());
    }
}
