//! Pass 6: named functions not already turned into handlers.

use super::context::{declarators, ScriptContext};
use super::remote::contains_remote;
use super::selectors::is_function_like;
use super::translate::{parameters_of, Translator};
use crate::descriptor::{ComponentBuilder, FunctionDefinition};
use tracing::debug;
use tree_sitter::Node;

fn is_declared_async(function: Node) -> bool {
    let mut cursor = function.walk();
    let found = function
        .children(&mut cursor)
        .any(|child| child.kind() == "async");
    found
}

/// `(name, function node)` for every function a scope statement defines.
fn definitions<'a>(statement: Node<'a>, ctx: &ScriptContext<'a>) -> Vec<(&'a str, Node<'a>)> {
    match statement.kind() {
        "function_declaration" | "generator_function_declaration" => statement
            .child_by_field_name("name")
            .map(|name| vec![(ctx.text(name), statement)])
            .unwrap_or_default(),
        "lexical_declaration" | "variable_declaration" => declarators(statement, ctx.source())
            .into_iter()
            .filter_map(|(name, value)| value.filter(|v| is_function_like(*v)).map(|v| (name, v)))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let translator = Translator::new(ctx);
    let mut added = 0;

    for (_, statement) in ctx.scope_statements() {
        for (name, function) in definitions(statement, ctx) {
            if builder.is_function_claimed(name) {
                continue;
            }
            let body_node = function.child_by_field_name("body").unwrap_or(function);
            let definition = FunctionDefinition {
                name: name.to_string(),
                parameters: parameters_of(function, ctx),
                body: translator.function_body(function),
                is_async: is_declared_async(function) || contains_remote(body_node, ctx),
            };
            if builder.add_function(definition) {
                added += 1;
            }
        }
    }
    debug!(count = added, "functions");
}
