//! Pass 1: script variables become reactive state or constants.

use super::context::{declarators, ScriptContext};
use super::selectors::is_function_like;
use super::translate::Translator;
use crate::descriptor::{ComponentBuilder, StateKind, StateVariable};
use tracing::debug;

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let translator = Translator::new(ctx);
    let mut added = 0;

    for (_, statement) in ctx.scope_statements() {
        if !matches!(statement.kind(), "lexical_declaration" | "variable_declaration") {
            continue;
        }
        for (name, value) in declarators(statement, ctx.source()) {
            // Functions belong to pass 6, selector aliases are not state.
            if value.is_some_and(is_function_like) || ctx.alias(name).is_some() {
                continue;
            }
            let initial = value
                .map(|value| translator.fragment(value))
                .unwrap_or_else(|| "undefined".to_string());
            let state = match ctx.classify(name) {
                StateKind::Reactive => StateVariable::reactive(name, initial),
                StateKind::Constant => StateVariable::constant(name, initial),
            };
            if builder.add_state(state) {
                added += 1;
            }
        }
    }
    debug!(count = added, "state variables");
}
