//! Pass 3: event bindings become handlers plus listener effects.
//!
//! Every binding attaches on mount and returns a cleanup that removes
//! exactly the listener it added.

use super::context::{statement_expression, ScriptContext};
use super::selectors::{
    flatten_chain, is_function_like, MethodCall, MethodRole, Target, EVENT_SHORTHANDS,
};
use super::translate::{first_parameter, parameters_of, Translator};
use crate::descriptor::{ComponentBuilder, EventHandlerBinding, ListenerTarget};
use crate::naming;
use crate::text::{indent, quote_js, unquote};
use tracing::debug;
use tree_sitter::Node;

/// One `(event, handler)` pair pulled out of a binding call.
#[derive(Debug, Clone)]
struct RawBinding<'a> {
    event: String,
    delegate: Option<String>,
    handler: Node<'a>,
    once: bool,
}

/// `'click.menu touchstart'` → `["click", "touchstart"]`
fn event_names(list: &str) -> Vec<String> {
    list.split_whitespace()
        .filter_map(|event| event.split('.').next())
        .filter(|event| !event.is_empty())
        .map(str::to_string)
        .collect()
}

fn string_argument<'a>(call: &MethodCall<'a>, index: usize, ctx: &ScriptContext<'a>) -> Option<&'a str> {
    call.argument(index)
        .filter(|node| node.kind() == "string")
        .map(|node| unquote(ctx.text(node)))
}

fn raw_bindings<'a>(call: &MethodCall<'a>, ctx: &ScriptContext<'a>) -> Vec<RawBinding<'a>> {
    let single = |events: Vec<String>,
                  delegate: Option<String>,
                  handler: Option<Node<'a>>,
                  once: bool|
     -> Vec<RawBinding<'a>> {
        match handler {
            Some(handler) => events
                .into_iter()
                .map(|event| RawBinding {
                    event,
                    delegate: delegate.clone(),
                    handler,
                    once,
                })
                .collect(),
            None => Vec::new(),
        }
    };

    match call.name {
        "hover" => {
            let Some(enter) = call.argument(0) else {
                return Vec::new();
            };
            let leave = call.argument(1).unwrap_or(enter);
            vec![
                RawBinding {
                    event: "mouseenter".to_string(),
                    delegate: None,
                    handler: enter,
                    once: false,
                },
                RawBinding {
                    event: "mouseleave".to_string(),
                    delegate: None,
                    handler: leave,
                    once: false,
                },
            ]
        }
        "delegate" => {
            let child = string_argument(call, 0, ctx).map(str::to_string);
            let events = string_argument(call, 1, ctx).map(event_names).unwrap_or_default();
            let handler = call.arguments.get(2..).and_then(|rest| rest.last().copied());
            single(events, child, handler, false)
        }
        "on" | "bind" | "one" | "live" => {
            let once = call.name == "one";
            let delegate = if matches!(call.name, "on" | "one") {
                string_argument(call, 1, ctx)
                    .filter(|_| call.arguments.len() >= 3)
                    .map(str::to_string)
            } else {
                None
            };
            match call.argument(0) {
                // .on({ click: fn, mouseenter: fn }, [child])
                Some(map) if map.kind() == "object" => {
                    let delegate = string_argument(call, 1, ctx).map(str::to_string);
                    let mut cursor = map.walk();
                    map.named_children(&mut cursor)
                        .filter(|entry| entry.kind() == "pair")
                        .flat_map(|entry| {
                            let events = entry
                                .child_by_field_name("key")
                                .map(|key| event_names(unquote(ctx.text(key))))
                                .unwrap_or_default();
                            single(events, delegate.clone(), entry.child_by_field_name("value"), once)
                        })
                        .collect()
                }
                Some(_) => {
                    let events = string_argument(call, 0, ctx).map(event_names).unwrap_or_default();
                    let handler = call.arguments.get(1..).and_then(|rest| rest.last().copied());
                    single(events, delegate, handler, once)
                }
                None => Vec::new(),
            }
        }
        name if EVENT_SHORTHANDS.contains(&name) => {
            single(vec![name.to_string()], None, call.arguments.last().copied(), false)
        }
        _ => Vec::new(),
    }
}

fn is_binding_method(name: &str) -> bool {
    matches!(name, "on" | "bind" | "one" | "live" | "delegate" | "hover")
        || EVENT_SHORTHANDS.contains(&name)
}

/// True when `node` is passed as a handler to an event-binding method,
/// directly or as a value of an `{ event: handler }` map.
fn is_binding_argument(node: Node, ctx: &ScriptContext<'_>) -> bool {
    let mut arguments = node.parent();
    if let Some(pair) = arguments.filter(|parent| parent.kind() == "pair") {
        if pair.child_by_field_name("value") != Some(node) {
            return false;
        }
        arguments = pair.parent().and_then(|object| object.parent());
    }
    arguments
        .filter(|parent| parent.kind() == "arguments")
        .and_then(|parent| parent.parent())
        .and_then(|call| call.child_by_field_name("function"))
        .filter(|function| function.kind() == "member_expression")
        .and_then(|function| function.child_by_field_name("property"))
        .is_some_and(|property| is_binding_method(ctx.text(property)))
}

/// True when `name` appears anywhere besides its own declaration and
/// handler positions of event bindings.
fn used_outside_bindings(name: &str, ctx: &ScriptContext<'_>) -> bool {
    let mut used = false;
    ctx.walk(|node| {
        if used || node.kind() != "identifier" || ctx.text(node) != name {
            return;
        }
        let declares = node.parent().is_some_and(|parent| {
            matches!(parent.kind(), "function_declaration" | "variable_declarator")
                && parent.child_by_field_name("name") == Some(node)
        });
        used = !declares && !is_binding_argument(node, ctx);
    });
    used
}

/// Parameters and translated body of a handler, or `None` when the handler
/// expression cannot be called.
fn handler_parts<'a>(
    handler: Node<'a>,
    delegate: Option<&str>,
    ctx: &ScriptContext<'a>,
    builder: &mut ComponentBuilder,
) -> Option<(String, String)> {
    let function = if is_function_like(handler) {
        Some(handler)
    } else if handler.kind() == "identifier" {
        // A function that is also called elsewhere stays defined, and the
        // handler calls it.
        let name = ctx.text(handler);
        match ctx.function(name) {
            Some(declared) if !used_outside_bindings(name, ctx) => {
                builder.claim_function(name);
                Some(declared)
            }
            _ => None,
        }
    } else {
        None
    };

    let Some(function) = function else {
        return matches!(handler.kind(), "identifier" | "member_expression")
            .then(|| ("event".to_string(), format!("{}(event);", ctx.text(handler))));
    };

    let declared = parameters_of(function, ctx);
    let parameters = if declared.is_empty() {
        "event".to_string()
    } else {
        declared
    };
    let event = first_parameter(&parameters).unwrap_or("event").to_string();
    let this_expr = match delegate {
        Some(child) => format!("{event}.target.closest({})", quote_js(child)),
        None => format!("{event}.currentTarget"),
    };
    let body = Translator::new(ctx).with_this(this_expr).function_body(function);
    Some((parameters, body))
}

/// Mount code that attaches `handler` and removes it on cleanup.
fn listener_effect(
    target: &ListenerTarget,
    event: &str,
    handler: &str,
    delegate: Option<&str>,
    once: bool,
) -> String {
    let (element, guard) = match target {
        ListenerTarget::Reference(reference) => (
            "element".to_string(),
            format!("const element = {reference}.current;\nif (!element) return undefined;\n"),
        ),
        ListenerTarget::Global(global) => (global.as_str().to_string(), String::new()),
    };
    let event = quote_js(event);
    let options = if once { ", { once: true }" } else { "" };

    let (listener, setup) = match delegate {
        Some(child) => (
            "listener".to_string(),
            format!(
                "const listener = (event) => {{\n  if (event.target.closest({})) {{\n    {handler}(event);\n  }}\n}};\n",
                quote_js(child)
            ),
        ),
        None => (handler.to_string(), String::new()),
    };

    format!(
        "{guard}{setup}{element}.addEventListener({event}, {listener}{options});\nreturn () => {{\n{}\n}};",
        indent(
            &format!("{element}.removeEventListener({event}, {listener}{options});"),
            "  "
        )
    )
}

fn register<'a>(
    chain_target: &Target,
    raw: RawBinding<'a>,
    ctx: &ScriptContext<'a>,
    builder: &mut ComponentBuilder,
) -> bool {
    let Some((parameters, translated_body)) =
        handler_parts(raw.handler, raw.delegate.as_deref(), ctx, builder)
    else {
        builder.add_warning(format!(
            "{} event handler on {} is not a function and was not converted",
            raw.event,
            chain_target.label()
        ));
        return false;
    };

    let (owner, target) = match chain_target {
        Target::Selector(selector) => (
            selector.clone(),
            ListenerTarget::Reference(
                builder.ensure_reference_named(selector, ctx.reference_name(selector)),
            ),
        ),
        Target::Global(global) => (global.as_str().to_string(), ListenerTarget::Global(*global)),
        Target::This => return false,
    };
    let (selector, delegation_parent) = match raw.delegate {
        Some(child) => (child, Some(owner.clone())),
        None => (owner.clone(), None),
    };

    let handler_name = naming::handler_name(&owner, delegation_parent.as_ref().map(|_| selector.as_str()), &raw.event);
    let effect_code = listener_effect(
        &target,
        &raw.event,
        &handler_name,
        delegation_parent.as_ref().map(|_| selector.as_str()),
        raw.once,
    );

    builder.add_handler(
        EventHandlerBinding {
            selector,
            event_name: raw.event,
            handler_name,
            parameters,
            translated_body,
            delegation_parent,
            target,
            once: raw.once,
        },
        effect_code,
    );
    true
}

pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let mut added = 0;
    for (_, statement) in ctx.scope_statements() {
        if ctx.is_scope_statement(statement) {
            continue;
        }
        let Some(chain) = statement_expression(statement).and_then(|expr| flatten_chain(expr, ctx))
        else {
            continue;
        };
        if chain.target == Target::This {
            continue;
        }
        for call in chain.effective_calls() {
            if call.role() != MethodRole::Binding {
                continue;
            }
            for raw in raw_bindings(call, ctx) {
                if register(&chain.target, raw, ctx, builder) {
                    added += 1;
                }
            }
        }
    }
    debug!(count = added, "event handlers");
}
