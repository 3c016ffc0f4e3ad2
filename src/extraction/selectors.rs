//! jQuery call shapes: selector calls, method chains and method roles.

use super::context::ScriptContext;
use crate::descriptor::{GlobalTarget, MutationKind};
use crate::text::unquote;
use tree_sitter::Node;

pub const EVENT_SHORTHANDS: &[&str] = &[
    "click",
    "dblclick",
    "submit",
    "change",
    "input",
    "keyup",
    "keydown",
    "keypress",
    "focus",
    "blur",
    "focusin",
    "focusout",
    "mouseenter",
    "mouseleave",
    "mouseover",
    "mouseout",
    "mousedown",
    "mouseup",
    "mousemove",
    "scroll",
    "resize",
    "contextmenu",
];

const BINDING_METHODS: &[&str] = &["on", "bind", "one", "delegate", "live", "hover"];

pub const ANIMATION_METHODS: &[&str] = &[
    "fadeIn",
    "fadeOut",
    "fadeToggle",
    "fadeTo",
    "slideUp",
    "slideDown",
    "slideToggle",
    "animate",
    "stop",
    "delay",
];

const TRAVERSAL_METHODS: &[&str] = &[
    "find", "children", "closest", "parent", "parents", "siblings", "next", "prev", "first",
    "last", "eq", "filter", "not", "end", "each", "map", "add",
];

/// Native element methods a `.click()`-style trigger maps onto directly.
const NATIVE_TRIGGERS: &[&str] = &["click", "focus", "blur", "select"];

/// What the element a jQuery call starts from is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Selector(String),
    Global(GlobalTarget),
    This,
}

impl Target {
    /// How the target is shown in reports: `#box`, `document`, `$(this)`.
    pub fn label(&self) -> String {
        match self {
            Self::Selector(selector) => selector.clone(),
            Self::Global(global) => global.as_str().to_string(),
            Self::This => "$(this)".to_string(),
        }
    }
}

/// What a method call in a chain does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRole {
    Binding,
    Mutation(MutationKind),
    Read,
    Animation,
    Trigger,
    AttributeWrite,
    Traversal,
    Ready,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct MethodCall<'a> {
    pub name: &'a str,
    /// The `call_expression` node of this step.
    pub node: Node<'a>,
    pub arguments: Vec<Node<'a>>,
}

impl<'a> MethodCall<'a> {
    pub fn role(&self) -> MethodRole {
        classify_method(self.name, &self.arguments)
    }

    pub fn argument(&self, index: usize) -> Option<Node<'a>> {
        self.arguments.get(index).copied()
    }
}

/// `$(target).a(..).b(..)` flattened into its root and steps.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    pub target: Target,
    pub root: Node<'a>,
    pub calls: Vec<MethodCall<'a>>,
}

impl<'a> Chain<'a> {
    /// Steps up to the first traversal: later steps act on other elements.
    pub fn effective_calls(&self) -> &[MethodCall<'a>] {
        let end = self
            .calls
            .iter()
            .position(|call| call.role() == MethodRole::Traversal)
            .unwrap_or(self.calls.len());
        &self.calls[..end]
    }

    pub fn has_role(&self, predicate: impl Fn(MethodRole) -> bool) -> bool {
        self.effective_calls().iter().any(|call| predicate(call.role()))
    }
}

pub fn is_jquery_name(name: &str) -> bool {
    name == "$" || name == "jQuery"
}

pub fn is_function_like(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_expression" | "function" | "arrow_function" | "generator_function"
    )
}

/// Named children of a call's argument list, comments excluded.
pub fn call_arguments(call: Node) -> Vec<Node> {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// The argument list node of `$(...)` / `jQuery(...)`.
pub fn jquery_call_arguments<'a>(node: Node<'a>, source: &str) -> Option<Vec<Node<'a>>> {
    if node.kind() != "call_expression" {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    if function.kind() != "identifier" || !is_jquery_name(node_text(function, source)) {
        return None;
    }
    Some(call_arguments(node))
}

/// Target of a direct `$(x)` call, without alias resolution.
pub fn direct_target(node: Node, source: &str) -> Option<Target> {
    let arguments = jquery_call_arguments(node, source)?;
    let first = arguments.first()?;
    match first.kind() {
        "string" => selector_literal(node_text(*first, source)),
        "template_string" if first.named_child_count() == 0 => {
            selector_literal(node_text(*first, source))
        }
        "identifier" => match node_text(*first, source) {
            "document" => Some(Target::Global(GlobalTarget::Document)),
            "window" => Some(Target::Global(GlobalTarget::Window)),
            _ => None,
        },
        "this" => Some(Target::This),
        _ => None,
    }
}

/// `'#id'` selects; `'<li class="x">'` creates markup and is not a selector.
fn selector_literal(literal: &str) -> Option<Target> {
    let selector = unquote(literal).trim();
    (!selector.is_empty() && !selector.starts_with('<'))
        .then(|| Target::Selector(selector.to_string()))
}

pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Flatten a method chain whose root is a jQuery selection.
pub fn flatten_chain<'a>(node: Node<'a>, ctx: &ScriptContext<'a>) -> Option<Chain<'a>> {
    let mut calls = Vec::new();
    let mut current = node;

    while current.kind() == "call_expression" {
        let Some(function) = current.child_by_field_name("function") else {
            break;
        };
        if function.kind() != "member_expression" {
            break;
        }
        let (Some(object), Some(property)) = (
            function.child_by_field_name("object"),
            function.child_by_field_name("property"),
        ) else {
            break;
        };
        calls.push(MethodCall {
            name: ctx.text(property),
            node: current,
            arguments: call_arguments(current),
        });
        current = object;
    }

    let target = ctx.target_of(current)?;
    calls.reverse();
    Some(Chain {
        target,
        root: current,
        calls,
    })
}

/// True unless `node` is the object of a further method call.
pub fn is_chain_head(node: Node) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    if parent.kind() != "member_expression"
        || parent.child_by_field_name("object").map(|o| o.id()) != Some(node.id())
    {
        return true;
    }
    match parent.parent() {
        Some(grand) => {
            grand.kind() != "call_expression"
                || grand.child_by_field_name("function").map(|f| f.id()) != Some(parent.id())
        }
        None => true,
    }
}

pub fn classify_method(name: &str, arguments: &[Node]) -> MethodRole {
    let argc = arguments.len();
    match name {
        "html" if argc > 0 => MethodRole::Mutation(MutationKind::Content),
        "text" if argc > 0 => MethodRole::Mutation(MutationKind::Text),
        "val" if argc > 0 => MethodRole::Mutation(MutationKind::Value),
        "html" | "text" | "val" => MethodRole::Read,
        "show" | "hide" if argc == 0 => MethodRole::Mutation(MutationKind::Visibility),
        "toggle" if argc <= 1 => MethodRole::Mutation(MutationKind::Visibility),
        "show" | "hide" | "toggle" => MethodRole::Animation,
        "addClass" | "removeClass" | "toggleClass" => {
            MethodRole::Mutation(MutationKind::ClassName)
        }
        "css" if argc >= 2 => MethodRole::Mutation(MutationKind::Style),
        "css" if argc == 1 && arguments[0].kind() == "object" => {
            MethodRole::Mutation(MutationKind::Style)
        }
        "css" => MethodRole::Read,
        "attr" | "prop" | "data" if argc >= 2 => MethodRole::AttributeWrite,
        "attr" | "prop" | "data" if argc == 1 && arguments[0].kind() == "object" => {
            MethodRole::AttributeWrite
        }
        "attr" | "prop" | "data" => MethodRole::Read,
        "removeAttr" | "removeProp" => MethodRole::AttributeWrite,
        "ready" => MethodRole::Ready,
        "trigger" => MethodRole::Trigger,
        _ if BINDING_METHODS.contains(&name) => MethodRole::Binding,
        _ if EVENT_SHORTHANDS.contains(&name) && argc > 0 => MethodRole::Binding,
        _ if EVENT_SHORTHANDS.contains(&name) => MethodRole::Trigger,
        _ if ANIMATION_METHODS.contains(&name) => MethodRole::Animation,
        _ if TRAVERSAL_METHODS.contains(&name) => MethodRole::Traversal,
        _ => MethodRole::Unknown,
    }
}

pub fn is_native_trigger(name: &str) -> bool {
    NATIVE_TRIGGERS.contains(&name)
}

/// Migration advice for an untranslated visual effect.
pub fn animation_suggestion(method: &str) -> &'static str {
    match method {
        "fadeIn" | "fadeOut" | "fadeToggle" | "fadeTo" => {
            "Replace with a CSS opacity transition (e.g. transition: opacity 300ms) toggled by a state-driven class"
        }
        "slideUp" | "slideDown" | "slideToggle" => {
            "Replace with a CSS max-height or transform transition toggled by a state-driven class"
        }
        "animate" => {
            "Move the animated properties into CSS transitions or keyframes, or use an animation library such as framer-motion"
        }
        "stop" | "delay" => {
            "Express timing with CSS transition-delay and transition-duration instead of queue control"
        }
        _ => "Replace the animated show/hide with conditional rendering plus a CSS transition",
    }
}
