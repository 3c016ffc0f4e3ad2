//! Renders script fragments back to text with jQuery idioms replaced.
//!
//! The translator reproduces a node's source exactly, including the
//! whitespace between children, and only substitutes the nodes it
//! recognizes. Comments are dropped along the way.

use super::animations;
use super::context::ScriptContext;
use super::remote;
use super::selectors::{
    flatten_chain, is_chain_head, is_jquery_name, is_native_trigger, Chain, MethodCall,
    MethodRole, Target,
};
use crate::descriptor::MutationKind;
use crate::naming;
use crate::text::{block_inner, dedent_continuation, line_indent, unquote};
use std::collections::HashSet;
use tree_sitter::Node;

pub struct Translator<'c, 'a> {
    ctx: &'c ScriptContext<'a>,
    this_expr: Option<String>,
    skipped: HashSet<usize>,
}

impl<'c, 'a> Translator<'c, 'a> {
    pub fn new(ctx: &'c ScriptContext<'a>) -> Self {
        Self {
            ctx,
            this_expr: None,
            skipped: HashSet::new(),
        }
    }

    /// Render `this` and `$(this)` as `expr`, e.g. `event.currentTarget`.
    pub fn with_this(mut self, expr: impl Into<String>) -> Self {
        self.this_expr = Some(expr.into());
        self
    }

    /// Leave these nodes out of the output entirely.
    pub fn skipping(mut self, nodes: impl IntoIterator<Item = Node<'a>>) -> Self {
        self.skipped.extend(nodes.into_iter().map(|node| node.id()));
        self
    }

    pub fn context(&self) -> &'c ScriptContext<'a> {
        self.ctx
    }

    pub fn render(&self, node: Node<'a>) -> String {
        if node.kind() == "comment" || self.skipped.contains(&node.id()) {
            return String::new();
        }
        if let Some(text) = self.translate_idiom(node) {
            return self.place(node, text);
        }
        if self.this_expr.is_some() && is_plain_function(node) {
            // A nested `function` rebinds `this`.
            let inner = Translator {
                ctx: self.ctx,
                this_expr: None,
                skipped: self.skipped.clone(),
            };
            return inner.render_children(node);
        }
        self.render_children(node)
    }

    /// Render a node cut out of its surroundings, with its continuation
    /// lines shifted left by the indentation of the line it starts on.
    pub fn fragment(&self, node: Node<'a>) -> String {
        let width = line_indent(self.ctx.source(), node.start_byte()).chars().count();
        dedent_continuation(&self.render(node), width)
    }

    /// Statements of a function body, dedented; concise arrow bodies become
    /// a `return` statement.
    pub fn function_body(&self, function: Node<'a>) -> String {
        match function.child_by_field_name("body") {
            Some(body) if body.kind() == "statement_block" => block_inner(&self.render(body)),
            Some(body) => format!("return {};", self.fragment(body)),
            None => String::new(),
        }
    }

    fn render_children(&self, node: Node<'a>) -> String {
        let source = self.ctx.source();
        if node.child_count() == 0 {
            return source[node.start_byte()..node.end_byte()].to_string();
        }
        let mut out = String::new();
        let mut position = node.start_byte();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.start_byte() > position {
                out.push_str(&source[position..child.start_byte()]);
            }
            out.push_str(&self.render(child));
            position = position.max(child.end_byte());
        }
        if node.end_byte() > position {
            out.push_str(&source[position..node.end_byte()]);
        }
        out
    }

    /// Align the continuation lines of a replacement with the line it replaces.
    fn place(&self, node: Node<'a>, text: String) -> String {
        if !text.contains('\n') {
            return text;
        }
        let indent = line_indent(self.ctx.source(), node.start_byte());
        let mut lines = text.lines();
        let mut out = lines.next().unwrap_or_default().to_string();
        for line in lines {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
                out.push_str(line);
            }
        }
        out
    }

    fn translate_idiom(&self, node: Node<'a>) -> Option<String> {
        match node.kind() {
            "call_expression" => self.translate_call(node),
            "assignment_expression" | "augmented_assignment_expression" | "update_expression" => {
                self.translate_state_update(node)
            }
            "this" => self.this_expr.clone(),
            _ => None,
        }
    }

    fn translate_call(&self, node: Node<'a>) -> Option<String> {
        if let Some(request) = remote::remote_chain(node, self.ctx) {
            return Some(remote::render_fetch(&request, self));
        }
        if let Some(text) = self.translate_utility(node) {
            return Some(text);
        }
        let chain = flatten_chain(node, self.ctx)?;
        if !chain.calls.is_empty() && !is_chain_head(node) {
            return None;
        }
        self.translate_chain(&chain, node)
    }

    fn translate_chain(&self, chain: &Chain<'a>, head: Node<'a>) -> Option<String> {
        let element = self.element(&chain.target);
        if chain.calls.is_empty() {
            return Some(element.expr);
        }

        let is_statement = head
            .parent()
            .is_some_and(|parent| parent.kind() == "expression_statement");
        let mut steps = Vec::new();
        for call in &chain.calls {
            let step = match call.role() {
                MethodRole::Mutation(kind) => match &chain.target {
                    Target::Selector(selector) => self.state_mutation(selector, kind, call),
                    _ => self.dom_mutation(&element, kind, call),
                },
                MethodRole::Read => self.read(&chain.target, &element, call),
                MethodRole::AttributeWrite => self.attribute_write(&element, call),
                MethodRole::Trigger => self.trigger(&element, call),
                MethodRole::Animation => {
                    let usage = animations::usage(&chain.target, call, self.ctx);
                    let comment =
                        format!("/* {}: animation not translated, see conversion report */", usage.label());
                    match call.arguments.last().filter(|arg| super::selectors::is_function_like(**arg)) {
                        // Keep whatever ran once the animation finished.
                        Some(callback) if is_statement => {
                            let body = self.function_body(*callback);
                            let body = body.trim_end();
                            // The statement supplies the final semicolon.
                            format!("{comment}\n{}", body.strip_suffix(';').unwrap_or(body))
                        }
                        _ if is_statement => comment,
                        _ => format!("void 0 {comment}"),
                    }
                }
                _ => return None,
            };
            steps.push(step);
        }

        Some(match steps.len() {
            1 => steps.remove(0),
            _ if is_statement => steps.join(";\n"),
            _ => format!("({})", steps.join(", ")),
        })
    }

    fn element(&self, target: &Target) -> Element {
        match target {
            Target::Selector(selector) => Element {
                expr: format!("{}.current", self.ctx.reference_name(selector)),
                optional: true,
            },
            Target::Global(global) => Element {
                expr: global.as_str().to_string(),
                optional: false,
            },
            Target::This => Element {
                expr: self.this_expr.clone().unwrap_or_else(|| "this".to_string()),
                optional: false,
            },
        }
    }

    fn argument(&self, call: &MethodCall<'a>, index: usize) -> Option<String> {
        call.argument(index).map(|node| self.fragment(node))
    }

    /// String literal argument, unquoted.
    fn literal_argument(&self, call: &MethodCall<'a>, index: usize) -> Option<&'a str> {
        call.argument(index)
            .filter(|node| node.kind() == "string")
            .map(|node| unquote(self.ctx.text(node)))
    }

    fn state_mutation(&self, selector: &str, kind: MutationKind, call: &MethodCall<'a>) -> String {
        let setter = naming::setter_name(&naming::state_name(selector, kind));
        let value = self.argument(call, 0);
        match (kind, call.name) {
            (MutationKind::Visibility, "show") => format!("{setter}(true)"),
            (MutationKind::Visibility, "hide") => format!("{setter}(false)"),
            (MutationKind::Visibility, _) => match value {
                Some(flag) => format!("{setter}({flag})"),
                None => format!("{setter}((visible) => !visible)"),
            },
            (MutationKind::ClassName, "addClass") => format!(
                "{setter}((className) => [className, {}].filter(Boolean).join(' '))",
                value.unwrap_or_default()
            ),
            (MutationKind::ClassName, "removeClass") => match value {
                Some(name) => format!(
                    "{setter}((className) => className.split(' ').filter((name) => name !== {name}).join(' '))"
                ),
                None => format!("{setter}('')"),
            },
            (MutationKind::ClassName, _) => {
                let name = value.unwrap_or_default();
                format!(
                    "{setter}((className) => {{ const names = className.split(' ').filter(Boolean); \
                     return names.includes({name}) ? names.filter((name) => name !== {name}).join(' ') \
                     : [...names, {name}].join(' '); }})"
                )
            }
            (MutationKind::Style, _) => match (self.literal_argument(call, 0), call.arguments.len()) {
                (Some(property), 2) => format!(
                    "{setter}((style) => ({{ ...style, {}: {} }}))",
                    naming::css_property_name(property),
                    self.argument(call, 1).unwrap_or_default()
                ),
                (None, 2) => format!(
                    "{setter}((style) => ({{ ...style, [{}]: {} }}))",
                    value.unwrap_or_default(),
                    self.argument(call, 1).unwrap_or_default()
                ),
                _ => format!(
                    "{setter}((style) => ({{ ...style, ...{} }}))",
                    value.unwrap_or_default()
                ),
            },
            _ => format!("{setter}({})", value.unwrap_or_default()),
        }
    }

    fn dom_mutation(&self, element: &Element, kind: MutationKind, call: &MethodCall<'a>) -> String {
        let expr = &element.expr;
        let value = self.argument(call, 0).unwrap_or_default();
        match (kind, call.name) {
            (MutationKind::Content, _) => format!("{expr}.innerHTML = {value}"),
            (MutationKind::Text, _) => format!("{expr}.textContent = {value}"),
            (MutationKind::Value, _) => format!("{expr}.value = {value}"),
            (MutationKind::Visibility, "show") => format!("{expr}.style.display = ''"),
            (MutationKind::Visibility, "hide") => format!("{expr}.style.display = 'none'"),
            (MutationKind::Visibility, _) => format!(
                "{expr}.style.display = {expr}.style.display === 'none' ? '' : 'none'"
            ),
            (MutationKind::ClassName, "addClass") => format!("{expr}.classList.add({value})"),
            (MutationKind::ClassName, "removeClass") if call.arguments.is_empty() => {
                format!("{expr}.className = ''")
            }
            (MutationKind::ClassName, "removeClass") => format!("{expr}.classList.remove({value})"),
            (MutationKind::ClassName, _) => format!("{expr}.classList.toggle({value})"),
            (MutationKind::Style, _) => match (self.literal_argument(call, 0), call.arguments.len()) {
                (Some(property), 2) => format!(
                    "{expr}.style.{} = {}",
                    naming::css_property_name(property),
                    self.argument(call, 1).unwrap_or_default()
                ),
                (None, 2) => format!(
                    "{expr}.style[{value}] = {}",
                    self.argument(call, 1).unwrap_or_default()
                ),
                _ => format!("Object.assign({expr}.style, {value})"),
            },
        }
    }

    fn read(&self, target: &Target, element: &Element, call: &MethodCall<'a>) -> String {
        // Values a mutation already owns are read back from state.
        let owned = match (target, call.name) {
            (Target::Selector(selector), "val") => Some(naming::state_name(selector, MutationKind::Value)),
            (Target::Selector(selector), "text") => Some(naming::state_name(selector, MutationKind::Text)),
            (Target::Selector(selector), "html") => {
                Some(naming::state_name(selector, MutationKind::Content))
            }
            _ => None,
        };
        if let Some(state) = owned.filter(|state| self.ctx.has_mutated_state(state)) {
            return state;
        }

        let access = element.access();
        match call.name {
            "val" => format!("{access}value"),
            "text" => format!("{access}textContent"),
            "html" => format!("{access}innerHTML"),
            "css" => match self.literal_argument(call, 0) {
                Some(property) => format!("{access}style.{}", naming::css_property_name(property)),
                None => format!(
                    "{access}style[{}]",
                    self.argument(call, 0).unwrap_or_default()
                ),
            },
            "attr" => format!(
                "{access}getAttribute({})",
                self.argument(call, 0).unwrap_or_default()
            ),
            "data" => match self.literal_argument(call, 0) {
                Some(key) => format!("{access}dataset.{}", naming::css_property_name(key)),
                None if call.arguments.is_empty() => format!("{access}dataset"),
                None => format!(
                    "{access}dataset[{}]",
                    self.argument(call, 0).unwrap_or_default()
                ),
            },
            _ => {
                let key = self.argument(call, 0).unwrap_or_default();
                if element.optional {
                    format!("{}?.[{key}]", element.expr)
                } else {
                    format!("{}[{key}]", element.expr)
                }
            }
        }
    }

    fn attribute_write(&self, element: &Element, call: &MethodCall<'a>) -> String {
        let expr = &element.expr;
        let access = element.access();
        let name = self.argument(call, 0).unwrap_or_default();
        let value = self.argument(call, 1);
        match (call.name, value) {
            ("removeAttr", _) => format!("{access}removeAttribute({name})"),
            ("removeProp", _) => format!("delete {expr}[{name}]"),
            ("attr", Some(value)) => format!("{access}setAttribute({name}, {value})"),
            ("attr", None) => format!(
                "Object.entries({name}).forEach(([name, value]) => {access}setAttribute(name, value))"
            ),
            ("data", Some(value)) => match self.literal_argument(call, 0) {
                Some(key) => format!("{expr}.dataset.{} = {value}", naming::css_property_name(key)),
                None => format!("{expr}.dataset[{name}] = {value}"),
            },
            ("data", None) => format!("Object.assign({expr}.dataset, {name})"),
            (_, Some(value)) => format!("{expr}[{name}] = {value}"),
            (_, None) => format!("Object.assign({expr}, {name})"),
        }
    }

    fn trigger(&self, element: &Element, call: &MethodCall<'a>) -> String {
        let access = element.access();
        match call.name {
            "submit" => format!("{access}requestSubmit()"),
            "trigger" => format!(
                "{access}dispatchEvent(new Event({}, {{ bubbles: true }}))",
                self.argument(call, 0).unwrap_or_default()
            ),
            name if is_native_trigger(name) => format!("{access}{name}()"),
            name => format!("{access}dispatchEvent(new Event('{name}', {{ bubbles: true }}))"),
        }
    }

    /// `counter = x`, `counter += x` and `counter++` on reactive variables.
    fn translate_state_update(&self, node: Node<'a>) -> Option<String> {
        let (target, operator) = match node.kind() {
            "update_expression" => (
                node.child_by_field_name("argument")?,
                node.child_by_field_name("operator")
                    .map(|op| self.ctx.text(op))
                    .unwrap_or("++"),
            ),
            _ => (
                node.child_by_field_name("left")?,
                node.child_by_field_name("operator")
                    .map(|op| self.ctx.text(op))
                    .unwrap_or("="),
            ),
        };
        if target.kind() != "identifier" {
            return None;
        }
        let name = self.ctx.text(target);
        if !self.ctx.is_reactive_variable(name) {
            return None;
        }
        let setter = naming::setter_name(name);

        Some(match (node.kind(), operator) {
            ("update_expression", "--") => format!("{setter}(({name}) => {name} - 1)"),
            ("update_expression", _) => format!("{setter}(({name}) => {name} + 1)"),
            (_, "=") => format!(
                "{setter}({})",
                self.fragment(node.child_by_field_name("right")?)
            ),
            (_, compound) => format!(
                "{setter}(({name}) => {name} {} ({}))",
                compound.trim_end_matches('='),
                self.fragment(node.child_by_field_name("right")?)
            ),
        })
    }

    /// Static helpers such as `$.trim(x)` that have a direct standard equivalent.
    fn translate_utility(&self, node: Node<'a>) -> Option<String> {
        let function = node.child_by_field_name("function")?;
        if function.kind() != "member_expression" {
            return None;
        }
        let object = function.child_by_field_name("object")?;
        if object.kind() != "identifier" || !is_jquery_name(self.ctx.text(object)) {
            return None;
        }
        let method = self.ctx.text(function.child_by_field_name("property")?);
        let arguments: Vec<String> = super::selectors::call_arguments(node)
            .into_iter()
            .map(|argument| self.fragment(argument))
            .collect();
        let first = arguments.first().cloned().unwrap_or_default();

        Some(match method {
            "trim" => format!("String({first}).trim()"),
            "isArray" => format!("Array.isArray({first})"),
            "parseJSON" => format!("JSON.parse({first})"),
            "isFunction" => format!("typeof {first} === 'function'"),
            "now" => "Date.now()".to_string(),
            "inArray" => format!(
                "{}.indexOf({first})",
                arguments.get(1).cloned().unwrap_or_default()
            ),
            "extend" => {
                // A leading `true` asks for a deep copy; a shallow merge is the closest standard form.
                let rest: Vec<&String> = arguments
                    .iter()
                    .skip(usize::from(first == "true"))
                    .collect();
                format!(
                    "Object.assign({})",
                    rest.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                )
            }
            _ => return None,
        })
    }
}

/// An element expression and whether reads through it need `?.`.
struct Element {
    expr: String,
    optional: bool,
}

impl Element {
    fn access(&self) -> String {
        if self.optional {
            format!("{}?.", self.expr)
        } else {
            format!("{}.", self.expr)
        }
    }
}

fn is_plain_function(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_expression"
            | "function"
            | "function_declaration"
            | "generator_function"
            | "generator_function_declaration"
            | "method_definition"
    )
}

/// Parameter list text without the surrounding parentheses.
pub fn parameters_of(function: Node, ctx: &ScriptContext) -> String {
    if let Some(parameter) = function.child_by_field_name("parameter") {
        return ctx.text(parameter).to_string();
    }
    function
        .child_by_field_name("parameters")
        .map(|parameters| {
            let text = ctx.text(parameters).trim();
            let inner = text
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .unwrap_or(text);
            inner.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .unwrap_or_default()
}

/// First parameter when it is a plain identifier.
pub fn first_parameter(parameters: &str) -> Option<&str> {
    let first = parameters.split(',').next()?.trim();
    let valid = !first.is_empty()
        && first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    valid.then_some(first)
}
