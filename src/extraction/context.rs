//! Parsed script plus the whole-file facts every pass reads.
//!
//! Everything here is computed once, before the first pass runs, so the
//! passes themselves only ever read the context and write the builder.

use super::selectors::{self, call_arguments, direct_target, is_function_like, node_text, Target};
use crate::descriptor::{GlobalTarget, StateKind};
use crate::errors::{ConvertError, Result};
use crate::naming;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Parser, Tree};

/// Parse JavaScript source with the tree-sitter grammar.
///
/// Syntax errors do not fail the parse; they surface as `ERROR` nodes that
/// no recognizer matches.
pub fn parse_script(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| ConvertError::Language(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ConvertError::Language("parser produced no syntax tree".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The program itself and immediately invoked wrappers.
    TopLevel,
    /// The callback of a ready/load idiom.
    Ready,
}

/// A statement list whose declarations and bindings the passes consider.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub body: Node<'a>,
    pub kind: ScopeKind,
    /// The call that introduced the scope, for init blocks and wrappers.
    pub call: Option<Node<'a>>,
}

pub struct ScriptContext<'a> {
    source: &'a str,
    root: Node<'a>,
    scopes: Vec<Scope<'a>>,
    scope_bodies: HashSet<usize>,
    aliases: HashMap<String, String>,
    functions: HashMap<String, Node<'a>>,
    variables: HashSet<String>,
    reassigned: HashSet<String>,
    mutation_arguments: HashSet<String>,
    mutated_states: HashSet<String>,
    /// Every name the script binds or reads, so generated refs never shadow one.
    identifiers: HashSet<&'a str>,
}

impl<'a> ScriptContext<'a> {
    pub fn new(source: &'a str, root: Node<'a>) -> Self {
        let mut ctx = Self {
            source,
            root,
            scopes: Vec::new(),
            scope_bodies: HashSet::new(),
            aliases: HashMap::new(),
            functions: HashMap::new(),
            variables: HashSet::new(),
            reassigned: HashSet::new(),
            mutation_arguments: HashSet::new(),
            mutated_states: HashSet::new(),
            identifiers: HashSet::new(),
        };
        ctx.collect_scopes();
        ctx.collect_declarations();
        ctx.collect_usage_facts();
        ctx
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn root(&self) -> Node<'a> {
        self.root
    }

    pub fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    pub fn scopes(&self) -> &[Scope<'a>] {
        &self.scopes
    }

    /// Statements of every scope, in scope order, comments excluded.
    pub fn scope_statements(&self) -> Vec<(Scope<'a>, Node<'a>)> {
        self.scopes
            .iter()
            .flat_map(|scope| {
                statements_of(scope.body)
                    .into_iter()
                    .map(move |statement| (*scope, statement))
            })
            .collect()
    }

    /// True when `node` is the expression of a statement sitting directly in a scope.
    pub fn is_scope_expression(&self, node: Node) -> bool {
        node.parent()
            .filter(|parent| parent.kind() == "expression_statement")
            .and_then(|statement| statement.parent())
            .is_some_and(|body| self.scope_bodies.contains(&body.id()))
    }

    /// Pre-order walk over every node of the script.
    pub fn walk(&self, mut visit: impl FnMut(Node<'a>)) {
        walk_node(self.root, &mut visit);
    }

    /// Pre-order walk over the subtree rooted at `node`.
    pub fn walk_from(&self, node: Node<'a>, mut visit: impl FnMut(Node<'a>)) {
        walk_node(node, &mut visit);
    }

    /// Resolve the element a chain root refers to, following selector aliases.
    pub fn target_of(&self, node: Node) -> Option<Target> {
        if node.kind() == "identifier" {
            return self
                .aliases
                .get(self.text(node))
                .map(|selector| Target::Selector(selector.clone()));
        }
        direct_target(node, self.source)
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// A function declared in a scope under `name`.
    pub fn function(&self, name: &str) -> Option<Node<'a>> {
        self.functions.get(name).copied()
    }

    /// Reactive unless the name reads as a constant; otherwise reactive
    /// exactly when it is reassigned or fed into a mutation.
    pub fn classify(&self, name: &str) -> StateKind {
        if naming::is_constant_name(name) {
            return StateKind::Constant;
        }
        if self.reassigned.contains(name) || self.mutation_arguments.contains(name) {
            StateKind::Reactive
        } else {
            StateKind::Constant
        }
    }

    /// True for declared script variables that become reactive state.
    pub fn is_reactive_variable(&self, name: &str) -> bool {
        self.variables.contains(name) && self.classify(name) == StateKind::Reactive
    }

    /// True when some mutation in the file produces the named derived state.
    pub fn has_mutated_state(&self, identifier: &str) -> bool {
        self.mutated_states.contains(identifier)
    }

    /// The callback of a ready/load idiom, if `node` is one.
    pub fn init_callback(&self, node: Node<'a>) -> Option<Node<'a>> {
        if node.kind() != "call_expression" {
            return None;
        }

        // $(fn) / jQuery(fn)
        if let Some(arguments) = selectors::jquery_call_arguments(node, self.source) {
            return arguments.first().copied().filter(|arg| is_function_like(*arg));
        }

        let function = node.child_by_field_name("function")?;
        if function.kind() != "member_expression" {
            return None;
        }
        let object = function.child_by_field_name("object")?;
        let method = self.text(function.child_by_field_name("property")?);
        let arguments = call_arguments(node);
        let callback = arguments.last().copied().filter(|arg| is_function_like(*arg))?;
        let event = arguments
            .first()
            .filter(|arg| arg.kind() == "string")
            .map(|arg| crate::text::unquote(self.text(*arg)));

        // document.addEventListener('DOMContentLoaded', fn)
        if object.kind() == "identifier" && method == "addEventListener" {
            let global = self.text(object);
            return match (global, event) {
                ("document", Some("DOMContentLoaded")) | ("window", Some("load")) => Some(callback),
                _ => None,
            };
        }

        let target = direct_target(object, self.source)?;
        let is_ready = match (&target, method) {
            (Target::Global(GlobalTarget::Document), "ready") => true,
            (Target::Global(GlobalTarget::Window), "load") => arguments.len() == 1,
            (Target::Global(GlobalTarget::Window), "on" | "bind") => event == Some("load"),
            (Target::Global(GlobalTarget::Document), "on" | "bind") => event == Some("ready"),
            _ => false,
        };
        is_ready.then_some(callback)
    }

    /// The function body of an immediately invoked wrapper such as
    /// `(function ($) { ... })(jQuery);`.
    fn iife_body(&self, node: Node<'a>) -> Option<Node<'a>> {
        if node.kind() != "call_expression" {
            return None;
        }
        let mut callee = node.child_by_field_name("function")?;
        while callee.kind() == "parenthesized_expression" {
            callee = callee.named_child(0)?;
        }
        if !is_function_like(callee) {
            return None;
        }
        callee
            .child_by_field_name("body")
            .filter(|body| body.kind() == "statement_block")
    }

    /// True if `statement` introduces a scope of its own.
    pub fn is_scope_statement(&self, statement: Node<'a>) -> bool {
        statement_expression(statement).is_some_and(|expr| {
            self.init_callback(expr).is_some() || self.iife_body(expr).is_some()
        })
    }

    fn collect_scopes(&mut self) {
        let mut pending = vec![Scope {
            body: self.root,
            kind: ScopeKind::TopLevel,
            call: None,
        }];

        while let Some(scope) = pending.pop() {
            self.scope_bodies.insert(scope.body.id());
            self.scopes.push(scope);
            let mut nested = Vec::new();
            for statement in statements_of(scope.body) {
                let Some(expr) = statement_expression(statement) else {
                    continue;
                };
                if let Some(callback) = self.init_callback(expr) {
                    if let Some(body) = callback
                        .child_by_field_name("body")
                        .filter(|body| body.kind() == "statement_block")
                    {
                        nested.push(Scope {
                            body,
                            kind: ScopeKind::Ready,
                            call: Some(expr),
                        });
                    }
                } else if let Some(body) = self.iife_body(expr) {
                    nested.push(Scope {
                        body,
                        kind: ScopeKind::TopLevel,
                        call: Some(expr),
                    });
                }
            }
            // Reverse so nested scopes pop in document order.
            pending.extend(nested.into_iter().rev());
        }
    }

    fn collect_declarations(&mut self) {
        let bodies: Vec<Node<'a>> = self.scopes.iter().map(|scope| scope.body).collect();
        for body in bodies {
            for statement in statements_of(body) {
                match statement.kind() {
                    "function_declaration" | "generator_function_declaration" => {
                        if let Some(name) = statement.child_by_field_name("name") {
                            self.functions.insert(self.text(name).to_string(), statement);
                        }
                    }
                    "lexical_declaration" | "variable_declaration" => {
                        for (name, value) in declarators(statement, self.source) {
                            match value {
                                Some(value) if is_function_like(value) => {
                                    self.functions.insert(name.to_string(), value);
                                }
                                Some(value) => match direct_target(value, self.source) {
                                    Some(Target::Selector(selector)) => {
                                        self.aliases.insert(name.to_string(), selector);
                                    }
                                    _ => {
                                        self.variables.insert(name.to_string());
                                    }
                                },
                                None => {
                                    self.variables.insert(name.to_string());
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn collect_usage_facts(&mut self) {
        let mut reassigned = HashSet::new();
        let mut mutation_arguments = HashSet::new();
        let mut mutated_states = HashSet::new();
        let mut identifiers = HashSet::new();

        self.walk(|node| match node.kind() {
            "identifier" | "shorthand_property_identifier" => {
                identifiers.insert(self.text(node));
            }
            "assignment_expression" | "augmented_assignment_expression" => {
                if let Some(left) = node
                    .child_by_field_name("left")
                    .filter(|left| left.kind() == "identifier")
                {
                    reassigned.insert(self.text(left).to_string());
                }
            }
            "update_expression" => {
                if let Some(argument) = node
                    .child_by_field_name("argument")
                    .filter(|arg| arg.kind() == "identifier")
                {
                    reassigned.insert(self.text(argument).to_string());
                }
            }
            "call_expression" if selectors::is_chain_head(node) => {
                let Some(chain) = selectors::flatten_chain(node, self) else {
                    return;
                };
                for call in chain.effective_calls() {
                    let role = call.role();
                    let feeds_state = matches!(
                        role,
                        selectors::MethodRole::Mutation(_) | selectors::MethodRole::AttributeWrite
                    );
                    if feeds_state {
                        for argument in &call.arguments {
                            self.walk_from(*argument, |inner| {
                                if inner.kind() == "identifier" {
                                    mutation_arguments.insert(self.text(inner).to_string());
                                }
                            });
                        }
                    }
                    if let (selectors::MethodRole::Mutation(kind), Target::Selector(selector)) =
                        (role, &chain.target)
                    {
                        mutated_states.insert(naming::state_name(selector, kind));
                    }
                }
            }
            _ => {}
        });

        self.reassigned = reassigned;
        self.mutation_arguments = mutation_arguments;
        self.mutated_states = mutated_states;
        self.identifiers = identifiers;
    }

    /// The ref identifier for `selector`, suffixed when the script already
    /// uses the plain name for something else.
    pub fn reference_name(&self, selector: &str) -> String {
        let base = naming::reference_name(selector);
        let mut candidate = base.clone();
        let mut counter = 2;
        while self.identifiers.contains(candidate.as_str()) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        candidate
    }
}

fn walk_node<'a>(node: Node<'a>, visit: &mut impl FnMut(Node<'a>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_node(child, visit);
    }
}

/// Named statements of a program or statement block, comments excluded.
pub fn statements_of(body: Node) -> Vec<Node> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// The expression of an `expression_statement`.
pub fn statement_expression(statement: Node) -> Option<Node> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    statement.named_child(0)
}

/// `(name, value)` pairs of a declaration whose declarators bind plain
/// identifiers. Destructuring declarators are left out.
pub fn declarators<'a, 's>(
    declaration: Node<'a>,
    source: &'s str,
) -> Vec<(&'s str, Option<Node<'a>>)> {
    let mut cursor = declaration.walk();
    declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .filter_map(|declarator| {
            let name = declarator.child_by_field_name("name")?;
            (name.kind() == "identifier")
                .then(|| (node_text(name, source), declarator.child_by_field_name("value")))
        })
        .collect()
}

/// True when every declarator of a declaration binds a plain identifier.
pub fn is_simple_declaration(declaration: Node) -> bool {
    let mut cursor = declaration.walk();
    let simple = declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .all(|declarator| {
            declarator
                .child_by_field_name("name")
                .is_some_and(|name| name.kind() == "identifier")
        });
    simple
}
