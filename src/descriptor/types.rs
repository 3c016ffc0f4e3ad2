//! Intermediate model accumulated by the extraction passes.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Whether a declaration becomes `useState` or a plain `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Reactive,
    Constant,
}

/// The kind of DOM mutation a synthesized state variable replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// `.html(x)`
    Content,
    /// `.text(x)`
    Text,
    /// `.val(x)`
    Value,
    /// `.show()`, `.hide()`, `.toggle()`
    Visibility,
    /// `.addClass(x)`, `.removeClass(x)`, `.toggleClass(x)`
    ClassName,
    /// `.css(..)`
    Style,
}

impl MutationKind {
    /// Suffix appended to the selector identifier to name the state.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Content => "Html",
            Self::Text => "Text",
            Self::Value => "Value",
            Self::Visibility => "Visible",
            Self::ClassName => "ClassName",
            Self::Style => "Style",
        }
    }

    pub fn default_initial_value(self) -> &'static str {
        match self {
            Self::Content | Self::Text | Self::Value | Self::ClassName => "''",
            Self::Visibility => "true",
            Self::Style => "{}",
        }
    }

    pub fn is_style(self) -> bool {
        matches!(self, Self::Style)
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Content => "content",
            Self::Text => "text",
            Self::Value => "form value",
            Self::Visibility => "visibility",
            Self::ClassName => "class name",
            Self::Style => "style",
        };
        f.write_str(label)
    }
}

/// Why a synthesized state variable exists: the element and mutation it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePurpose {
    pub selector: String,
    pub mutation: MutationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateVariable {
    pub identifier: String,
    pub initial_value: String,
    pub kind: StateKind,
    pub purpose: Option<StatePurpose>,
}

impl StateVariable {
    pub fn reactive(identifier: impl Into<String>, initial_value: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            initial_value: initial_value.into(),
            kind: StateKind::Reactive,
            purpose: None,
        }
    }

    pub fn constant(identifier: impl Into<String>, initial_value: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            initial_value: initial_value.into(),
            kind: StateKind::Constant,
            purpose: None,
        }
    }

    pub fn with_purpose(mut self, selector: impl Into<String>, mutation: MutationKind) -> Self {
        self.purpose = Some(StatePurpose {
            selector: selector.into(),
            mutation,
        });
        self
    }

    pub fn is_reactive(&self) -> bool {
        self.kind == StateKind::Reactive
    }

    pub fn setter_name(&self) -> String {
        crate::naming::setter_name(&self.identifier)
    }
}

/// A `useRef` handle for one element, derived from its selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StableReference {
    pub identifier: String,
    pub selector: String,
}

/// Objects that exist outside the component tree and cannot carry a ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalTarget {
    Document,
    Window,
}

impl GlobalTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Window => "window",
        }
    }
}

/// Where a listener gets attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerTarget {
    Reference(String),
    Global(GlobalTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventHandlerBinding {
    /// Selector the handler reacts to (the child selector for delegated bindings).
    pub selector: String,
    pub event_name: String,
    pub handler_name: String,
    pub parameters: String,
    pub translated_body: String,
    pub delegation_parent: Option<String>,
    pub target: ListenerTarget,
    /// Bound with `.one(..)`: the listener removes itself after the first event.
    pub once: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "trigger", content = "event")]
pub enum EffectTrigger {
    Mount,
    Event(String),
    DataFetch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub trigger: EffectTrigger,
    pub code: String,
    pub dependencies: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: String,
    pub body: String,
    pub is_async: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCallKind {
    /// `$.ajax({...})`
    Generic,
    /// `$.get(..)`, `$.getJSON(..)`
    Get,
    /// `$.post(..)`
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteCall {
    pub kind: RemoteCallKind,
    pub url: String,
    pub method: String,
    pub request_body: Option<String>,
    pub success_handler: Option<String>,
    pub error_handler: Option<String>,
    pub translated_code: String,
}

/// A visual effect that is reported instead of translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationUsage {
    pub selector: String,
    pub method: String,
    pub arguments: String,
    pub suggestion: String,
}

impl AnimationUsage {
    /// `#box.fadeIn(400)`
    pub fn label(&self) -> String {
        format!("{}.{}({})", self.selector, self.method, self.arguments)
    }
}

/// One direct DOM mutation site; kept for the batch counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationSite {
    pub selector: String,
    pub method: String,
    pub kind: MutationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Stylesheet,
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalResource {
    pub original_reference: String,
    pub resolved_path: PathBuf,
    pub kind: ResourceKind,
}

/// Hook capabilities the generated component imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    StatefulValue,
    SideEffect,
    StableReference,
}

impl Capability {
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::StatefulValue => "useState",
            Self::SideEffect => "useEffect",
            Self::StableReference => "useRef",
        }
    }
}

/// Per-file counts used by the conversion report and the batch summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub selectors: usize,
    pub event_handlers: usize,
    pub mutations: usize,
    pub remote_calls: usize,
    pub animations: usize,
    pub style_mutations: usize,
}

impl ConversionStats {
    pub fn accumulate(&mut self, other: &ConversionStats) {
        self.selectors += other.selectors;
        self.event_handlers += other.event_handlers;
        self.mutations += other.mutations;
        self.remote_calls += other.remote_calls;
        self.animations += other.animations;
        self.style_mutations += other.style_mutations;
    }
}

/// The completed, read-only model handed to the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    pub component_name: String,
    pub source_name: String,
    pub capabilities: Vec<Capability>,
    pub states: Vec<StateVariable>,
    pub references: Vec<StableReference>,
    pub handlers: Vec<EventHandlerBinding>,
    pub effects: Vec<Effect>,
    pub functions: Vec<FunctionDefinition>,
    pub remote_calls: Vec<RemoteCall>,
    pub animations: Vec<AnimationUsage>,
    pub mutations: Vec<MutationSite>,
    pub selectors: Vec<String>,
    pub warnings: Vec<String>,
    pub resources: Vec<ExternalResource>,
    pub embedded_styles: Option<String>,
}

impl ComponentDescriptor {
    pub fn reactive_states(&self) -> impl Iterator<Item = &StateVariable> {
        self.states.iter().filter(|state| state.is_reactive())
    }

    pub fn constant_states(&self) -> impl Iterator<Item = &StateVariable> {
        self.states.iter().filter(|state| !state.is_reactive())
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// States synthesized for the element a reference points at.
    ///
    /// Matching goes through the identifier derived from the selector, so
    /// `#item` and `.item` share their state the same way they share their
    /// reference.
    pub fn states_for_reference<'a>(
        &'a self,
        reference: &'a StableReference,
    ) -> impl Iterator<Item = &'a StateVariable> + 'a {
        let key = crate::naming::selector_to_identifier(&reference.selector);
        self.states.iter().filter(move |state| {
            state
                .purpose
                .as_ref()
                .is_some_and(|purpose| crate::naming::selector_to_identifier(&purpose.selector) == key)
        })
    }

    pub fn stats(&self) -> ConversionStats {
        let style_mutations = self
            .mutations
            .iter()
            .filter(|site| site.kind.is_style())
            .count();
        ConversionStats {
            selectors: self.selectors.len(),
            event_handlers: self.handlers.len(),
            mutations: self.mutations.len() - style_mutations,
            remote_calls: self.remote_calls.len(),
            animations: self.animations.len(),
            style_mutations,
        }
    }
}
