//! Accumulates extraction results into a [`ComponentDescriptor`].
//!
//! The builder owns de-duplication: identifiers are unique across the whole
//! descriptor, first-discovered order is preserved, and effect dependency
//! lists are resolved only in [`ComponentBuilder::finish`], once every pass
//! has contributed to the reactive state set.

use super::dependencies::infer_dependencies;
use super::types::{
    AnimationUsage, Capability, ComponentDescriptor, Effect, EffectTrigger, EventHandlerBinding,
    ExternalResource, FunctionDefinition, ListenerTarget, MutationKind, MutationSite, RemoteCall,
    StableReference, StateVariable,
};
use crate::naming;
use std::collections::HashSet;

/// The reactive visibility state synthesized for the element behind `selector`.
fn visibility_state<'s>(states: &'s [StateVariable], selector: &str) -> Option<&'s str> {
    let key = naming::selector_to_identifier(selector);
    states
        .iter()
        .filter(|state| state.is_reactive())
        .find(|state| {
            state.purpose.as_ref().is_some_and(|purpose| {
                purpose.mutation == MutationKind::Visibility
                    && naming::selector_to_identifier(&purpose.selector) == key
            })
        })
        .map(|state| state.identifier.as_str())
}

/// An effect whose dependency list is not known yet.
#[derive(Debug, Clone)]
struct PendingEffect {
    trigger: EffectTrigger,
    code: String,
    description: String,
    /// Text scanned for reactive identifiers; `None` pins an empty list.
    dependency_source: Option<String>,
    /// Selector of the element a listener effect reads through its ref.
    listener_owner: Option<String>,
}

#[derive(Debug)]
pub struct ComponentBuilder {
    component_name: String,
    source_name: String,
    identifiers: HashSet<String>,
    states: Vec<StateVariable>,
    references: Vec<StableReference>,
    handlers: Vec<EventHandlerBinding>,
    effects: Vec<PendingEffect>,
    functions: Vec<FunctionDefinition>,
    claimed_functions: HashSet<String>,
    remote_calls: Vec<RemoteCall>,
    animations: Vec<AnimationUsage>,
    mutations: Vec<MutationSite>,
    selectors: Vec<String>,
    warnings: Vec<String>,
    resources: Vec<ExternalResource>,
    embedded_styles: Option<String>,
}

impl ComponentBuilder {
    pub fn new(component_name: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            source_name: source_name.into(),
            identifiers: HashSet::new(),
            states: Vec::new(),
            references: Vec::new(),
            handlers: Vec::new(),
            effects: Vec::new(),
            functions: Vec::new(),
            claimed_functions: HashSet::new(),
            remote_calls: Vec::new(),
            animations: Vec::new(),
            mutations: Vec::new(),
            selectors: Vec::new(),
            warnings: Vec::new(),
            resources: Vec::new(),
            embedded_styles: None,
        }
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn is_identifier_taken(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Adds a state variable unless its identifier is already in use.
    pub fn add_state(&mut self, state: StateVariable) -> bool {
        if !self.identifiers.insert(state.identifier.clone()) {
            return false;
        }
        self.states.push(state);
        true
    }

    pub fn state(&self, identifier: &str) -> Option<&StateVariable> {
        self.states.iter().find(|state| state.identifier == identifier)
    }

    pub fn states(&self) -> &[StateVariable] {
        &self.states
    }

    /// Returns the reference identifier for `selector`, creating it on first use.
    pub fn ensure_reference(&mut self, selector: &str) -> String {
        self.ensure_reference_named(selector, naming::reference_name(selector))
    }

    /// Like [`ensure_reference`](Self::ensure_reference) with a preferred
    /// identifier. Selectors deriving the same identifier share one reference;
    /// a name already held by a state, function or handler gets a suffix.
    pub fn ensure_reference_named(&mut self, selector: &str, identifier: String) -> String {
        if let Some(existing) = self.reference_for(selector) {
            return existing.identifier.clone();
        }
        let identifier = self.unique_identifier(&identifier);
        self.references.push(StableReference {
            identifier: identifier.clone(),
            selector: selector.to_string(),
        });
        identifier
    }

    fn reference_for(&self, selector: &str) -> Option<&StableReference> {
        let key = naming::selector_to_identifier(selector);
        self.references
            .iter()
            .find(|r| naming::selector_to_identifier(&r.selector) == key)
    }

    pub fn has_reference(&self, selector: &str) -> bool {
        self.reference_for(selector).is_some()
    }

    pub fn references(&self) -> &[StableReference] {
        &self.references
    }

    /// Registers a handler together with the effect that attaches it.
    ///
    /// Repeated bindings for the same selector and event get a numeric
    /// suffix (`handleSaveClick2`) so handler names stay unique.
    pub fn add_handler(&mut self, mut binding: EventHandlerBinding, effect_code: String) {
        let name = self.unique_identifier(&binding.handler_name);
        let effect_code = if name != binding.handler_name {
            effect_code.replace(&binding.handler_name, &name)
        } else {
            effect_code
        };
        binding.handler_name = name;

        let description = match &binding.delegation_parent {
            Some(parent) => format!(
                "Delegate {} events from {} to {}",
                binding.event_name, parent, binding.selector
            ),
            None => format!(
                "Attach {} listener to {}",
                binding.event_name, binding.selector
            ),
        };
        let listener_owner = match binding.target {
            ListenerTarget::Reference(_) => Some(
                binding
                    .delegation_parent
                    .clone()
                    .unwrap_or_else(|| binding.selector.clone()),
            ),
            ListenerTarget::Global(_) => None,
        };
        self.effects.push(PendingEffect {
            trigger: EffectTrigger::Event(binding.event_name.clone()),
            code: effect_code,
            description,
            dependency_source: Some(binding.translated_body.clone()),
            listener_owner,
        });
        self.handlers.push(binding);
    }

    pub fn handlers(&self) -> &[EventHandlerBinding] {
        &self.handlers
    }

    /// Mount effects run once, so their dependency list is always empty.
    pub fn add_mount_effect(&mut self, code: String, description: impl Into<String>) {
        self.effects.push(PendingEffect {
            trigger: EffectTrigger::Mount,
            code,
            description: description.into(),
            dependency_source: None,
            listener_owner: None,
        });
    }

    pub fn add_data_fetch_effect(&mut self, code: String, description: impl Into<String>) {
        self.effects.push(PendingEffect {
            trigger: EffectTrigger::DataFetch,
            dependency_source: Some(code.clone()),
            code,
            description: description.into(),
            listener_owner: None,
        });
    }

    pub fn add_function(&mut self, function: FunctionDefinition) -> bool {
        if !self.identifiers.insert(function.name.clone()) {
            return false;
        }
        self.functions.push(function);
        true
    }

    pub fn functions(&self) -> &[FunctionDefinition] {
        &self.functions
    }

    /// Marks a named function as consumed by an event handler.
    pub fn claim_function(&mut self, name: &str) {
        self.claimed_functions.insert(name.to_string());
    }

    pub fn is_function_claimed(&self, name: &str) -> bool {
        self.claimed_functions.contains(name)
    }

    pub fn add_remote_call(&mut self, call: RemoteCall) {
        self.remote_calls.push(call);
    }

    pub fn remote_calls(&self) -> &[RemoteCall] {
        &self.remote_calls
    }

    pub fn add_animation(&mut self, animation: AnimationUsage) {
        self.animations.push(animation);
    }

    pub fn animations(&self) -> &[AnimationUsage] {
        &self.animations
    }

    pub fn record_mutation(&mut self, site: MutationSite) {
        self.mutations.push(site);
    }

    pub fn mutations(&self) -> &[MutationSite] {
        &self.mutations
    }

    pub fn record_selector(&mut self, selector: &str) {
        if !self.selectors.iter().any(|s| s == selector) {
            self.selectors.push(selector.to_string());
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn set_resources(&mut self, resources: Vec<ExternalResource>) {
        self.resources = resources;
    }

    pub fn set_embedded_styles(&mut self, styles: Option<String>) {
        self.embedded_styles = styles.filter(|css| !css.trim().is_empty());
    }

    fn unique_identifier(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2;
        while self.identifiers.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        self.identifiers.insert(candidate.clone());
        candidate
    }

    /// Resolve dependency lists and capabilities and hand out the snapshot.
    pub fn finish(self) -> ComponentDescriptor {
        let reactive: Vec<&str> = self
            .states
            .iter()
            .filter(|state| state.is_reactive())
            .map(|state| state.identifier.as_str())
            .collect();

        let states = &self.states;
        let effects: Vec<Effect> = self
            .effects
            .into_iter()
            .map(|pending| {
                let mut dependencies = pending
                    .dependency_source
                    .as_deref()
                    .map(|source| infer_dependencies(source, reactive.iter().copied()))
                    .unwrap_or_default();
                // A conditionally rendered element gets a new node each time it
                // shows, so the listener must be attached again.
                if let Some(visible) = pending
                    .listener_owner
                    .as_deref()
                    .and_then(|owner| visibility_state(states, owner))
                {
                    if !dependencies.iter().any(|dep| dep == visible) {
                        dependencies.push(visible.to_string());
                    }
                }
                Effect {
                    dependencies,
                    trigger: pending.trigger,
                    code: pending.code,
                    description: pending.description,
                }
            })
            .collect();

        let mut capabilities = Vec::new();
        if !reactive.is_empty() {
            capabilities.push(Capability::StatefulValue);
        }
        if !effects.is_empty() {
            capabilities.push(Capability::SideEffect);
        }
        if !self.references.is_empty() {
            capabilities.push(Capability::StableReference);
        }

        ComponentDescriptor {
            component_name: self.component_name,
            source_name: self.source_name,
            capabilities,
            states: self.states,
            references: self.references,
            handlers: self.handlers,
            effects,
            functions: self.functions,
            remote_calls: self.remote_calls,
            animations: self.animations,
            mutations: self.mutations,
            selectors: self.selectors,
            warnings: self.warnings,
            resources: self.resources,
            embedded_styles: self.embedded_styles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(selector: &str, event: &str, body: &str) -> EventHandlerBinding {
        EventHandlerBinding {
            selector: selector.to_string(),
            event_name: event.to_string(),
            handler_name: naming::handler_name(selector, None, event),
            parameters: "event".to_string(),
            translated_body: body.to_string(),
            delegation_parent: None,
            target: ListenerTarget::Reference(naming::reference_name(selector)),
            once: false,
        }
    }

    #[test]
    fn states_are_deduplicated_by_identifier() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        assert!(builder.add_state(StateVariable::reactive("counter", "0")));
        assert!(!builder.add_state(StateVariable::reactive("counter", "5")));
        let descriptor = builder.finish();
        assert_eq!(descriptor.states.len(), 1);
        assert_eq!(descriptor.states[0].initial_value, "0");
    }

    #[test]
    fn references_are_stable_per_selector() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        let first = builder.ensure_reference("#box");
        let second = builder.ensure_reference("#box");
        builder.ensure_reference(".box");
        assert_eq!(first, "boxRef");
        assert_eq!(first, second);
        assert_eq!(builder.references().len(), 1);
    }

    #[test]
    fn references_never_take_an_identifier_in_use() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.add_function(FunctionDefinition {
            name: "boxRef".to_string(),
            parameters: String::new(),
            body: String::new(),
            is_async: false,
        });
        assert_eq!(builder.ensure_reference("#box"), "boxRef2");
        assert_eq!(builder.ensure_reference("#box"), "boxRef2");
        assert!(builder.has_reference(".box"));
        let descriptor = builder.finish();
        assert_eq!(descriptor.references.len(), 1);
        assert_eq!(descriptor.references[0].identifier, "boxRef2");
    }

    #[test]
    fn duplicate_handlers_get_suffixes() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.add_handler(binding("#save", "click", "a();"), "x(handleSaveClick);".into());
        builder.add_handler(binding("#save", "click", "b();"), "x(handleSaveClick);".into());
        let descriptor = builder.finish();
        let names: Vec<_> = descriptor.handlers.iter().map(|h| h.handler_name.as_str()).collect();
        assert_eq!(names, vec!["handleSaveClick", "handleSaveClick2"]);
        assert_eq!(descriptor.effects[1].code, "x(handleSaveClick2);");
    }

    #[test]
    fn dependencies_resolve_against_final_reactive_set() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.add_state(StateVariable::constant("API_URL", "'/api'"));
        builder.add_handler(
            binding("#inc", "click", "setCounter((counter) => counter + 1); log(API_URL, statusText);"),
            String::new(),
        );
        builder.add_state(StateVariable::reactive("counter", "0"));
        builder.add_state(
            StateVariable::reactive("statusText", "''").with_purpose("#status", MutationKind::Text),
        );
        let descriptor = builder.finish();
        assert_eq!(descriptor.effects[0].dependencies, vec!["counter", "statusText"]);
    }

    #[test]
    fn listeners_on_toggled_elements_reattach_when_shown() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.ensure_reference("#panel");
        builder.add_handler(binding("#panel", "click", "log();"), String::new());
        builder.add_handler(binding("#other", "click", "log();"), String::new());
        builder.add_state(
            StateVariable::reactive("panelVisible", "false")
                .with_purpose("#panel", MutationKind::Visibility),
        );
        let descriptor = builder.finish();
        assert_eq!(descriptor.effects[0].dependencies, vec!["panelVisible"]);
        assert!(descriptor.effects[1].dependencies.is_empty());
    }

    #[test]
    fn mount_effects_have_no_dependencies() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.add_state(StateVariable::reactive("counter", "0"));
        builder.add_mount_effect("console.log(counter);".into(), "Run on mount");
        let descriptor = builder.finish();
        assert!(descriptor.effects[0].dependencies.is_empty());
        assert_eq!(descriptor.effects[0].trigger, EffectTrigger::Mount);
    }

    #[test]
    fn capabilities_follow_content() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.ensure_reference("#box");
        let descriptor = builder.finish();
        assert_eq!(descriptor.capabilities, vec![Capability::StableReference]);
    }

    #[test]
    fn warnings_are_deduplicated() {
        let mut builder = ComponentBuilder::new("Widget", "widget.js");
        builder.add_warning("plugin");
        builder.add_warning("plugin");
        assert_eq!(builder.warnings().len(), 1);
    }
}
