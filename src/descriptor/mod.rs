//! Component descriptor: the intermediate representation between extraction
//! and code generation.
//!
//! A fresh [`ComponentBuilder`] is created per conversion, filled by the
//! extraction passes in order, and turned into an immutable
//! [`ComponentDescriptor`] that the generator consumes exactly once.

pub mod builder;
pub mod dependencies;
pub mod types;

pub use builder::ComponentBuilder;
pub use dependencies::{infer_dependencies, referenced_identifiers};
pub use types::{
    AnimationUsage, Capability, ComponentDescriptor, ConversionStats, Effect, EffectTrigger,
    EventHandlerBinding, ExternalResource, FunctionDefinition, GlobalTarget, ListenerTarget,
    MutationKind, MutationSite, RemoteCall, RemoteCallKind, ResourceKind, StableReference,
    StateKind, StatePurpose, StateVariable,
};
