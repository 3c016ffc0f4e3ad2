//! Placeholder JSX: one annotated element per stable reference.
//!
//! The page structure is unknown, so each element only shows how the
//! synthesized state plugs in: text and content as children, values as
//! controlled inputs, class names and styles as props, visibility as
//! conditional rendering.

use super::tree::Node;
use crate::descriptor::{ComponentDescriptor, MutationKind, StableReference, StateVariable};

fn element(reference: &StableReference, states: &[&StateVariable]) -> Vec<Node> {
    let find = |kind: MutationKind| {
        states
            .iter()
            .find(|state| state.purpose.as_ref().is_some_and(|p| p.mutation == kind))
    };

    let mut props = vec![format!("ref={{{}}}", reference.identifier)];
    if let Some(state) = find(MutationKind::ClassName) {
        props.push(format!("className={{{}}}", state.identifier));
    }
    if let Some(state) = find(MutationKind::Style) {
        props.push(format!("style={{{}}}", state.identifier));
    }

    let tag = if let Some(state) = find(MutationKind::Value) {
        props.push(format!("value={{{}}}", state.identifier));
        props.push(format!(
            "onChange={{(event) => {}(event.target.value)}}",
            state.setter_name()
        ));
        "input"
    } else {
        "div"
    };
    if let Some(state) = find(MutationKind::Content) {
        props.push(format!("dangerouslySetInnerHTML={{{{ __html: {} }}}}", state.identifier));
    }

    let open = format!("<{tag} {}", props.join(" "));
    let rendered = match find(MutationKind::Text) {
        Some(state) if tag != "input" && find(MutationKind::Content).is_none() => {
            format!("{open}>{{{}}}</{tag}>", state.identifier)
        }
        _ => format!("{open} />"),
    };

    let comment = Node::line(format!("{{/* {} */}}", reference.selector.replace("*/", "* /")));
    match find(MutationKind::Visibility) {
        Some(state) => vec![
            comment,
            Node::block(format!("{{{} && (", state.identifier), vec![Node::Line(rendered)], ")}"),
        ],
        None => vec![comment, Node::Line(rendered)],
    }
}

/// The `return (...)` statement closing the component body.
pub fn placeholder(descriptor: &ComponentDescriptor) -> Node {
    let mut children = Vec::new();
    if descriptor.references.is_empty() {
        children.push(Node::line("{/* Move the page markup here */}"));
    }
    for reference in &descriptor.references {
        let states: Vec<_> = descriptor.states_for_reference(reference).collect();
        children.extend(element(reference, &states));
    }
    Node::block(
        "return (",
        vec![Node::block("<div>", children, "</div>")],
        ");",
    )
}
