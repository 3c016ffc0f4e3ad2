//! Assembles the component from a finished descriptor.

use super::markup;
use super::report::ConversionReport;
use super::tree::{separated, Node};
use crate::descriptor::{
    Capability, ComponentDescriptor, Effect, EventHandlerBinding, FunctionDefinition,
};
use std::path::Path;

fn imports(descriptor: &ComponentDescriptor, stylesheet: Option<&str>) -> Vec<Node> {
    let hooks: Vec<&str> = [
        Capability::StatefulValue,
        Capability::SideEffect,
        Capability::StableReference,
    ]
    .into_iter()
    .filter(|capability| descriptor.has_capability(*capability))
    .map(Capability::hook_name)
    .collect();

    let mut nodes = vec![if hooks.is_empty() {
        Node::line("import React from 'react';")
    } else {
        Node::line(format!("import React, {{ {} }} from 'react';", hooks.join(", ")))
    }];
    if let Some(stylesheet) = stylesheet {
        nodes.push(Node::line(format!("import './{stylesheet}';")));
    }
    nodes
}

fn header(descriptor: &ComponentDescriptor) -> Node {
    Node::DocComment(vec![
        descriptor.component_name.clone(),
        String::new(),
        format!("Converted from {} by jq2react.", descriptor.source_name),
        "See the conversion report at the end of this file.".to_string(),
    ])
}

fn constants(descriptor: &ComponentDescriptor) -> Vec<Node> {
    descriptor
        .constant_states()
        .map(|state| Node::code(format!("const {} = {};", state.identifier, state.initial_value)))
        .collect()
}

fn states(descriptor: &ComponentDescriptor) -> Vec<Node> {
    descriptor
        .reactive_states()
        .map(|state| {
            let declaration = format!(
                "const [{}, {}] = useState({});",
                state.identifier,
                state.setter_name(),
                state.initial_value
            );
            match &state.purpose {
                Some(purpose) => Node::code(format!(
                    "{declaration} // {} of {}",
                    purpose.mutation, purpose.selector
                )),
                None => Node::code(declaration),
            }
        })
        .collect()
}

fn references(descriptor: &ComponentDescriptor) -> Vec<Node> {
    descriptor
        .references
        .iter()
        .map(|reference| Node::line(format!("const {} = useRef(null);", reference.identifier)))
        .collect()
}

fn handler(binding: &EventHandlerBinding) -> Node {
    let open = format!(
        "const {} = ({}) => {{",
        binding.handler_name, binding.parameters
    );
    if binding.translated_body.trim().is_empty() {
        return Node::line(format!("{open}}};"));
    }
    Node::block(open, vec![Node::code(binding.translated_body.clone())], "};")
}

fn function(definition: &FunctionDefinition) -> Node {
    let keyword = if definition.is_async {
        "async function"
    } else {
        "function"
    };
    let open = format!("{keyword} {}({}) {{", definition.name, definition.parameters);
    if definition.body.trim().is_empty() {
        return Node::line(format!("{open}}}"));
    }
    Node::block(open, vec![Node::code(definition.body.clone())], "}")
}

fn effect(effect: &Effect) -> Vec<Node> {
    vec![
        Node::comment(effect.description.clone()),
        Node::block(
            "useEffect(() => {",
            vec![Node::code(effect.code.clone())],
            format!("}}, [{}]);", effect.dependencies.join(", ")),
        ),
    ]
}

/// Name of the stylesheet holding a page's embedded `<style>` rules.
pub fn stylesheet_name(source_name: &str, extension: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component".to_string());
    format!("{stem}.styles.{extension}")
}

/// The complete output tree: imports, component function and report.
pub fn component_tree(
    descriptor: &ComponentDescriptor,
    stylesheet: Option<&str>,
    report: &ConversionReport,
) -> Vec<Node> {
    let body = separated(vec![
        constants(descriptor),
        states(descriptor),
        references(descriptor),
        separated(descriptor.handlers.iter().map(|h| vec![handler(h)]).collect::<Vec<_>>()),
        separated(descriptor.functions.iter().map(|f| vec![function(f)]).collect::<Vec<_>>()),
        separated(descriptor.effects.iter().map(effect).collect::<Vec<_>>()),
        vec![markup::placeholder(descriptor)],
    ]);

    separated(vec![
        imports(descriptor, stylesheet),
        vec![
            header(descriptor),
            Node::block(
                format!("export default function {}() {{", descriptor.component_name),
                body,
                "}",
            ),
        ],
        vec![report.to_node()],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::Printer;
    use crate::descriptor::{ComponentBuilder, GlobalTarget, ListenerTarget, StateVariable};
    use pretty_assertions::assert_eq;

    fn print(descriptor: &ComponentDescriptor) -> String {
        let report = ConversionReport::new(descriptor, None);
        Printer::print(&component_tree(descriptor, None, &report))
    }

    #[test]
    fn imports_follow_capabilities() {
        let descriptor = ComponentBuilder::new("Plain", "plain.js").finish();
        let out = print(&descriptor);
        assert!(out.starts_with("import React from 'react';\n\n/**\n * Plain\n"));

        let mut builder = ComponentBuilder::new("Counter", "counter.js");
        builder.add_state(StateVariable::reactive("count", "0"));
        builder.ensure_reference("#out");
        let out = print(&builder.finish());
        assert!(out.starts_with("import React, { useState, useRef } from 'react';\n"));
    }

    #[test]
    fn blocks_come_in_fixed_order() {
        let mut builder = ComponentBuilder::new("Counter", "counter.js");
        builder.add_state(StateVariable::constant("LIMIT", "10"));
        builder.add_state(StateVariable::reactive("count", "0"));
        let reference = builder.ensure_reference("#inc");
        builder.add_handler(
            EventHandlerBinding {
                selector: "#inc".into(),
                event_name: "click".into(),
                handler_name: "handleIncClick".into(),
                parameters: "event".into(),
                translated_body: "setCount((count) => count + 1);".into(),
                delegation_parent: None,
                target: ListenerTarget::Reference(reference),
                once: false,
            },
            "const element = incRef.current;\nif (!element) return undefined;\nelement.addEventListener('click', handleIncClick);\nreturn () => {\n  element.removeEventListener('click', handleIncClick);\n};".into(),
        );
        builder.add_function(FunctionDefinition {
            name: "reset".into(),
            parameters: String::new(),
            body: "setCount(0);".into(),
            is_async: false,
        });
        builder.add_mount_effect("console.log('ready');".into(), "Run once on mount");

        let out = print(&builder.finish());
        let body: String = out
            .split("export default function Counter() {\n")
            .nth(1)
            .and_then(|rest| rest.split("\n  return (").next())
            .unwrap_or_default()
            .to_string();
        assert_eq!(
            body,
            "  const LIMIT = 10;\n\
             \n  const [count, setCount] = useState(0);\n\
             \n  const incRef = useRef(null);\n\
             \n  const handleIncClick = (event) => {\n    setCount((count) => count + 1);\n  };\n\
             \n  function reset() {\n    setCount(0);\n  }\n\
             \n  // Attach click listener to #inc\n  useEffect(() => {\n    const element = incRef.current;\n    if (!element) return undefined;\n    element.addEventListener('click', handleIncClick);\n    return () => {\n      element.removeEventListener('click', handleIncClick);\n    };\n  }, [count]);\n\
             \n  // Run once on mount\n  useEffect(() => {\n    console.log('ready');\n  }, []);\n"
        );
    }

    #[test]
    fn global_listeners_and_async_functions() {
        let mut builder = ComponentBuilder::new("Page", "page.js");
        builder.add_handler(
            EventHandlerBinding {
                selector: "window".into(),
                event_name: "resize".into(),
                handler_name: "handleWindowResize".into(),
                parameters: "event".into(),
                translated_body: String::new(),
                delegation_parent: None,
                target: ListenerTarget::Global(GlobalTarget::Window),
                once: false,
            },
            "window.addEventListener('resize', handleWindowResize);\nreturn () => {\n  window.removeEventListener('resize', handleWindowResize);\n};".into(),
        );
        builder.add_function(FunctionDefinition {
            name: "load".into(),
            parameters: "id".into(),
            body: "fetch('/api/' + id);".into(),
            is_async: true,
        });
        let out = print(&builder.finish());
        assert!(out.contains("  const handleWindowResize = (event) => {};\n"));
        assert!(out.contains("  async function load(id) {\n    fetch('/api/' + id);\n  }\n"));
    }

    #[test]
    fn state_comments_name_their_element() {
        let mut builder = ComponentBuilder::new("Status", "status.js");
        builder.add_state(
            StateVariable::reactive("statusText", "''")
                .with_purpose("#status", crate::descriptor::MutationKind::Text),
        );
        let out = print(&builder.finish());
        assert!(out.contains("  const [statusText, setStatusText] = useState(''); // text of #status\n"));
    }

    #[test]
    fn stylesheet_names() {
        assert_eq!(stylesheet_name("index.html", "css"), "index.styles.css");
        assert_eq!(stylesheet_name("page", "scss"), "page.styles.scss");
    }
}
