//! Pattern Extractor.
//!
//! The script is parsed once with tree-sitter, whole-file facts are gathered
//! into a [`ScriptContext`], and then a fixed sequence of passes writes into
//! the [`ComponentBuilder`]. Later passes read what earlier ones recorded
//! (claimed functions, existing states, references), so the order matters.
//!
//! Nothing a pass fails to recognize is an error: unknown shapes are simply
//! left out, or kept as plain code inside an effect.

mod animations;
mod bare_selectors;
pub mod context;
mod events;
mod functions;
mod init_blocks;
mod mutations;
pub mod remote;
pub mod selectors;
pub mod translate;
mod variables;

pub use context::{parse_script, ScriptContext};
pub use translate::Translator;

use crate::descriptor::ComponentBuilder;
use crate::errors::Result;
use tracing::debug_span;

type Pass = fn(&ScriptContext<'_>, &mut ComponentBuilder);

/// The passes in the order they must run.
pub const PASSES: [(&str, Pass); 8] = [
    ("variables", variables::extract),
    ("init_blocks", init_blocks::extract),
    ("events", events::extract),
    ("remote_calls", remote::extract),
    ("animations", animations::extract),
    ("functions", functions::extract),
    ("mutations", mutations::extract),
    ("bare_selectors", bare_selectors::extract),
];

/// Run every pass over `script`, accumulating into `builder`.
pub fn extract(script: &str, builder: &mut ComponentBuilder) -> Result<()> {
    if script.trim().is_empty() {
        return Ok(());
    }
    let tree = parse_script(script)?;
    let ctx = ScriptContext::new(script, tree.root_node());
    for (name, pass) in PASSES {
        let _span = debug_span!("pass", name).entered();
        pass(&ctx, builder);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Capability, EffectTrigger, StateKind};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const TODO_APP: &str = indoc! {r#"
        var API_URL = '/api/todos';
        var count = 0;

        function renderCount() {
          $('#count').text(count);
        }

        $(document).ready(function () {
          var $input = $('#new-todo');

          $('#add').on('click', function (e) {
            e.preventDefault();
            count++;
            renderCount();
            $input.val('');
          });

          $('#list').on('click', '.remove', function () {
            $(this).closest('li').remove();
            count = count - 1;
          });

          $.getJSON(API_URL, function (todos) {
            count = todos.length;
            renderCount();
          });

          $('#banner').fadeOut(400);
        });
    "#};

    #[test]
    fn full_extraction_of_a_small_app() {
        let mut builder = ComponentBuilder::new("TodoApp", "todo-app.js");
        extract(TODO_APP, &mut builder).unwrap();
        let descriptor = builder.finish();

        let states: Vec<_> = descriptor
            .states
            .iter()
            .map(|s| (s.identifier.as_str(), s.kind))
            .collect();
        assert_eq!(
            states,
            vec![
                ("API_URL", StateKind::Constant),
                ("count", StateKind::Reactive),
                ("countText", StateKind::Reactive),
                ("new_todoValue", StateKind::Reactive),
            ]
        );

        let handlers: Vec<_> = descriptor.handlers.iter().map(|h| h.handler_name.as_str()).collect();
        assert_eq!(handlers, vec!["handleAddClick", "handleListRemoveClick"]);
        assert!(descriptor.handlers[0].translated_body.contains("setCount((count) => count + 1);"));
        assert!(descriptor.handlers[0].translated_body.contains("setNew_todoValue('');"));

        let triggers: Vec<_> = descriptor.effects.iter().map(|e| e.trigger.clone()).collect();
        assert_eq!(
            triggers,
            vec![
                EffectTrigger::Mount,
                EffectTrigger::DataFetch,
                EffectTrigger::Event("click".into()),
                EffectTrigger::Event("click".into()),
            ]
        );
        assert_eq!(
            descriptor.effects[0].code,
            "/* #banner.fadeOut(400): animation not translated, see conversion report */;"
        );
        assert!(descriptor.effects[1].dependencies.is_empty());

        assert_eq!(descriptor.remote_calls.len(), 1);
        assert_eq!(descriptor.animations.len(), 1);
        assert_eq!(descriptor.functions.len(), 1);
        assert_eq!(descriptor.functions[0].name, "renderCount");
        assert_eq!(descriptor.functions[0].body, "setCountText(count);");

        let refs: Vec<_> = descriptor.references.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(refs, vec!["addRef", "listRef", "countRef", "new_todoRef", "bannerRef"]);
        assert_eq!(
            descriptor.capabilities,
            vec![Capability::StatefulValue, Capability::SideEffect, Capability::StableReference]
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let run = || {
            let mut builder = ComponentBuilder::new("TodoApp", "todo-app.js");
            extract(TODO_APP, &mut builder).unwrap();
            format!("{:?}", builder.finish())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn broken_scripts_degrade_without_error() {
        let mut builder = ComponentBuilder::new("Broken", "broken.js");
        extract("$('#a').on('click', function () { if ( });\n$('#b').hide();", &mut builder).unwrap();
        let descriptor = builder.finish();
        assert!(descriptor.references.iter().any(|r| r.identifier == "bRef"));
    }

    #[test]
    fn blank_scripts_produce_empty_descriptors() {
        let mut builder = ComponentBuilder::new("Empty", "empty.js");
        extract("  \n", &mut builder).unwrap();
        let descriptor = builder.finish();
        assert!(descriptor.capabilities.is_empty());
    }
}
