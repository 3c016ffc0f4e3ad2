//! End-to-end conversions of small scripts through the pure pipeline.

use indoc::indoc;
use jq2react::{convert_document, Conversion, Jq2ReactConfig, SourceDocument};
use std::path::Path;

fn convert(name: &str, script: &str) -> Conversion {
    let document = SourceDocument::new(script, Path::new(name));
    convert_document(&document, &Jq2ReactConfig::default()).expect("conversion succeeds")
}

#[test]
fn reassigned_variables_become_state() {
    let conversion = convert(
        "counter.js",
        indoc! {r#"
            let counter = 0;
            function increment() {
              counter = counter + 1;
            }
        "#},
    );
    let code = &conversion.generated.code;
    assert!(code.contains("import React, { useState } from 'react';"));
    assert!(code.contains("  const [counter, setCounter] = useState(0);\n"));
    assert!(code.contains("  function increment() {\n    setCounter(counter + 1);\n  }\n"));
}

#[test]
fn click_bindings_get_a_ref_a_handler_and_a_listener_effect() {
    let conversion = convert(
        "form.js",
        indoc! {r#"
            $('#submitBtn').on('click', function(e) {
              e.preventDefault();
              console.log('sent');
            });
        "#},
    );
    let code = &conversion.generated.code;
    assert!(code.contains("  const submitBtnRef = useRef(null);\n"));
    assert!(code.contains(
        "  const handleSubmitBtnClick = (e) => {\n    e.preventDefault();\n    console.log('sent');\n  };\n"
    ));
    assert!(code.contains("  // Attach click listener to #submitBtn\n  useEffect(() => {\n"));
    assert!(code.contains("    const element = submitBtnRef.current;\n"));
    assert!(code.contains("    element.addEventListener('click', handleSubmitBtnClick);\n"));
    assert!(code.contains("      element.removeEventListener('click', handleSubmitBtnClick);\n"));
    assert!(code.contains("<div ref={submitBtnRef} />"));
}

#[test]
fn shorthand_requests_become_fetch_chains() {
    let conversion = convert(
        "users.js",
        "$.get('/api/users', function(data) { console.log(data); });",
    );
    let descriptor = &conversion.descriptor;
    assert_eq!(descriptor.remote_calls.len(), 1);
    assert_eq!(descriptor.remote_calls[0].url, "/api/users");

    let code = &conversion.generated.code;
    assert!(code.contains("  // Load data from /api/users on mount\n"));
    assert!(code.contains("    fetch('/api/users')\n"));
    assert!(code.contains("      .then((data) => {\n        console.log(data);\n      })\n"));
    assert!(code.contains("      .catch((error) => {\n        console.error(error);\n      });\n"));
}

#[test]
fn animations_are_reported_not_translated() {
    let conversion = convert("box.js", "$('#box').fadeIn();");
    let report = &conversion.generated.report;
    assert_eq!(report.animations.len(), 1);
    assert_eq!(report.animations[0].usage, "#box.fadeIn()");
    assert!(report.animations[0].suggestion.contains("CSS"));

    let code = &conversion.generated.code;
    assert!(code.contains("/* #box.fadeIn(): animation not translated, see conversion report */"));
    assert!(code.contains(" *   - #box.fadeIn(): "));
    assert!(!code.contains("$('#box')"));
}

#[test]
fn ready_handlers_with_delegation_and_mutations() {
    let conversion = convert(
        "todo-list.js",
        indoc! {r#"
            $(document).ready(function () {
              $('#list').on('click', '.item', function () {
                $(this).toggleClass('done');
                $('#status').text('Toggled');
              });
              $('#panel').show();
            });
        "#},
    );
    let descriptor = &conversion.descriptor;
    assert_eq!(descriptor.component_name, "TodoList");
    assert_eq!(descriptor.handlers.len(), 1);
    let handler = &descriptor.handlers[0];
    assert_eq!(handler.handler_name, "handleListItemClick");
    assert_eq!(handler.delegation_parent.as_deref(), Some("#list"));
    assert!(handler
        .translated_body
        .contains("event.target.closest('.item').classList.toggle('done');"));
    assert!(handler.translated_body.contains("setStatusText('Toggled');"));

    let code = &conversion.generated.code;
    assert!(code.contains("  const [statusText, setStatusText] = useState(''); // text of #status\n"));
    assert!(code.contains("  const [panelVisible, setPanelVisible] = useState(false); // visibility of #panel\n"));
    assert!(code.contains("    if (event.target.closest('.item')) {\n"));
    assert!(code.contains("    setPanelVisible(true);\n"));
    assert!(code.contains("{panelVisible && ("));
}

#[test]
fn html_pages_convert_their_inline_scripts() {
    let page = indoc! {r#"
        <html>
          <head><style>#out { color: green; }</style></head>
          <body>
            <input id="name">
            <script>
              $('#name').on('input', function () {
                $('#out').text($(this).val());
              });
            </script>
          </body>
        </html>
    "#};
    let conversion = convert("greeting.html", page);
    let generated = &conversion.generated;
    assert_eq!(generated.component_name, "Greeting");
    assert!(generated.code.contains("import './greeting.styles.css';"));
    assert!(generated.code.contains("setOutText(event.currentTarget.value);"));
    let sheet = generated.stylesheet.as_ref().expect("stylesheet");
    assert_eq!(sheet.contents, "#out { color: green; }\n");
}

#[test]
fn empty_input_still_produces_a_component() {
    let conversion = convert("empty.js", "");
    let code = &conversion.generated.code;
    assert!(code.starts_with("import React from 'react';\n"));
    assert!(code.contains("export default function Empty() {\n  return (\n"));
    assert!(code.contains("{/* Move the page markup here */}"));
}

#[test]
fn hyphenated_selectors_follow_the_naming_rule() {
    let conversion = convert(
        "save.js",
        "$('#save-btn').on('click', function () { $('#status-msg').text('Saved'); });",
    );
    let code = &conversion.generated.code;
    assert!(code.contains("  const [status_msgText, setStatus_msgText] = useState(''); // text of #status-msg\n"));
    assert!(code.contains("  const save_btnRef = useRef(null);\n"));
    assert!(code.contains("  const handleSaveBtnClick = (event) => {\n    setStatus_msgText('Saved');\n  };\n"));
    assert!(code.contains("    const element = save_btnRef.current;\n"));
}

#[test]
fn named_handlers_called_elsewhere_remain_defined() {
    let conversion = convert(
        "form.js",
        indoc! {r#"
            function save() {
              console.log('saving');
            }
            $('#save').click(save);
            $('#form').on('submit', function (e) {
              e.preventDefault();
              save();
            });
        "#},
    );
    let code = &conversion.generated.code;
    assert!(code.contains("  function save() {\n    console.log('saving');\n  }\n"));
    assert!(code.contains("  const handleSaveClick = (event) => {\n    save(event);\n  };\n"));
    assert!(code.contains("    e.preventDefault();\n    save();\n"));
}

#[test]
fn listeners_on_toggled_elements_rerun_with_visibility() {
    let conversion = convert(
        "panel.js",
        indoc! {r#"
            $('#panel').show();
            $('#panel').on('click', function () {
              console.log('clicked');
            });
        "#},
    );
    let descriptor = &conversion.descriptor;
    let listener = descriptor
        .effects
        .iter()
        .find(|effect| effect.code.contains("handlePanelClick"))
        .expect("listener effect");
    assert_eq!(listener.dependencies, vec!["panelVisible"]);
    assert!(conversion.generated.code.contains("  }, [panelVisible]);\n"));
}

#[test]
fn refs_do_not_shadow_script_identifiers() {
    let conversion = convert(
        "picker.js",
        indoc! {r#"
            var dateRef = 'today';
            $('#date').datepicker();
        "#},
    );
    let code = &conversion.generated.code;
    assert!(code.contains("  const dateRef2 = useRef(null);\n"));
    assert!(code.contains("dateRef2.current"));
    assert!(code.contains("ref={dateRef2}"));
    assert_eq!(conversion.descriptor.references[0].identifier, "dateRef2");
}
