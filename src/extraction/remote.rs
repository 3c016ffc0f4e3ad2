//! Remote-call recognition (`$.ajax`, `$.get`, `$.getJSON`, `$.post`) and
//! the fetch chains they are rewritten into.

use super::context::ScriptContext;
use super::selectors::{call_arguments, is_function_like, is_jquery_name};
use super::translate::{first_parameter, parameters_of, Translator};
use crate::descriptor::{ComponentBuilder, RemoteCall, RemoteCallKind};
use crate::text::{indent, unquote};
use tracing::debug;
use tree_sitter::Node;

/// Promise-style methods chained onto a request and folded into it.
const CONTINUATIONS: &[&str] = &["done", "then", "fail", "catch", "always", "finally"];

/// The parts of one request, still as syntax nodes.
#[derive(Debug, Clone)]
pub struct RemoteRequest<'a> {
    pub kind: RemoteCallKind,
    pub node: Node<'a>,
    pub url: Option<Node<'a>>,
    pub method: Option<Node<'a>>,
    pub data: Option<Node<'a>>,
    pub success: Option<Node<'a>>,
    pub error: Option<Node<'a>>,
    pub complete: Option<Node<'a>>,
    pub data_type: Option<String>,
}

impl<'a> RemoteRequest<'a> {
    fn new(kind: RemoteCallKind, node: Node<'a>) -> Self {
        Self {
            kind,
            node,
            url: None,
            method: None,
            data: None,
            success: None,
            error: None,
            complete: None,
            data_type: None,
        }
    }

    /// Upper-cased HTTP method, or the method expression when it is not a literal.
    pub fn http_method(&self, ctx: &ScriptContext) -> String {
        match self.method {
            Some(node) if node.kind() == "string" => unquote(ctx.text(node)).to_ascii_uppercase(),
            Some(node) => ctx.text(node).to_string(),
            None if self.kind == RemoteCallKind::Post => "POST".to_string(),
            None => "GET".to_string(),
        }
    }

    pub fn url_text(&self, ctx: &ScriptContext) -> String {
        match self.url {
            Some(node) if node.kind() == "string" => unquote(ctx.text(node)).to_string(),
            Some(node) => ctx.text(node).to_string(),
            None => String::new(),
        }
    }

    fn expects_text(&self) -> bool {
        self.data_type
            .as_deref()
            .is_some_and(|kind| matches!(kind, "html" | "text" | "script" | "xml"))
    }
}

/// `$.ajax(...)` and the shorthand forms, without any continuation.
pub fn remote_root<'a>(node: Node<'a>, ctx: &ScriptContext<'a>) -> Option<RemoteRequest<'a>> {
    if node.kind() != "call_expression" {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    if function.kind() != "member_expression" {
        return None;
    }
    let object = function.child_by_field_name("object")?;
    if object.kind() != "identifier" || !is_jquery_name(ctx.text(object)) {
        return None;
    }
    let method = ctx.text(function.child_by_field_name("property")?);
    let arguments = call_arguments(node);

    match method {
        "ajax" => Some(configurable_request(node, &arguments, ctx)),
        "get" | "getJSON" | "post" => {
            let kind = if method == "post" {
                RemoteCallKind::Post
            } else {
                RemoteCallKind::Get
            };
            let mut request = shorthand_request(kind, node, &arguments, ctx);
            if method == "getJSON" {
                request.data_type = Some("json".to_string());
            }
            Some(request)
        }
        _ => None,
    }
}

/// A request together with any `.done/.fail/.always` continuations that
/// `node` heads.
pub fn remote_chain<'a>(node: Node<'a>, ctx: &ScriptContext<'a>) -> Option<RemoteRequest<'a>> {
    let mut continuations: Vec<(&str, Vec<Node<'a>>)> = Vec::new();
    let mut current = node;
    loop {
        if let Some(request) = remote_root(current, ctx) {
            let mut request = request;
            // Apply innermost first so later handlers of the same kind win.
            for (method, arguments) in continuations.into_iter().rev() {
                absorb_continuation(&mut request, method, &arguments);
            }
            request.node = node;
            return Some(request);
        }
        let function = current.child_by_field_name("function")?;
        if current.kind() != "call_expression" || function.kind() != "member_expression" {
            return None;
        }
        let method = ctx.text(function.child_by_field_name("property")?);
        if !CONTINUATIONS.contains(&method) {
            return None;
        }
        continuations.push((method, call_arguments(current)));
        current = function.child_by_field_name("object")?;
    }
}

/// True when `node` is a request that an enclosing continuation already covers.
pub fn is_absorbed(node: Node, ctx: &ScriptContext) -> bool {
    let Some(member) = node.parent().filter(|p| p.kind() == "member_expression") else {
        return false;
    };
    if member.child_by_field_name("object").map(|o| o.id()) != Some(node.id()) {
        return false;
    }
    let continues = member
        .child_by_field_name("property")
        .is_some_and(|property| CONTINUATIONS.contains(&ctx.text(property)));
    continues
        && member
            .parent()
            .is_some_and(|call| call.kind() == "call_expression")
}

/// True if any request idiom appears under `node`.
pub fn contains_remote<'a>(node: Node<'a>, ctx: &ScriptContext<'a>) -> bool {
    let mut found = false;
    ctx.walk_from(node, |inner| {
        if !found && remote_root(inner, ctx).is_some() {
            found = true;
        }
    });
    found
}

fn absorb_continuation<'a>(request: &mut RemoteRequest<'a>, method: &str, arguments: &[Node<'a>]) {
    let first = arguments.first().copied();
    match method {
        "done" => request.success = first.or(request.success),
        "then" => {
            request.success = first.or(request.success);
            request.error = arguments.get(1).copied().or(request.error);
        }
        "fail" | "catch" => request.error = first.or(request.error),
        _ => request.complete = first.or(request.complete),
    }
}

fn configurable_request<'a>(
    node: Node<'a>,
    arguments: &[Node<'a>],
    ctx: &ScriptContext<'a>,
) -> RemoteRequest<'a> {
    let mut request = RemoteRequest::new(RemoteCallKind::Generic, node);
    // $.ajax(url, settings) and $.ajax(settings)
    let settings = match arguments {
        [url, settings, ..] => {
            request.url = Some(*url);
            Some(*settings)
        }
        [settings] => Some(*settings),
        [] => None,
    };
    let Some(settings) = settings.filter(|s| s.kind() == "object") else {
        return request;
    };

    let mut cursor = settings.walk();
    for entry in settings.named_children(&mut cursor) {
        let (key, value) = match entry.kind() {
            "pair" => {
                let (Some(key), Some(value)) = (
                    entry.child_by_field_name("key"),
                    entry.child_by_field_name("value"),
                ) else {
                    continue;
                };
                (unquote(ctx.text(key)), value)
            }
            // `success(data) { ... }` shorthand methods
            "method_definition" => match entry.child_by_field_name("name") {
                Some(name) => (ctx.text(name), entry),
                None => continue,
            },
            _ => continue,
        };
        match key {
            "url" => request.url = Some(value),
            "type" | "method" => request.method = Some(value),
            "data" => request.data = Some(value),
            "success" => request.success = Some(value),
            "error" => request.error = Some(value),
            "complete" => request.complete = Some(value),
            "dataType" => {
                request.data_type =
                    Some(unquote(ctx.text(value)).to_ascii_lowercase());
            }
            _ => {}
        }
    }
    request
}

fn shorthand_request<'a>(
    kind: RemoteCallKind,
    node: Node<'a>,
    arguments: &[Node<'a>],
    ctx: &ScriptContext<'a>,
) -> RemoteRequest<'a> {
    let mut request = RemoteRequest::new(kind, node);
    let mut rest = arguments.iter().copied();
    request.url = rest.next();

    let is_callback = |node: Node<'a>| {
        is_function_like(node) || (node.kind() == "identifier" && ctx.function(ctx.text(node)).is_some())
    };
    // $.get(url, [data], [success], [dataType])
    for argument in rest {
        if argument.kind() == "string" && request.success.is_some() {
            request.data_type = Some(unquote(ctx.text(argument)).to_ascii_lowercase());
        } else if request.success.is_none() && is_callback(argument) {
            request.success = Some(argument);
        } else if request.data.is_none() && request.success.is_none() {
            request.data = Some(argument);
        }
    }
    request
}

/// A callback rendered as the argument of `.then`/`.catch`/`.finally`.
fn callback_argument<'a>(
    callback: Node<'a>,
    default_parameter: &str,
    translator: &Translator<'_, 'a>,
) -> String {
    let ctx = translator.context();
    if !is_function_like(callback) && callback.kind() != "method_definition" {
        return translator.fragment(callback);
    }
    let parameters = parameters_of(callback, ctx);
    let parameter = if default_parameter.is_empty() {
        String::new()
    } else {
        first_parameter(&parameters)
            .unwrap_or(default_parameter)
            .to_string()
    };
    let body = translator.function_body(callback);
    if body.is_empty() {
        return format!("({parameter}) => {{}}");
    }
    format!("({parameter}) => {{\n{}\n}}", indent(&body, "  "))
}

/// Continuation lines of `text` shifted right by `prefix`.
fn indent_continuation(text: &str, prefix: &str) -> String {
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}

fn query_url(url: Option<Node>, rendered_url: &str, data: &str) -> String {
    match url {
        Some(node) if node.kind() == "string" => {
            let path = unquote(rendered_url)
                .replace('`', "\\`")
                .replace("${", "\\${");
            format!("`{path}?${{new URLSearchParams({data})}}`")
        }
        _ => format!("`${{{rendered_url}}}?${{new URLSearchParams({data})}}`"),
    }
}

/// Rewrite a request as a `fetch` promise chain.
pub fn render_fetch<'a>(request: &RemoteRequest<'a>, translator: &Translator<'_, 'a>) -> String {
    let ctx = translator.context();
    let url = request
        .url
        .map(|node| translator.fragment(node))
        .unwrap_or_else(|| "''".to_string());
    let data = request.data.map(|node| translator.fragment(node));
    let method = request.http_method(ctx);
    let method_is_literal = request.method.map_or(true, |node| node.kind() == "string");

    let mut out = if method == "GET" {
        match &data {
            Some(data) => format!("fetch({})", query_url(request.url, &url, data)),
            None => format!("fetch({url})"),
        }
    } else {
        let method_expr = if method_is_literal {
            format!("'{method}'")
        } else {
            method.clone()
        };
        let mut options = vec![format!("method: {method_expr}")];
        if let Some(data) = &data {
            options.push("headers: { 'Content-Type': 'application/json' }".to_string());
            options.push(format!("body: JSON.stringify({})", indent_continuation(data, "  ")));
        }
        let options: Vec<String> = options.iter().map(|option| format!("  {option},")).collect();
        format!("fetch({url}, {{\n{}\n}})", options.join("\n"))
    };

    let parse = if request.expects_text() {
        "response.text()"
    } else {
        "response.json()"
    };
    out.push_str(&format!(
        "\n  .then((response) => {{\n    if (!response.ok) {{\n      throw new Error(`Request failed with status ${{response.status}}`);\n    }}\n    return {parse};\n  }})"
    ));

    if let Some(success) = request.success {
        let callback = callback_argument(success, "data", translator);
        out.push_str(&format!("\n  .then({})", indent_continuation(&callback, "  ")));
    }
    match request.error {
        Some(error) => {
            let callback = callback_argument(error, "error", translator);
            out.push_str(&format!("\n  .catch({})", indent_continuation(&callback, "  ")));
        }
        None => out.push_str("\n  .catch((error) => {\n    console.error(error);\n  })"),
    }
    if let Some(complete) = request.complete {
        let callback = callback_argument(complete, "", translator);
        out.push_str(&format!("\n  .finally({})", indent_continuation(&callback, "  ")));
    }
    out
}

/// Pass 4: every outermost request becomes a [`RemoteCall`] record.
pub fn extract(ctx: &ScriptContext<'_>, builder: &mut ComponentBuilder) {
    let translator = Translator::new(ctx);
    let mut requests = Vec::new();
    ctx.walk(|node| {
        if is_absorbed(node, ctx) {
            return;
        }
        if let Some(request) = remote_chain(node, ctx) {
            requests.push(request);
        }
    });

    let count = requests.len();
    for request in requests {
        builder.add_remote_call(RemoteCall {
            kind: request.kind,
            url: request.url_text(ctx),
            method: request.http_method(ctx),
            request_body: request.data.map(|node| ctx.text(node).to_string()),
            success_handler: request.success.map(|node| ctx.text(node).to_string()),
            error_handler: request.error.map(|node| ctx.text(node).to_string()),
            translated_code: render_fetch(&request, &translator),
        });
    }
    debug!(count, "remote calls");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::context::parse_script;
    use indoc::indoc;

    fn remote_calls(source: &str) -> Vec<RemoteCall> {
        let tree = parse_script(source).unwrap();
        let ctx = ScriptContext::new(source, tree.root_node());
        let mut builder = ComponentBuilder::new("Test", "test.js");
        extract(&ctx, &mut builder);
        builder.remote_calls().to_vec()
    }

    #[test]
    fn shorthand_get_becomes_fetch_chain() {
        let calls = remote_calls("$.get('/api/users', function(data) { console.log(data); });");
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.kind, RemoteCallKind::Get);
        assert_eq!(call.url, "/api/users");
        assert_eq!(call.method, "GET");
        assert_eq!(
            call.translated_code,
            indoc! {r#"
                fetch('/api/users')
                  .then((response) => {
                    if (!response.ok) {
                      throw new Error(`Request failed with status ${response.status}`);
                    }
                    return response.json();
                  })
                  .then((data) => {
                    console.log(data);
                  })
                  .catch((error) => {
                    console.error(error);
                  })"#}
        );
    }

    #[test]
    fn ajax_settings_are_read_by_key() {
        let source = indoc! {r#"
            $.ajax({
              url: '/api/save',
              type: 'post',
              data: { name: name },
              success: function (result) { done(result); },
              error: function (xhr) { fail(xhr); },
              complete() { stop(); }
            });
        "#};
        let calls = remote_calls(source);
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.kind, RemoteCallKind::Generic);
        assert_eq!(call.method, "POST");
        assert_eq!(call.request_body.as_deref(), Some("{ name: name }"));
        assert!(call.translated_code.contains("method: 'POST',"));
        assert!(call.translated_code.contains("body: JSON.stringify({ name: name }),"));
        assert!(call.translated_code.contains(".then((result) => {\n    done(result);\n  })"));
        assert!(call.translated_code.contains(".catch((xhr) => {\n    fail(xhr);\n  })"));
        assert!(call.translated_code.contains(".finally(() => {\n    stop();\n  })"));
    }

    #[test]
    fn continuations_are_absorbed_into_one_call() {
        let source = "$.getJSON('/api/items', { page: 2 }).done(render).fail(report);";
        let calls = remote_calls(source);
        assert_eq!(calls.len(), 1);
        let code = &calls[0].translated_code;
        assert!(code.starts_with("fetch(`/api/items?${new URLSearchParams({ page: 2 })}`)"));
        assert!(code.contains("\n  .then(render)"));
        assert!(code.contains("\n  .catch(report)"));
    }

    #[test]
    fn literal_urls_stay_literal_inside_template_strings() {
        let calls = remote_calls("$.get('/api/${price}/`raw`', { q: 1 });");
        assert!(calls[0]
            .translated_code
            .starts_with("fetch(`/api/\\${price}/\\`raw\\`?${new URLSearchParams({ q: 1 })}`)"));
    }

    #[test]
    fn post_with_named_callback() {
        let source = "function saved(r) {}\n$.post('/api/notes', note, saved);";
        let calls = remote_calls(source);
        assert_eq!(calls[0].kind, RemoteCallKind::Post);
        assert_eq!(calls[0].request_body.as_deref(), Some("note"));
        assert_eq!(calls[0].success_handler.as_deref(), Some("saved"));
    }

    #[test]
    fn html_data_type_reads_text() {
        let calls = remote_calls("$.get('/fragment', show, 'html');\nfunction show(h) {}");
        assert!(calls[0].translated_code.contains("return response.text();"));
    }

    #[test]
    fn non_jquery_calls_are_ignored() {
        assert!(remote_calls("api.get('/x', cb); fetch('/y');").is_empty());
    }
}
