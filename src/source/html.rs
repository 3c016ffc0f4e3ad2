//! Markup scanning for HTML inputs.
//!
//! Only tag boundaries and a few attributes are needed here, so a handful of
//! regular expressions is enough; the scripts themselves go to the parser.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").unwrap());
static LINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<link\b([^>]*)>").unwrap());
static SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\bsrc\s*=\s*["']([^"']*)["']"#).unwrap());
static HREF_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\bhref\s*=\s*["']([^"']*)["']"#).unwrap());
static REL_STYLESHEET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\brel\s*=\s*["'][^"']*stylesheet[^"']*["']"#).unwrap());
static TYPE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\btype\s*=\s*["']([^"']*)["']"#).unwrap());

fn is_javascript_type(attributes: &str) -> bool {
    match TYPE_ATTR.captures(attributes) {
        Some(caps) => {
            let kind = caps[1].trim().to_ascii_lowercase();
            kind.is_empty() || kind.contains("javascript") || kind == "module"
        }
        None => true,
    }
}

/// Bodies of inline `<script>` blocks, in document order.
pub fn inline_scripts(html: &str) -> Vec<String> {
    SCRIPT_BLOCK
        .captures_iter(html)
        .filter(|caps| !SRC_ATTR.is_match(&caps[1]) && is_javascript_type(&caps[1]))
        .map(|caps| caps[2].to_string())
        .filter(|body| !body.trim().is_empty())
        .collect()
}

/// `src` values of external `<script>` tags.
pub fn script_sources(html: &str) -> Vec<String> {
    SCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|caps| SRC_ATTR.captures(&caps[1]).map(|src| src[1].to_string()))
        .collect()
}

/// `href` values of `<link rel="stylesheet">` tags.
pub fn stylesheet_links(html: &str) -> Vec<String> {
    LINK_TAG
        .captures_iter(html)
        .filter(|caps| REL_STYLESHEET.is_match(&caps[1]))
        .filter_map(|caps| HREF_ATTR.captures(&caps[1]).map(|href| href[1].to_string()))
        .collect()
}

/// Embedded `<style>` bodies, dedented.
pub fn style_blocks(html: &str) -> Vec<String> {
    STYLE_BLOCK
        .captures_iter(html)
        .map(|caps| crate::text::dedent(&crate::text::tidy_lines(&caps[1])))
        .filter(|css| !css.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const PAGE: &str = indoc! {r#"
        <html>
          <head>
            <link rel="stylesheet" href="css/site.css">
            <link rel="icon" href="favicon.ico">
            <script src="js/jquery-3.7.1.min.js"></script>
            <script type="text/javascript" src='js/app.js'></script>
            <style>
              .hidden { display: none; }
            </style>
          </head>
          <body>
            <script type="text/template"><div>{{ name }}</div></script>
            <script>
              $('#a').hide();
            </script>
          </body>
        </html>
    "#};

    #[test]
    fn finds_inline_scripts_only() {
        let scripts = inline_scripts(PAGE);
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("$('#a').hide();"));
    }

    #[test]
    fn finds_external_scripts() {
        assert_eq!(
            script_sources(PAGE),
            vec!["js/jquery-3.7.1.min.js", "js/app.js"]
        );
    }

    #[test]
    fn finds_stylesheet_links() {
        assert_eq!(stylesheet_links(PAGE), vec!["css/site.css"]);
    }

    #[test]
    fn extracts_and_dedents_style_blocks() {
        assert_eq!(style_blocks(PAGE), vec![".hidden { display: none; }"]);
    }
}
