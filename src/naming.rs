//! Deterministic identifier derivation.
//!
//! Every generated name is a pure function of the selector (or file name) it
//! comes from, so the same selector yields the same identifier no matter in
//! which pass or how many times it is encountered.

use crate::descriptor::MutationKind;

/// Derive a camel-case-ish identifier from a CSS selector.
///
/// Leading `#`/`.` are stripped, every run of non-alphanumeric characters
/// becomes one `_`, separators at either end are trimmed and the first
/// character is lower-cased. Selectors with nothing usable left fall back to
/// `element`; a leading digit gets an `el_` prefix so the result stays a
/// valid JavaScript identifier.
pub fn selector_to_identifier(selector: &str) -> String {
    let stripped = selector
        .trim()
        .trim_start_matches(|c| c == '#' || c == '.');

    let mut collapsed = String::with_capacity(stripped.len());
    let mut last_was_separator = false;
    for ch in stripped.chars() {
        if ch.is_ascii_alphanumeric() {
            collapsed.push(ch);
            last_was_separator = false;
        } else if !last_was_separator {
            collapsed.push('_');
            last_was_separator = true;
        }
    }

    let identifier = lower_first(collapsed.trim_matches('_'));
    if identifier.is_empty() {
        return "element".to_string();
    }
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("el_{identifier}");
    }
    identifier
}

pub fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `submit_btn` / `submit-btn` / `submitBtn` → `SubmitBtn`
pub fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(upper_first)
        .collect()
}

/// `background-color` → `backgroundColor`
pub fn css_property_name(property: &str) -> String {
    let mut segments = property
        .trim()
        .split('-')
        .filter(|segment| !segment.is_empty());
    let mut name = segments.next().map(str::to_string).unwrap_or_default();
    for segment in segments {
        name.push_str(&upper_first(segment));
    }
    name
}

pub fn reference_name(selector: &str) -> String {
    format!("{}Ref", selector_to_identifier(selector))
}

pub fn state_name(selector: &str, mutation: MutationKind) -> String {
    format!("{}{}", selector_to_identifier(selector), mutation.suffix())
}

pub fn setter_name(identifier: &str) -> String {
    format!("set{}", upper_first(identifier))
}

/// `handle` + target + optional delegated child + event, all PascalCase.
pub fn handler_name(target: &str, delegate: Option<&str>, event: &str) -> String {
    let mut name = String::from("handle");
    name.push_str(&pascal_case(&selector_to_identifier(target)));
    if let Some(child) = delegate {
        name.push_str(&pascal_case(&selector_to_identifier(child)));
    }
    name.push_str(&pascal_case(event));
    name
}

/// Component name from a file stem: `user-profile` → `UserProfile`.
pub fn component_name(stem: &str) -> String {
    let name = pascal_case(stem);
    if name.is_empty() {
        "Component".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Component{name}")
    } else {
        name
    }
}

/// `MAX_ITEMS`, `CONFIG_URL`, `CONSTANT_X` are constants regardless of use.
pub fn is_constant_name(name: &str) -> bool {
    let all_upper = name.chars().any(|c| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '$');
    all_upper || name.starts_with("CONFIG") || name.starts_with("CONST")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_selector_prefixes() {
        assert_eq!(selector_to_identifier("#submitBtn"), "submitBtn");
        assert_eq!(selector_to_identifier(".nav-item"), "nav_item");
        assert_eq!(selector_to_identifier("#SubmitBtn"), "submitBtn");
    }

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(
            selector_to_identifier("#form input[name='email']"),
            "form_input_name_email"
        );
        assert_eq!(selector_to_identifier("  ul > li  "), "ul_li");
    }

    #[test]
    fn degenerate_selectors_stay_valid() {
        assert_eq!(selector_to_identifier("*"), "element");
        assert_eq!(selector_to_identifier(""), "element");
        assert_eq!(selector_to_identifier("#1st"), "el_1st");
    }

    #[test]
    fn derived_names() {
        assert_eq!(reference_name("#submitBtn"), "submitBtnRef");
        assert_eq!(state_name("#status", MutationKind::Text), "statusText");
        assert_eq!(setter_name("statusText"), "setStatusText");
        assert_eq!(
            handler_name("#submitBtn", None, "click"),
            "handleSubmitBtnClick"
        );
        assert_eq!(
            handler_name("#list", Some(".item"), "click"),
            "handleListItemClick"
        );
    }

    #[test]
    fn component_names_from_stems() {
        assert_eq!(component_name("user-profile"), "UserProfile");
        assert_eq!(component_name("index"), "Index");
        assert_eq!(component_name("404"), "Component404");
        assert_eq!(component_name("---"), "Component");
    }

    #[test]
    fn css_properties_become_camel_case() {
        assert_eq!(css_property_name("background-color"), "backgroundColor");
        assert_eq!(css_property_name("color"), "color");
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant_name("API_URL"));
        assert!(is_constant_name("MAX2"));
        assert!(is_constant_name("CONFIGuration"));
        assert!(is_constant_name("CONST_value"));
        assert!(!is_constant_name("counter"));
        assert!(!is_constant_name("Config"));
        assert!(!is_constant_name("_"));
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(selector in ".{0,40}") {
            prop_assert_eq!(
                selector_to_identifier(&selector),
                selector_to_identifier(&selector)
            );
        }

        #[test]
        fn derived_identifiers_are_valid(selector in ".{0,40}") {
            let id = selector_to_identifier(&selector);
            prop_assert!(!id.is_empty());
            prop_assert!(!id.starts_with('_') && !id.ends_with('_'));
            prop_assert!(!id.starts_with(|c: char| c.is_ascii_digit()));
            prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            prop_assert!(!id.contains("__"));
        }
    }
}
