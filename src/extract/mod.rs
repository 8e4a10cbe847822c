//! Selector cascades and free-text info-block extraction
//!
//! Each field is described by an ordered list of strategies tried left to
//! right; the first non-empty trimmed value wins and an exhausted cascade
//! yields an empty string. Callers treat empty as "field absent", never as an
//! error. Source adapters supply these rule lists as plain data, so a new
//! site quirk is handled by appending a strategy rather than editing logic.

use std::collections::BTreeMap;

use scraper::ElementRef;

use crate::document::{
    element_attr, element_text, select_all_in, select_first_in, RawDocument,
};

/// What to read from a matched element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Trimmed text content
    Text,
    /// A single attribute value
    Attr(&'static str),
    /// First attribute, falling back to a second (e.g. `src` then `data-src`)
    AttrOr(&'static str, &'static str),
}

/// One step of a selector cascade
///
/// An empty `scope` applies the target to the element under inspection
/// itself, which lets element-scoped cascades read anchors and cells
/// directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strategy {
    /// CSS selector locating the element; empty means "this element"
    pub scope: &'static str,
    /// Value to read once located
    pub target: Target,
}

impl Strategy {
    /// Text-content strategy
    pub const fn text(scope: &'static str) -> Self {
        Self {
            scope,
            target: Target::Text,
        }
    }

    /// Attribute strategy
    pub const fn attr(scope: &'static str, name: &'static str) -> Self {
        Self {
            scope,
            target: Target::Attr(name),
        }
    }

    /// Attribute strategy with a fallback attribute
    pub const fn attr_or(scope: &'static str, first: &'static str, second: &'static str) -> Self {
        Self {
            scope,
            target: Target::AttrOr(first, second),
        }
    }
}

/// Apply a cascade against the whole document
///
/// Every element matching a strategy's scope is considered, so a first
/// `iframe` without `src` does not shadow a later one that has it.
pub fn extract(doc: &RawDocument, rules: &[Strategy]) -> String {
    for rule in rules {
        if rule.scope.is_empty() {
            continue;
        }
        for el in doc.select_all(rule.scope) {
            let value = read_target(el, rule.target);
            if !value.is_empty() {
                return value;
            }
        }
    }
    String::new()
}

/// Apply a cascade scoped to one element (e.g. a result card)
pub fn extract_in(el: ElementRef<'_>, rules: &[Strategy]) -> String {
    for rule in rules {
        if rule.scope.is_empty() {
            let value = read_target(el, rule.target);
            if !value.is_empty() {
                return value;
            }
            continue;
        }
        for inner in select_all_in(el, rule.scope) {
            let value = read_target(inner, rule.target);
            if !value.is_empty() {
                return value;
            }
        }
    }
    String::new()
}

fn read_target(el: ElementRef<'_>, target: Target) -> String {
    match target {
        Target::Text => element_text(el),
        Target::Attr(name) => element_attr(el, name).unwrap_or_default(),
        Target::AttrOr(first, second) => element_attr(el, first)
            .or_else(|| element_attr(el, second))
            .unwrap_or_default(),
    }
}

/// Parse `key: value` info lines into a normalized mapping
///
/// Each matched element's text is split on the first colon; the key is
/// lower-cased and run through the source's alias table, the value keeps any
/// further colons. Lines without both parts are skipped.
pub fn extract_info(
    doc: &RawDocument,
    selector: &str,
    aliases: &[(&str, &str)],
) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();

    for el in doc.select_all(selector) {
        let text = element_text(el);
        let Some((raw_key, raw_value)) = text.split_once(':') else {
            continue;
        };

        let key = raw_key.trim().to_lowercase();
        let value = raw_value.trim().to_string();
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let key = aliases
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| to.to_string())
            .unwrap_or(key);

        info.insert(key, value);
    }

    info
}

/// Extract the first anchor href within an element, if any
pub fn first_link(el: ElementRef<'_>) -> Option<String> {
    if el.value().name() == "a" {
        if let Some(href) = element_attr(el, "href") {
            return Some(href);
        }
    }
    select_first_in(el, "a").and_then(|a| element_attr(a, "href"))
}
