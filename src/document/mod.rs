//! Read-only handle over a parsed markup tree
//!
//! The engine never performs network I/O; the external fetch layer supplies
//! raw HTML and this module wraps it into a query surface the extractors can
//! share. Selector strings that fail to parse are treated as non-matching
//! rather than errors, so a bad entry in a source's selector table degrades
//! that one field instead of the whole record.

use scraper::{ElementRef, Html, Selector};

use crate::error::{EngineError, EngineResult};

/// An immutable parsed document owned by the caller for one request
#[derive(Debug)]
pub struct RawDocument {
    html: Html,
}

impl RawDocument {
    /// Parse raw HTML into a queryable document
    ///
    /// Returns `MalformedDocument` when the input is empty or contains no
    /// markup at all. Anything that looks like markup parses leniently; the
    /// per-field extractors handle the rest by degrading to empty values.
    pub fn parse(input: &str) -> EngineResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::MalformedDocument("empty input".to_string()));
        }
        if !trimmed.contains('<') {
            return Err(EngineError::MalformedDocument(
                "input contains no markup".to_string(),
            ));
        }

        Ok(Self {
            html: Html::parse_document(input),
        })
    }

    /// First element matching the selector, in document order
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let parsed = parse_selector(selector)?;
        self.html.select(&parsed).next()
    }

    /// All elements matching the selector, in document order
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(parsed) => self.html.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    /// Serialized document for raw pattern scanning
    pub fn outer_html(&self) -> String {
        self.html.html()
    }
}

/// Parse a selector string, logging and skipping invalid ones
fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::debug!(selector, %err, "skipping unparsable selector");
            None
        }
    }
}

/// Trimmed text content of an element, with inner whitespace preserved
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Attribute value of an element, if present and non-empty
pub fn element_attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First element matching the selector within another element
pub fn select_first_in<'a>(el: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let parsed = parse_selector(selector)?;
    el.select(&parsed).next()
}

/// All elements matching the selector within another element
pub fn select_all_in<'a>(el: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector) {
        Some(parsed) => el.select(&parsed).collect(),
        None => Vec::new(),
    }
}
