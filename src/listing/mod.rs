//! Alphabetical listing index and pagination state
//!
//! The A-Z listing page groups series anchors under letter blocks; the index
//! re-buckets them by the uppercased first character of the title, with a
//! "#" bucket for titles that start with anything non-alphabetic. Pagination
//! is derived from the numeric page-number labels, ignoring ellipses and
//! prev/next controls.

use std::collections::BTreeMap;

use regex::Regex;

use crate::document::{element_attr, element_text, select_all_in, RawDocument};
use crate::models::{ListingEntry, ListingIndex, Pagination};

/// Selector table for one source's listing markup
#[derive(Debug, Clone, Copy)]
pub struct ListingRules {
    /// Letter blocks on the listing page
    pub blocks: &'static str,
    /// Entry anchors within a block
    pub entries: &'static str,
    /// Page-number controls
    pub page_numbers: &'static str,
}

/// Build the alphabetized index from a listing page
///
/// Entries whose anchor text is empty or whose href does not yield a slug
/// under `slug_pattern` are dropped silently.
pub fn build_index(doc: &RawDocument, rules: &ListingRules, slug_pattern: &str) -> ListingIndex {
    let slug_re = Regex::new(slug_pattern).unwrap();
    let mut by_letter: BTreeMap<String, Vec<ListingEntry>> = BTreeMap::new();
    let mut total = 0usize;

    for block in doc.select_all(rules.blocks) {
        for anchor in select_all_in(block, rules.entries) {
            let title = element_text(anchor);
            let Some(href) = element_attr(anchor, "href") else {
                continue;
            };
            let Some(slug) = slug_re.captures(&href).map(|c| c[1].to_string()) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }

            let bucket = bucket_for(&title);
            by_letter
                .entry(bucket)
                .or_default()
                .push(ListingEntry { title, slug });
            total += 1;
        }
    }

    let letters = by_letter.keys().cloned().collect();

    ListingIndex {
        by_letter,
        letters,
        total,
    }
}

fn bucket_for(title: &str) -> String {
    match title.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
        _ => "#".to_string(),
    }
}

/// Derive pagination state from page-number controls
///
/// The highest numeric label is the total page count; "…" and prev/next
/// labels are ignored. A page without controls is a single page.
pub fn build_pagination(doc: &RawDocument, page_numbers: &str, current_page: u32) -> Pagination {
    let total_pages = doc
        .select_all(page_numbers)
        .into_iter()
        .filter_map(|el| element_text(el).parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1);

    Pagination {
        current_page,
        total_pages,
        has_next: current_page < total_pages,
        has_prev: current_page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &ListingRules = &ListingRules {
        blocks: ".blix",
        entries: "ul li a",
        page_numbers: ".hpage .page-numbers, .pagination .page-numbers",
    };

    const SLUG_PATTERN: &str = r"/anime/([^/?#]+)";

    #[test]
    fn test_index_buckets_by_first_letter() {
        let doc = RawDocument::parse(
            "<div class=\"blix\"><ul>\
             <li><a href=\"/anime/attack-titan/\">Attack Titan</a></li>\
             <li><a href=\"/anime/a-returner/\">a returner</a></li>\
             <li><a href=\"/anime/86-eighty-six/\">86: Eighty Six</a></li>\
             <li><a href=\"/anime/bleach/\">Bleach</a></li>\
             </ul></div>",
        )
        .unwrap();

        let index = build_index(&doc, RULES, SLUG_PATTERN);
        assert_eq!(index.total, 4);
        assert_eq!(index.letters, vec!["#", "A", "B"]);
        assert_eq!(index.by_letter["A"].len(), 2);
        assert_eq!(index.by_letter["#"][0].slug, "86-eighty-six");
    }

    #[test]
    fn test_entries_without_slug_are_dropped() {
        let doc = RawDocument::parse(
            "<div class=\"blix\"><ul>\
             <li><a href=\"/anime/kept-show/\">Kept Show</a></li>\
             <li><a href=\"/category/action/\">Action</a></li>\
             <li><a href=\"/anime/no-title/\"></a></li>\
             </ul></div>",
        )
        .unwrap();

        let index = build_index(&doc, RULES, SLUG_PATTERN);
        assert_eq!(index.total, 1);
        assert_eq!(index.by_letter["K"][0].title, "Kept Show");
    }

    #[test]
    fn test_source_order_preserved_within_bucket() {
        let doc = RawDocument::parse(
            "<div class=\"blix\"><ul>\
             <li><a href=\"/anime/zeta-two/\">Zeta Two</a></li>\
             <li><a href=\"/anime/zeta-one/\">Zeta One</a></li>\
             </ul></div>",
        )
        .unwrap();

        let index = build_index(&doc, RULES, SLUG_PATTERN);
        let titles: Vec<&str> = index.by_letter["Z"].iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta Two", "Zeta One"]);
    }

    #[test]
    fn test_pagination_max_numeric_label_wins() {
        let doc = RawDocument::parse(
            "<div class=\"hpage\">\
             <span class=\"page-numbers\">1</span>\
             <a class=\"page-numbers\" href=\"?page=2\">2</a>\
             <a class=\"page-numbers\" href=\"?page=3\">3</a>\
             <span class=\"page-numbers\">…</span>\
             <a class=\"page-numbers\" href=\"?page=2\">Next</a>\
             </div>",
        )
        .unwrap();

        let page = build_pagination(&doc, RULES.page_numbers, 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_pagination_defaults_to_single_page() {
        let doc = RawDocument::parse("<p>no controls</p>").unwrap();
        let page = build_pagination(&doc, RULES.page_numbers, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_pagination_on_last_page() {
        let doc = RawDocument::parse(
            "<div class=\"hpage\">\
             <a class=\"page-numbers\">1</a>\
             <span class=\"page-numbers\">2</span>\
             </div>",
        )
        .unwrap();

        let page = build_pagination(&doc, RULES.page_numbers, 2);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }
}
