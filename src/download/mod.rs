//! Download-link aggregation into quality groups
//!
//! Structured themes publish download blocks as quality-labelled lists of
//! host anchors; degraded pages collapse to a flat run of anchors with the
//! quality only mentioned in the anchor text. Aggregation prefers the
//! structured shape and falls back to scanning generic anchors only when no
//! structured group was found. URLs are deduplicated within each group.

use regex::Regex;
use scraper::ElementRef;

use crate::document::{element_attr, element_text, select_all_in, select_first_in, RawDocument};
use crate::models::{BatchDownload, DownloadGroup, DownloadLink};

/// Selector table describing one source's download markup
#[derive(Debug, Clone, Copy)]
pub struct DownloadRules {
    /// Structured quality blocks
    pub groups: &'static str,
    /// Quality label within a block
    pub quality: &'static str,
    /// Optional file-size element within a block
    pub size: Option<&'static str>,
    /// Host anchors within a block
    pub link: &'static str,
    /// Generic anchors scanned when no structured block matched
    pub fallback_anchors: &'static str,
    /// Containers holding batch download sections
    pub batch_containers: &'static str,
    /// Batch title element within a container
    pub batch_title: &'static str,
}

/// Collect download groups from an episode or series page
pub fn aggregate(doc: &RawDocument, rules: &DownloadRules) -> Vec<DownloadGroup> {
    let groups: Vec<DownloadGroup> = doc
        .select_all(rules.groups)
        .into_iter()
        .filter_map(|block| structured_group(block, rules))
        .collect();

    if !groups.is_empty() {
        return groups;
    }

    fallback_groups(doc, rules)
}

/// Parse one structured quality block; `None` when it has no usable content
fn structured_group(block: ElementRef<'_>, rules: &DownloadRules) -> Option<DownloadGroup> {
    let quality = select_first_in(block, rules.quality)
        .map(element_text)
        .unwrap_or_default();
    if quality.is_empty() {
        return None;
    }

    let size = rules
        .size
        .and_then(|selector| select_first_in(block, selector))
        .map(element_text)
        .filter(|s| !s.is_empty());

    let mut links = Vec::new();
    for anchor in select_all_in(block, rules.link) {
        let Some(href) = element_attr(anchor, "href") else {
            continue;
        };
        if href.starts_with("javascript:") {
            continue;
        }
        let name = element_text(anchor);
        if name.is_empty() {
            continue;
        }
        if links
            .iter()
            .any(|l: &DownloadLink| l.url.as_deref() == Some(href.as_str()))
        {
            continue;
        }
        links.push(DownloadLink {
            name,
            url: Some(href),
        });
    }

    if links.is_empty() {
        return None;
    }

    Some(DownloadGroup {
        quality,
        size,
        links,
    })
}

/// Scan generic anchors and bucket them by inferred quality
fn fallback_groups(doc: &RawDocument, rules: &DownloadRules) -> Vec<DownloadGroup> {
    let mut groups: Vec<DownloadGroup> = Vec::new();
    let mut seen_urls: Vec<String> = Vec::new();

    for anchor in doc.select_all(rules.fallback_anchors) {
        let Some(href) = element_attr(anchor, "href") else {
            continue;
        };
        if href.starts_with("javascript:") || seen_urls.contains(&href) {
            continue;
        }
        let name = element_text(anchor);
        if name.is_empty() {
            continue;
        }

        let quality = infer_quality(&name);
        seen_urls.push(href.clone());

        let link = DownloadLink {
            name,
            url: Some(href),
        };
        match groups.iter_mut().find(|g| g.quality == quality) {
            Some(group) => group.links.push(link),
            None => groups.push(DownloadGroup {
                quality,
                size: None,
                links: vec![link],
            }),
        }
    }

    groups
}

/// Infer a quality label from anchor text
fn infer_quality(text: &str) -> String {
    if let Some(caps) = Regex::new(r"(?i)(\d+p)").unwrap().captures(text) {
        return caps[1].to_lowercase();
    }
    for bare in ["1080", "720", "480", "360"] {
        if text.contains(bare) {
            return format!("{bare}p");
        }
    }
    "unknown".to_string()
}

/// Collect batch download sections from a series page
///
/// Each container yields one batch; its title falls back to the series title
/// when the markup has no header. Groups without anchors may still list hosts
/// as plain text, which are kept as links without URLs.
pub fn aggregate_batches(
    doc: &RawDocument,
    rules: &DownloadRules,
    fallback_title: &str,
) -> Vec<BatchDownload> {
    let mut batches = Vec::new();

    for container in doc.select_all(rules.batch_containers) {
        let title = select_first_in(container, rules.batch_title)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback_title.to_string());

        let episode_range = extract_episode_range(&title);

        let mut quality_links = Vec::new();
        for block in select_all_in(container, rules.groups) {
            if let Some(group) = structured_group(block, rules) {
                quality_links.push(group);
                continue;
            }
            if let Some(group) = plaintext_host_group(block, rules) {
                quality_links.push(group);
            }
        }

        if quality_links.is_empty() {
            continue;
        }

        batches.push(BatchDownload {
            title,
            episode_range,
            quality_links,
        });
    }

    batches
}

/// Parse a quality block whose hosts are plain text rather than anchors
fn plaintext_host_group(block: ElementRef<'_>, rules: &DownloadRules) -> Option<DownloadGroup> {
    let quality = select_first_in(block, rules.quality)
        .map(element_text)
        .unwrap_or_default();
    if quality.is_empty() {
        return None;
    }

    let full = element_text(block);
    let hosts = full
        .strip_prefix(&quality)
        .unwrap_or(&full)
        .split_whitespace()
        .map(|h| h.trim_matches(|c: char| c == '|' || c == ','))
        .filter(|h| !h.is_empty())
        .map(|h| DownloadLink {
            name: h.to_string(),
            url: None,
        })
        .collect::<Vec<_>>();

    if hosts.is_empty() {
        return None;
    }

    Some(DownloadGroup {
        quality,
        size: None,
        links: hosts,
    })
}

/// Extract an "N-M" episode range from a batch title
fn extract_episode_range(title: &str) -> String {
    let patterns = [
        r"(?i)episode\s*(\d+)\s*[–-]\s*(\d+)",
        r"(\d+)\s*[–-]\s*(\d+)",
    ];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(title) {
            return format!("{}-{}", &caps[1], &caps[2]);
        }
    }
    String::new()
}
