//! Canonical record types for the normalization engine
//!
//! Every source layout is normalized into these shapes before serialization.
//! All records serialize to camelCase JSON and are constructed fresh per
//! request from a parsed document; nothing here outlives one call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Episode identity inferred from a noisy title string and an optional link
///
/// `number` is never empty: it defaults to "1" when no signal is found, or
/// carries the literal "Movie" marker depending on the source profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDescriptor {
    /// Episode number, or "Movie" for movie entries under marker numbering
    pub number: String,
    /// Canonical human-readable title
    pub title: String,
    /// Detected release date substring, empty when none was found
    pub date: String,
}

/// An episode entry inside a series record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEpisode {
    /// Episode number, or "Movie" for movie entries under marker numbering
    pub number: String,
    /// Canonical human-readable title
    pub title: String,
    /// Release date text, empty when the source did not provide one
    pub date: String,
    /// Slug identifying the episode page
    pub slug: String,
}

/// A named video server reference
///
/// `url` is a direct source URL or a resolved player URL; `None` means the
/// mirror could not be resolved. It never carries a raw encoded payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoServerRef {
    /// Server name as shown by the source
    pub name: String,
    /// Resolved URL, or `None` when decoding/extraction failed
    pub url: Option<String>,
}

/// A single download link inside a quality group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    /// Host/mirror name from the anchor text
    pub name: String,
    /// Download URL; `None` for plaintext host listings without a link
    pub url: Option<String>,
}

/// Download links grouped by quality label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGroup {
    /// Quality label (e.g. "720p", "MKV 480p", "unknown")
    pub quality: String,
    /// File size text when the source provides it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Links within the group; no two links share the same URL
    pub links: Vec<DownloadLink>,
}

/// A download group covering a contiguous episode range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchDownload {
    /// Batch title from the source header
    pub title: String,
    /// Episode range in "N-M" form, empty when the header had no range
    pub episode_range: String,
    /// Quality groups inside the batch block
    pub quality_links: Vec<DownloadGroup>,
}

/// Normalized series detail record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    /// Series title with decorative suffixes stripped
    pub title: String,
    /// Alternative/Japanese titles, empty when absent
    pub alternative_titles: String,
    /// Poster image URL
    pub image: String,
    /// Synopsis text
    pub synopsis: String,
    /// Rating score text, empty when absent
    pub score: String,
    /// Free-form `key: value` info block, keys normalized per source
    pub info: BTreeMap<String, String>,
    /// Genres in source order, deduplicated
    pub genres: Vec<String>,
    /// Episode list in source order
    pub episodes: Vec<SeriesEpisode>,
    /// Batch download entries
    pub batch_downloads: Vec<BatchDownload>,
}

/// Normalized episode detail record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    /// Episode number, never empty
    pub number: String,
    /// Canonical human-readable title
    pub title: String,
    /// Release date text, empty when none was found
    pub date: String,
    /// Primary playback URL after canonical rewriting
    pub video_url: Option<String>,
    /// All listed servers, unresolvable ones included with a null URL
    pub video_servers: Vec<VideoServerRef>,
    /// Per-episode download groups
    pub download_links: Vec<DownloadGroup>,
    /// Slug of the previous episode when the page links one
    pub prev_slug: Option<String>,
    /// Slug of the next episode when the page links one
    pub next_slug: Option<String>,
    /// Slug of the parent series page
    pub parent_series_slug: String,
}

/// One series entry in a schedule day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Series title
    pub title: String,
    /// Series slug
    pub slug: String,
    /// Countdown/release timer text, localized
    pub timer: String,
    /// Episode label text (e.g. "Ep 12")
    pub episode_label: String,
}

/// A single day of the release schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    /// Localized day name
    pub day: String,
    /// Series airing on this day
    pub series: Vec<ScheduleEntry>,
}

/// A single search result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Series title
    pub title: String,
    /// Series slug
    pub slug: String,
    /// Thumbnail image URL
    pub image: String,
    /// Media type (TV, Movie, ONA, ...)
    #[serde(rename = "type")]
    pub media_type: String,
    /// Rating score text
    pub score: String,
    /// Season label
    pub season: String,
}

/// Pagination state derived from page-number controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The page the caller requested
    pub current_page: u32,
    /// Highest numeric page label seen, at least 1
    pub total_pages: u32,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

/// One page of normalized search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    /// The query string as received
    pub query: String,
    /// Result cards in source order
    pub results: Vec<SearchHit>,
    /// Pagination derived from the page controls
    pub pagination: Pagination,
}

/// A title/slug pair in the alphabetical listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Series title
    pub title: String,
    /// Series slug
    pub slug: String,
}

/// Alphabetized index over a listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingIndex {
    /// Entries bucketed by uppercased first letter; "#" for non-alphabetic
    pub by_letter: BTreeMap<String, Vec<ListingEntry>>,
    /// Bucket keys that actually hold entries, in order
    pub letters: Vec<String>,
    /// Total entry count across all buckets
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_record_serialization() {
        let record = EpisodeRecord {
            number: "12".to_string(),
            title: "Test Episode 12 Subtitle Indonesia".to_string(),
            date: "January 5, 2023".to_string(),
            video_url: Some("https://player.example/abc123".to_string()),
            video_servers: vec![VideoServerRef {
                name: "Mirror A".to_string(),
                url: None,
            }],
            download_links: vec![],
            prev_slug: Some("test-episode-11".to_string()),
            next_slug: None,
            parent_series_slug: "test".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"videoUrl\""));
        assert!(json.contains("\"videoServers\""));
        assert!(json.contains("\"downloadLinks\""));
        assert!(json.contains("\"prevSlug\""));
        assert!(json.contains("\"parentSeriesSlug\""));
        // Unresolvable servers stay in the list with a null url
        assert!(json.contains("\"url\":null"));
    }

    #[test]
    fn test_search_hit_type_field_name() {
        let hit = SearchHit {
            title: "Test".to_string(),
            slug: "test".to_string(),
            image: "".to_string(),
            media_type: "TV".to_string(),
            score: "8.1".to_string(),
            season: "".to_string(),
        };

        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"type\":\"TV\""));
        assert!(!json.contains("mediaType"));
    }

    #[test]
    fn test_pagination_field_names() {
        let page = Pagination {
            current_page: 2,
            total_pages: 3,
            has_next: true,
            has_prev: true,
        };

        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"currentPage\":2"));
        assert!(json.contains("\"totalPages\":3"));
        assert!(json.contains("\"hasNext\":true"));
        assert!(json.contains("\"hasPrev\":true"));
    }

    #[test]
    fn test_download_group_size_skipped_when_absent() {
        let group = DownloadGroup {
            quality: "720p".to_string(),
            size: None,
            links: vec![],
        };

        let json = serde_json::to_string(&group).unwrap();
        assert!(!json.contains("\"size\""));
    }

    #[test]
    fn test_series_record_roundtrip() {
        let mut info = BTreeMap::new();
        info.insert("status".to_string(), "Ongoing".to_string());

        let record = SeriesRecord {
            title: "Test".to_string(),
            alternative_titles: "".to_string(),
            image: "https://example.com/poster.jpg".to_string(),
            synopsis: "A test series".to_string(),
            score: "8.5".to_string(),
            info,
            genres: vec!["Action".to_string()],
            episodes: vec![],
            batch_downloads: vec![],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"alternativeTitles\""));
        assert!(json.contains("\"batchDownloads\""));

        let back: SeriesRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
