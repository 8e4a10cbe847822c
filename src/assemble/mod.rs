//! Page assemblers: one parsed document in, one canonical record out
//!
//! Assemblers orchestrate the extractors against a source profile. They never
//! fail: a field the page does not carry comes back empty, a list the page
//! does not carry comes back empty, and the caller decides whether the result
//! is worth serving.

use regex::Regex;

use crate::document::{element_attr, element_text, select_all_in, select_first_in, RawDocument};
use crate::download::{aggregate, aggregate_batches};
use crate::episode::{canonicalize_title, infer};
use crate::extract::{extract, extract_in, extract_info, first_link};
use crate::listing::{build_index, build_pagination};
use crate::models::{
    EpisodeRecord, ListingIndex, ScheduleDay, ScheduleEntry, SearchHit, SearchResultPage,
    SeriesEpisode, SeriesRecord,
};
use crate::sources::SourceProfile;
use crate::video::resolve;

/// Assemble a series detail record from a series page
pub fn series(doc: &RawDocument, profile: &SourceProfile) -> SeriesRecord {
    let title = strip_suffix(&extract(doc, profile.title), profile.title_suffix);
    let mut info = extract_info(doc, profile.info, profile.key_aliases);

    let alternative_titles = non_empty(extract(doc, profile.alternative_titles))
        .or_else(|| info.get("alternativeTitles").cloned())
        .unwrap_or_default();

    let score = non_empty(extract(doc, profile.score))
        .or_else(|| info.get("score").cloned())
        .or_else(|| scan_score(doc, profile.score_scan))
        .unwrap_or_default();

    let genres = collect_genres(doc, profile, &mut info);
    let episodes = collect_episodes(doc, profile);
    let batch_downloads = aggregate_batches(doc, &profile.downloads, &title);

    SeriesRecord {
        title,
        alternative_titles,
        image: extract(doc, profile.image),
        synopsis: extract(doc, profile.synopsis),
        score,
        info,
        genres,
        episodes,
        batch_downloads,
    }
}

/// Assemble an episode detail record from an episode page
pub fn episode(doc: &RawDocument, slug: &str, profile: &SourceProfile) -> EpisodeRecord {
    let page_title = extract(doc, profile.title);
    let mut descriptor = infer(&page_title, Some(slug), profile.numbering);

    if descriptor.date.is_empty() {
        descriptor.date = find_release_date(doc);
    }

    let resolution = resolve(doc, &profile.resolver);
    let download_links = aggregate(doc, &profile.downloads);
    let (prev_slug, next_slug) = nav_slugs(doc, profile);

    EpisodeRecord {
        number: descriptor.number,
        title: descriptor.title,
        date: descriptor.date,
        video_url: resolution.primary_url,
        video_servers: resolution.servers,
        download_links,
        prev_slug,
        next_slug,
        parent_series_slug: parent_series_slug(doc, slug, profile),
    }
}

/// Assemble the weekly release schedule
pub fn schedule(doc: &RawDocument, profile: &SourceProfile) -> Vec<ScheduleDay> {
    let rules = &profile.schedule;
    let mut days = Vec::new();

    for section in doc.select_all(rules.days) {
        let raw_day = select_first_in(section, rules.day_name)
            .map(element_text)
            .unwrap_or_default();
        if raw_day.is_empty() {
            continue;
        }
        let day = translate_day(&raw_day, rules.day_translations);

        let mut entries = Vec::new();
        for item in select_all_in(section, rules.items) {
            let title = extract_in(item, rules.item_title);
            if title.is_empty() {
                continue;
            }
            let Some(slug) = first_link(item).and_then(|href| series_slug(&href, profile))
            else {
                continue;
            };

            let mut timer = extract_in(item, rules.timer);
            if rules.localize_timer {
                timer = localize_timer(&timer);
            }

            entries.push(ScheduleEntry {
                title,
                slug,
                timer,
                episode_label: extract_in(item, rules.episode_label),
            });
        }

        if entries.is_empty() {
            continue;
        }
        days.push(ScheduleDay { day, series: entries });
    }

    days
}

/// Assemble one page of search results
pub fn search(
    doc: &RawDocument,
    query: &str,
    current_page: u32,
    profile: &SourceProfile,
) -> SearchResultPage {
    let rules = &profile.search;
    let mut results = Vec::new();

    for card in doc.select_all(rules.items) {
        let title = extract_in(card, rules.title);
        let Some(slug) = first_link(card).and_then(|href| series_slug(&href, profile)) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        results.push(SearchHit {
            title,
            slug,
            image: extract_in(card, rules.image),
            media_type: extract_in(card, rules.media_type),
            score: extract_in(card, rules.score),
            season: extract_in(card, rules.season),
        });
    }

    let pagination = build_pagination(doc, profile.listing.page_numbers, current_page);

    SearchResultPage {
        query: query.to_string(),
        results,
        pagination,
    }
}

/// Assemble the alphabetical listing index
pub fn listing(doc: &RawDocument, profile: &SourceProfile) -> ListingIndex {
    build_index(doc, &profile.listing, profile.slug_pattern)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn strip_suffix(title: &str, suffix_pattern: &str) -> String {
    Regex::new(suffix_pattern)
        .unwrap()
        .replace(title, "")
        .trim()
        .to_string()
}

/// Scan the serialized page for a score when no score element exists
fn scan_score(doc: &RawDocument, pattern: &str) -> Option<String> {
    Regex::new(pattern)
        .unwrap()
        .captures(&doc.outer_html())
        .map(|caps| caps[1].to_string())
}

/// Genres from dedicated anchors, falling back to the info block
fn collect_genres(
    doc: &RawDocument,
    profile: &SourceProfile,
    info: &mut std::collections::BTreeMap<String, String>,
) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for anchor in doc.select_all(profile.genres) {
        let genre = element_text(anchor);
        if !genre.is_empty() && !genres.contains(&genre) {
            genres.push(genre);
        }
    }

    if genres.is_empty() {
        for key in ["genres", "genre"] {
            if let Some(line) = info.remove(key) {
                genres = line
                    .split(',')
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect();
                break;
            }
        }
    } else {
        // The dedicated anchors supersede the raw info line
        info.remove("genres");
        info.remove("genre");
    }

    genres
}

/// Episode entries from a series page, in source order
///
/// Themes with dedicated number/title/date cells are read field-wise; themes
/// with one noisy text line per entry go through full inference. Entries
/// without a link are dropped.
fn collect_episodes(doc: &RawDocument, profile: &SourceProfile) -> Vec<SeriesEpisode> {
    let mut episodes = Vec::new();

    for item in doc.select_all(profile.episode_items) {
        let Some(href) = first_link(item) else {
            continue;
        };
        let slug = episode_slug_from_href(&href, profile);

        let number_field = extract_in(item, profile.episode_number);
        let entry = if !number_field.is_empty() {
            let number = normalize_number_field(&number_field, profile);
            let title_field = extract_in(item, profile.episode_title);
            SeriesEpisode {
                title: canonicalize_title(&title_field, &number),
                number,
                date: extract_in(item, profile.episode_date),
                slug,
            }
        } else {
            let raw = non_empty(extract_in(item, profile.episode_title))
                .unwrap_or_else(|| element_text(item));
            let descriptor = infer(&raw, Some(&href), profile.numbering);
            SeriesEpisode {
                number: descriptor.number,
                title: descriptor.title,
                date: non_empty(extract_in(item, profile.episode_date))
                    .unwrap_or(descriptor.date),
                slug,
            }
        };

        episodes.push(entry);
    }

    episodes
}

fn normalize_number_field(field: &str, profile: &SourceProfile) -> String {
    if field.eq_ignore_ascii_case("movie")
        && profile.numbering == crate::episode::MovieNumbering::Numeric
    {
        return "1".to_string();
    }
    field.trim().to_string()
}

/// Release date from metadata elements, then from the page text
fn find_release_date(doc: &RawDocument) -> String {
    for el in doc.select_all(".updated, .date, time[datetime]") {
        let text = element_text(el);
        if !text.is_empty() {
            return text;
        }
    }

    let html = doc.outer_html();
    let patterns = [
        r"(?i)Released\s+on\s+([A-Za-z]+\s+\d{1,2},\s+\d{4})",
        r"(?i)Dirilis\s+pada\s+([A-Za-z]+\s+\d{1,2},\s+\d{4})",
    ];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(&html) {
            return caps[1].to_string();
        }
    }

    String::new()
}

/// Previous/next episode slugs from the navigation anchors
fn nav_slugs(doc: &RawDocument, profile: &SourceProfile) -> (Option<String>, Option<String>) {
    let mut prev = None;
    let mut next = None;

    for anchor in doc.select_all(profile.nav_anchors) {
        let label = element_text(anchor).to_lowercase();
        if label.contains("see all") || label.contains("semua episode") {
            continue;
        }
        let Some(href) = element_attr(anchor, "href") else {
            continue;
        };
        let slug = episode_slug_from_href(&href, profile);
        if slug.is_empty() {
            continue;
        }

        if prev.is_none() && (label.contains("prev") || label.contains("sebelum")) {
            prev = Some(slug);
        } else if next.is_none() && (label.contains("next") || label.contains("selanjut")) {
            next = Some(slug);
        }
    }

    (prev, next)
}

/// Parent series slug, tried from the most explicit signal to the weakest
///
/// Breadcrumb item, then the canonical og:url, then any series anchor, and
/// finally stripping the episode suffix off the episode's own slug.
fn parent_series_slug(doc: &RawDocument, episode_slug: &str, profile: &SourceProfile) -> String {
    let series_re = Regex::new(profile.slug_pattern).unwrap();

    let crumbs = doc.select_all(profile.breadcrumb_items);
    if let Some(crumb) = crumbs.get(1) {
        if let Some(href) = first_link(*crumb) {
            if let Some(caps) = series_re.captures(&href) {
                return caps[1].to_string();
            }
        }
    }

    if let Some(meta) = doc.select_first("meta[property=\"og:url\"]") {
        if let Some(content) = element_attr(meta, "content") {
            if let Some(caps) = series_re.captures(&content) {
                return caps[1].to_string();
            }
        }
    }

    for anchor in doc.select_all(profile.series_anchors) {
        if let Some(href) = element_attr(anchor, "href") {
            if let Some(caps) = series_re.captures(&href) {
                return caps[1].to_string();
            }
        }
    }

    derive_series_slug(episode_slug)
}

/// Strip the episode suffix off an episode slug
fn derive_series_slug(episode_slug: &str) -> String {
    let patterns = [r"^(.+?)-episode-\d+", r"^(.+?)-\d+(?:-end)?$"];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(episode_slug) {
            return caps[1].to_string();
        }
    }
    episode_slug.to_string()
}

/// Series slug from an href, `None` when the pattern does not match
///
/// Schedule and search entries whose link is not a series page (tag pages,
/// blog posts) are dropped rather than given a fabricated slug.
fn series_slug(href: &str, profile: &SourceProfile) -> Option<String> {
    Regex::new(profile.slug_pattern)
        .unwrap()
        .captures(href)
        .map(|caps| caps[1].to_string())
}

fn episode_slug_from_href(href: &str, profile: &SourceProfile) -> String {
    let trimmed = href.trim_end_matches('/');
    Regex::new(profile.episode_slug_pattern)
        .unwrap()
        .captures(trimmed)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| path_slug(href))
}

/// Last-resort slug: the href path without scheme, host, and slashes
fn path_slug(href: &str) -> String {
    Regex::new(r"^https?://[^/]+")
        .unwrap()
        .replace(href, "")
        .trim_matches('/')
        .to_string()
}

fn translate_day(raw: &str, table: &[(&str, &str)]) -> String {
    let key = raw.trim().to_lowercase();
    table
        .iter()
        .find(|(en, _)| *en == key)
        .map(|(_, local)| local.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Localize the English timer phrases the schedule widget emits
fn localize_timer(timer: &str) -> String {
    if timer.is_empty() {
        return String::new();
    }
    if timer.to_lowercase().contains("released") {
        return "sudah rilis".to_string();
    }
    Regex::new(r"(?i)\bat\b")
        .unwrap()
        .replace_all(timer, "Jam")
        .trim()
        .to_string()
}
