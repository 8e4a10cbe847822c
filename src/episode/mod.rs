//! Episode identity inference from noisy title strings
//!
//! Source sites publish episode entries as free text ("One Piece Episode 1045
//! Subtitle Indonesia – January 8, 2023") with the structure varying by theme
//! and by how careful the uploader was. This module runs regex cascades over
//! the text and, when that fails, over the entry's link to recover a number,
//! a clean title, and a date, then rewrites the title into the canonical
//! "{base} Episode {n} Subtitle Indonesia" form.

use regex::Regex;

use crate::models::EpisodeDescriptor;

/// How a source numbers movie entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovieNumbering {
    /// Keep the literal "Movie" marker as the number
    Marker,
    /// Force movies to number "1"
    Numeric,
}

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Infer episode number, canonical title, and date from raw entry text
///
/// The number is taken from the text first, then from the link, and defaults
/// to "1". Movie entries are detected by a word-boundary "movie" match and
/// numbered per `numbering`. Any detected date substring is removed from the
/// title before canonicalization.
pub fn infer(raw_text: &str, link: Option<&str>, numbering: MovieNumbering) -> EpisodeDescriptor {
    let date = find_date(raw_text);

    let mut title = raw_text.to_string();
    if !date.is_empty() {
        title = title.replace(&date, " ");
    }

    let is_movie = Regex::new(r"(?i)\b(?:the\s+)?movie\b")
        .unwrap()
        .is_match(raw_text);

    let number = if is_movie {
        match numbering {
            MovieNumbering::Marker => "Movie".to_string(),
            MovieNumbering::Numeric => "1".to_string(),
        }
    } else {
        number_from_text(raw_text)
            .or_else(|| link.and_then(number_from_link))
            .unwrap_or_else(|| "1".to_string())
    };

    let title = canonicalize_title(&cleanup_title(&title), &number);

    EpisodeDescriptor {
        number,
        title,
        date,
    }
}

/// Pull the episode number out of the entry text, if present
fn number_from_text(text: &str) -> Option<String> {
    let patterns = [r"(?i)episode\s+(\d+)", r"(?i)\beps?\s*(\d+)"];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Pull the episode number out of the entry link, if present
fn number_from_link(link: &str) -> Option<String> {
    let link = link.trim_end_matches('/');
    let patterns = [r"(?i)episode-(\d+)", r"(?i)[^a-z0-9](\d+)(?:-end)?$"];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(link) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Find a date substring in any of the formats the sources emit
fn find_date(text: &str) -> String {
    let patterns = [
        format!(r"(?i)(?:{MONTHS})\s+\d{{1,2}},\s+\d{{4}}"),
        format!(r"(?i)\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}}"),
        r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}".to_string(),
    ];
    for pattern in patterns {
        if let Some(m) = Regex::new(&pattern).unwrap().find(text) {
            return m.as_str().to_string();
        }
    }
    String::new()
}

/// Strip listing noise: collapsed whitespace, leading index, trailing "Sub..."
fn cleanup_title(title: &str) -> String {
    let collapsed = Regex::new(r"\s+")
        .unwrap()
        .replace_all(title, " ")
        .trim()
        .to_string();
    let no_index = Regex::new(r"^\d+\s+")
        .unwrap()
        .replace(&collapsed, "")
        .to_string();
    Regex::new(r"(?i)\s+sub$")
        .unwrap()
        .replace(&no_index, "")
        .trim()
        .to_string()
}

/// Rewrite a title into the canonical "Episode N Subtitle Indonesia" form
///
/// Titles that already carry an "Episode"/"Movie" marker are left alone, so
/// applying this twice is a no-op.
pub fn canonicalize_title(title: &str, number: &str) -> String {
    if number == "Movie" {
        if title.contains("Movie") {
            return title.trim().to_string();
        }
        let base = base_title(title);
        return format!("{base} Movie Subtitle Indonesia").trim().to_string();
    }

    if title.contains("Episode") {
        return title.trim().to_string();
    }

    let mut base = base_title(title);
    // A bare trailing episode number would otherwise be duplicated
    if let Some(stripped) = base.strip_suffix(number) {
        if stripped.ends_with(char::is_whitespace) && !stripped.trim_end().is_empty() {
            base = stripped.trim_end().to_string();
        }
    }
    format!("{base} Episode {number} Subtitle Indonesia")
        .trim()
        .to_string()
}

/// Title up to any "Sub..." suffix (e.g. "Subtitle Indonesia", "Sub Indo")
fn base_title(title: &str) -> String {
    Regex::new(r"(?i)\s+sub")
        .unwrap()
        .splitn(title, 2)
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_full_listing_entry() {
        let descriptor = infer(
            "One Piece Episode 1045 Subtitle Indonesia January 8, 2023",
            Some("https://example.com/one-piece-episode-1045/"),
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.number, "1045");
        assert_eq!(descriptor.title, "One Piece Episode 1045 Subtitle Indonesia");
        assert_eq!(descriptor.date, "January 8, 2023");
    }

    #[test]
    fn test_infer_bare_number_title_with_date() {
        let descriptor = infer(
            "One Piece 1045 January 5, 2023",
            Some(".../one-piece-1045"),
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.number, "1045");
        assert_eq!(descriptor.date, "January 5, 2023");
        assert_eq!(descriptor.title, "One Piece Episode 1045 Subtitle Indonesia");
    }

    #[test]
    fn test_infer_number_from_link_when_text_is_bare() {
        let descriptor = infer(
            "Kaiju Decisive Battle Sub",
            Some("https://example.com/kaiju-decisive-battle-12/"),
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.number, "12");
        assert_eq!(
            descriptor.title,
            "Kaiju Decisive Battle Episode 12 Subtitle Indonesia"
        );
    }

    #[test]
    fn test_infer_number_from_end_suffixed_link() {
        let descriptor = infer(
            "Btth Season 5",
            Some("https://example.com/btth-season-5-104-end/"),
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.number, "104");
    }

    #[test]
    fn test_infer_defaults_to_one() {
        let descriptor = infer("Mystery Special", None, MovieNumbering::Marker);
        assert_eq!(descriptor.number, "1");
        assert_eq!(
            descriptor.title,
            "Mystery Special Episode 1 Subtitle Indonesia"
        );
        assert_eq!(descriptor.date, "");
    }

    #[test]
    fn test_movie_marker_numbering() {
        let descriptor = infer(
            "Grand Saga The Movie Subtitle Indonesia",
            None,
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.number, "Movie");
        assert_eq!(descriptor.title, "Grand Saga The Movie Subtitle Indonesia");
    }

    #[test]
    fn test_movie_numeric_numbering() {
        let descriptor = infer(
            "Grand Saga The Movie Subtitle Indonesia",
            None,
            MovieNumbering::Numeric,
        );
        assert_eq!(descriptor.number, "1");
    }

    #[test]
    fn test_movie_word_boundary_not_matched_inside_words() {
        let descriptor = infer("Removiet Episode 3", None, MovieNumbering::Marker);
        assert_eq!(descriptor.number, "3");
    }

    #[test]
    fn test_numeric_date_format_detected_and_removed() {
        let descriptor = infer(
            "Some Show Episode 7 Subtitle Indonesia 12/01/2024",
            None,
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.date, "12/01/2024");
        assert!(!descriptor.title.contains("12/01/2024"));
    }

    #[test]
    fn test_day_first_date_format() {
        let descriptor = infer(
            "Some Show Episode 7 Subtitle Indonesia 8 January 2023",
            None,
            MovieNumbering::Marker,
        );
        assert_eq!(descriptor.date, "8 January 2023");
    }

    #[test]
    fn test_leading_index_stripped() {
        let descriptor = infer("1045 One Piece Sub", None, MovieNumbering::Marker);
        assert!(descriptor.title.starts_with("One Piece"));
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize_title("My Show", "4");
        let twice = canonicalize_title(&once, "4");
        assert_eq!(once, "My Show Episode 4 Subtitle Indonesia");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonicalize_replaces_short_sub_suffix() {
        let title = canonicalize_title("My Show Sub Indo", "9");
        assert_eq!(title, "My Show Episode 9 Subtitle Indonesia");
    }
}
