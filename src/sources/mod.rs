//! Per-source layout profiles
//!
//! A profile is pure data: selector cascades, alias tables, host lists, and
//! numbering policy for one site family. The assemblers stay generic and all
//! layout knowledge lives here, so supporting a redesigned theme means
//! editing (or adding) a profile, not the pipeline.

use crate::download::DownloadRules;
use crate::episode::MovieNumbering;
use crate::extract::Strategy;
use crate::listing::ListingRules;
use crate::video::ResolverConfig;

/// Selector table for the weekly release schedule page
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRules {
    /// Day sections
    pub days: &'static str,
    /// Day heading within a section
    pub day_name: &'static str,
    /// Series items within a day
    pub items: &'static str,
    /// Title cascade within an item
    pub item_title: &'static [Strategy],
    /// Countdown/release timer within an item
    pub timer: &'static [Strategy],
    /// Episode label within an item
    pub episode_label: &'static [Strategy],
    /// English-to-localized day name table
    pub day_translations: &'static [(&'static str, &'static str)],
    /// Whether timer phrases are localized too
    pub localize_timer: bool,
}

/// Selector table for search result cards
#[derive(Debug, Clone, Copy)]
pub struct SearchRules {
    /// Result cards
    pub items: &'static str,
    /// Title cascade within a card
    pub title: &'static [Strategy],
    /// Thumbnail cascade within a card
    pub image: &'static [Strategy],
    /// Media-type badge cascade within a card
    pub media_type: &'static [Strategy],
    /// Score badge cascade within a card
    pub score: &'static [Strategy],
    /// Season badge cascade within a card
    pub season: &'static [Strategy],
}

/// Full layout description for one source family
#[derive(Debug, Clone, Copy)]
pub struct SourceProfile {
    /// Profile identifier used in logs
    pub name: &'static str,
    /// Regex capturing the series slug from an href
    pub slug_pattern: &'static str,
    /// Regex capturing the episode slug from an href
    pub episode_slug_pattern: &'static str,
    /// Series/page title cascade
    pub title: &'static [Strategy],
    /// Regex for decorative title suffixes to strip
    pub title_suffix: &'static str,
    /// Alternative-titles cascade
    pub alternative_titles: &'static [Strategy],
    /// Poster image cascade
    pub image: &'static [Strategy],
    /// Synopsis cascade
    pub synopsis: &'static [Strategy],
    /// Score cascade
    pub score: &'static [Strategy],
    /// Regex scanned over the page text when the score cascade is empty
    pub score_scan: &'static str,
    /// Selector for `key: value` info lines
    pub info: &'static str,
    /// Info key alias table, lowercased keys
    pub key_aliases: &'static [(&'static str, &'static str)],
    /// Selector for genre anchors
    pub genres: &'static str,
    /// Episode list items on a series page
    pub episode_items: &'static str,
    /// Episode-number field cascade; empty result switches to text inference
    pub episode_number: &'static [Strategy],
    /// Episode-title field cascade
    pub episode_title: &'static [Strategy],
    /// Episode-date field cascade
    pub episode_date: &'static [Strategy],
    /// Movie numbering policy
    pub numbering: MovieNumbering,
    /// Player resolution hosts
    pub resolver: ResolverConfig,
    /// Download markup
    pub downloads: DownloadRules,
    /// Listing markup
    pub listing: ListingRules,
    /// Schedule markup
    pub schedule: ScheduleRules,
    /// Search markup
    pub search: SearchRules,
    /// Prev/next navigation anchors on an episode page
    pub nav_anchors: &'static str,
    /// Breadcrumb items on an episode page, series crumb second
    pub breadcrumb_items: &'static str,
    /// Anchors pointing at a series page, for parent-slug recovery
    pub series_anchors: &'static str,
}

const ID_DAYS: &[(&str, &str)] = &[
    ("monday", "Senin"),
    ("tuesday", "Selasa"),
    ("wednesday", "Rabu"),
    ("thursday", "Kamis"),
    ("friday", "Jumat"),
    ("saturday", "Sabtu"),
    ("sunday", "Minggu"),
];

const THEMESIA_TITLE: &[Strategy] = &[
    Strategy::text("h1.entry-title"),
    Strategy::text(".infox h1"),
    Strategy::text("h1"),
];
const THEMESIA_ALT_TITLES: &[Strategy] = &[
    Strategy::text(".alter"),
    Strategy::text(".infox .alter"),
];
const THEMESIA_IMAGE: &[Strategy] = &[
    Strategy::attr_or(".thumb img", "src", "data-src"),
    Strategy::attr_or(".thumbook img", "src", "data-src"),
];
const THEMESIA_SYNOPSIS: &[Strategy] = &[
    Strategy::text(".entry-content[itemprop=\"description\"]"),
    Strategy::text(".synp .entry-content"),
    Strategy::text(".desc"),
];
const THEMESIA_SCORE: &[Strategy] = &[
    Strategy::text(".rating .num"),
    Strategy::text(".numscore"),
];
const THEMESIA_EP_NUMBER: &[Strategy] = &[Strategy::text(".epl-num")];
const THEMESIA_EP_TITLE: &[Strategy] = &[Strategy::text(".epl-title")];
const THEMESIA_EP_DATE: &[Strategy] = &[Strategy::text(".epl-date")];
const THEMESIA_CARD_TITLE: &[Strategy] = &[
    Strategy::text(".tt"),
    Strategy::attr("a", "title"),
];
const THEMESIA_CARD_IMAGE: &[Strategy] = &[Strategy::attr_or("img", "src", "data-src")];
const THEMESIA_CARD_TYPE: &[Strategy] = &[
    Strategy::text(".typez"),
    Strategy::text(".type"),
];
const THEMESIA_CARD_SCORE: &[Strategy] = &[
    Strategy::text(".numscore"),
    Strategy::text(".score"),
];
const THEMESIA_CARD_SEASON: &[Strategy] = &[Strategy::text(".season")];
const THEMESIA_TIMER: &[Strategy] = &[
    Strategy::text(".epx"),
    Strategy::text(".timer"),
];
const THEMESIA_EP_LABEL: &[Strategy] = &[
    Strategy::text(".sb"),
    Strategy::text(".bt .epx"),
];

const CLASSIC_TITLE: &[Strategy] = &[
    Strategy::text(".jdlrx h1"),
    Strategy::text(".posttl"),
    Strategy::text("h1"),
];
const CLASSIC_IMAGE: &[Strategy] = &[
    Strategy::attr_or(".fotoanime img", "src", "data-src"),
    Strategy::attr_or(".cukder img", "src", "data-src"),
];
const CLASSIC_SYNOPSIS: &[Strategy] = &[
    Strategy::text(".sinopc"),
    Strategy::text(".deskripsi"),
];
const CLASSIC_EP_TITLE: &[Strategy] = &[Strategy::text("a")];
const CLASSIC_EP_DATE: &[Strategy] = &[Strategy::text(".zeebr")];
const CLASSIC_ITEM_TITLE: &[Strategy] = &[Strategy::text("a")];
const CLASSIC_CARD_TITLE: &[Strategy] = &[Strategy::text("h2 a")];
const CLASSIC_CARD_IMAGE: &[Strategy] = &[Strategy::attr_or("img", "src", "data-src")];

/// Profile for the Themesia-style layouts (donghua sites)
pub const fn themesia() -> SourceProfile {
    SourceProfile {
        name: "themesia",
        slug_pattern: r"/anime/([^/?#]+)",
        episode_slug_pattern: r"^https?://[^/]+/([^/?#]+)",
        title: THEMESIA_TITLE,
        title_suffix: r"(?i)\s+(?:subtitle\s+indonesia|sub\s+indo)\s*$",
        alternative_titles: THEMESIA_ALT_TITLES,
        image: THEMESIA_IMAGE,
        synopsis: THEMESIA_SYNOPSIS,
        score: THEMESIA_SCORE,
        score_scan: r"(?i)rating\s+(\d+\.\d+)",
        info: ".info-content .spe span, .spe span",
        key_aliases: &[
            ("dirilis", "released"),
            ("diposting oleh", "posted by"),
            ("diperbarui pada", "updated on"),
        ],
        genres: ".genxed a, .genre-info a",
        episode_items: ".eplister ul li",
        episode_number: THEMESIA_EP_NUMBER,
        episode_title: THEMESIA_EP_TITLE,
        episode_date: THEMESIA_EP_DATE,
        numbering: MovieNumbering::Marker,
        resolver: ResolverConfig {
            player_base: "https://anichin.cloud/player",
            token_domains: &["anichin.click", "anichin.club", "anichin.watch"],
            embed_domains: &["ok.ru", "odnoklassniki.ru"],
        },
        downloads: DownloadRules {
            groups: ".soraddlx .soraurlx",
            quality: "strong",
            size: None,
            link: "a",
            fallback_anchors:
                ".mctnx a, .bixbox a[href*=\"drive\"], .bixbox a[href*=\"mega\"], .entry-content a[href*=\"://\"]",
            batch_containers: ".bixbox .soraddlx",
            batch_title: ".sorattlx h3",
        },
        listing: ListingRules {
            blocks: ".blix",
            entries: "ul li a",
            page_numbers: ".hpage .page-numbers, .pagination .page-numbers",
        },
        schedule: ScheduleRules {
            days: ".bixbox.schedulepage",
            day_name: ".releases h3",
            items: ".bs",
            item_title: THEMESIA_CARD_TITLE,
            timer: THEMESIA_TIMER,
            episode_label: THEMESIA_EP_LABEL,
            day_translations: ID_DAYS,
            localize_timer: true,
        },
        search: SearchRules {
            items: ".listupd .bs, .bixbox .bs",
            title: THEMESIA_CARD_TITLE,
            image: THEMESIA_CARD_IMAGE,
            media_type: THEMESIA_CARD_TYPE,
            score: THEMESIA_CARD_SCORE,
            season: THEMESIA_CARD_SEASON,
        },
        nav_anchors: ".naveps a, .nvs a",
        breadcrumb_items: ".ts-breadcrumb [itemtype=\"http://schema.org/ListItem\"]",
        series_anchors: "a[href*=\"/anime/\"]",
    }
}

/// Profile for the classic layout (otakudesu-style sites)
pub const fn classic() -> SourceProfile {
    SourceProfile {
        name: "classic",
        slug_pattern: r"/anime/([^/?#]+)",
        episode_slug_pattern: r"^https?://[^/]+/([^/?#]+)",
        title: CLASSIC_TITLE,
        title_suffix: r"(?i)\s+(?:subtitle\s+indonesia|sub\s+indo)\s*$",
        alternative_titles: &[],
        image: CLASSIC_IMAGE,
        synopsis: CLASSIC_SYNOPSIS,
        score: &[],
        score_scan: r"(?i)skor\s*:\s*(\d+(?:\.\d+)?)",
        info: ".infozingle p",
        key_aliases: &[
            ("judul", "title"),
            ("japanese", "alternativeTitles"),
            ("skor", "score"),
            ("produser", "producers"),
            ("tipe", "type"),
            ("status", "status"),
            ("total episode", "totalEpisodes"),
            ("durasi", "duration"),
            ("tanggal rilis", "released"),
            ("studio", "studio"),
            ("genre", "genres"),
        ],
        genres: ".infozingle p a[href*=\"genre\"]",
        episode_items: ".episodelist ul li",
        episode_number: &[],
        episode_title: CLASSIC_EP_TITLE,
        episode_date: CLASSIC_EP_DATE,
        numbering: MovieNumbering::Numeric,
        resolver: ResolverConfig {
            player_base: "https://anichin.cloud/player",
            token_domains: &["anichin.click", "anichin.club", "anichin.watch"],
            embed_domains: &["ok.ru", "odnoklassniki.ru"],
        },
        downloads: DownloadRules {
            groups: ".download ul li",
            quality: "strong",
            size: Some("i"),
            link: "a",
            fallback_anchors: ".download a, .venutama a[href*=\"://\"]",
            batch_containers: ".batchlink",
            batch_title: "h4",
        },
        listing: ListingRules {
            blocks: ".daftarkartun",
            entries: "ul li a",
            page_numbers: ".pagination .page-numbers",
        },
        schedule: ScheduleRules {
            days: ".kglist321",
            day_name: "h2",
            items: "ul li",
            item_title: CLASSIC_ITEM_TITLE,
            timer: &[],
            episode_label: &[],
            day_translations: ID_DAYS,
            localize_timer: false,
        },
        search: SearchRules {
            items: ".chivsrc li",
            title: CLASSIC_CARD_TITLE,
            image: CLASSIC_CARD_IMAGE,
            media_type: &[],
            score: &[],
            season: &[],
        },
        nav_anchors: ".flir a",
        breadcrumb_items: ".breadcrumbs [itemtype=\"http://schema.org/ListItem\"]",
        series_anchors: "a[href*=\"/anime/\"]",
    }
}
