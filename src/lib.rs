//! Normalization and reference-resolution engine for episodic-video metadata
//!
//! Raw HTML from several site families goes in; canonical JSON-serializable
//! records come out. The pipeline is synchronous and stateless: parse the
//! document once, run the profile-driven extractors, assemble a record.
//!
//! ```
//! use anime_normalizer::{assemble, document::RawDocument, sources};
//!
//! let html = "<h1 class=\"entry-title\">Show Episode 4 Subtitle Indonesia</h1>";
//! let doc = RawDocument::parse(html).unwrap();
//! let record = assemble::episode(&doc, "show-episode-4", &sources::themesia());
//! assert_eq!(record.number, "4");
//! ```

pub mod assemble;
pub mod constants;
pub mod document;
pub mod download;
pub mod episode;
pub mod error;
pub mod extract;
pub mod listing;
pub mod models;
pub mod sources;
pub mod video;

pub use document::RawDocument;
pub use error::{EngineError, EngineResult};
pub use models::{
    BatchDownload, DownloadGroup, DownloadLink, EpisodeDescriptor, EpisodeRecord, ListingEntry,
    ListingIndex, Pagination, ScheduleDay, ScheduleEntry, SearchHit, SearchResultPage,
    SeriesEpisode, SeriesRecord, VideoServerRef,
};
pub use sources::SourceProfile;
