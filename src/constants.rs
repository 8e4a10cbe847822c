//! URL builders for the upstream pages the fetch layer requests
//!
//! The engine itself never fetches; these helpers keep the path shapes in one
//! place so callers and tests agree on them.

/// Upstream page URL builders
pub mod endpoints {
    /// Home/latest-release page, paginated from page 2 upward
    pub fn home(base_url: &str, page: u32) -> String {
        if page <= 1 {
            format!("{base_url}/")
        } else {
            format!("{base_url}/page/{page}/")
        }
    }

    /// Search results for a query, paginated
    pub fn search(base_url: &str, query: &str, page: u32) -> String {
        let encoded = urlencoding::encode(query);
        if page <= 1 {
            format!("{base_url}/?s={encoded}")
        } else {
            format!("{base_url}/page/{page}/?s={encoded}")
        }
    }

    /// Series detail page
    pub fn series(base_url: &str, slug: &str) -> String {
        format!("{base_url}/anime/{slug}/")
    }

    /// Episode detail page
    pub fn episode(base_url: &str, slug: &str) -> String {
        format!("{base_url}/{slug}/")
    }

    /// Alphabetical listing page
    pub fn listing(base_url: &str) -> String {
        format!("{base_url}/a-z/")
    }

    /// Weekly schedule page
    pub fn schedule(base_url: &str) -> String {
        format!("{base_url}/jadwal-rilis/")
    }
}
