//! Embedded-player resolution and canonical URL rewriting
//!
//! Episode pages hide the real stream behind several layers: a direct iframe,
//! base64-encoded mirror payloads inside `<option>` values, a playback token
//! planted through cookie-setting scripts, and third-party embeds addressed
//! by numeric IDs. Resolution collects every candidate, decodes what it can,
//! and rewrites recognized URLs onto a single canonical player host. Nothing
//! here errors: an undecodable mirror keeps its slot with a null URL.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;

use crate::document::{element_attr, element_text, RawDocument};
use crate::models::VideoServerRef;

/// Host tables and the canonical player base for one source
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Base of the canonical player, without trailing slash
    pub player_base: &'static str,
    /// Domains whose URLs are rewritten using the playback token
    pub token_domains: &'static [&'static str],
    /// Third-party embed domains rewritten using the numeric video ID
    pub embed_domains: &'static [&'static str],
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            player_base: "https://anichin.cloud/player",
            token_domains: &["anichin.click", "anichin.club", "anichin.watch"],
            embed_domains: &["ok.ru", "odnoklassniki.ru"],
        }
    }
}

/// Outcome of resolving one episode page
#[derive(Debug, Clone, PartialEq)]
pub struct VideoResolution {
    /// Primary playback URL after rewriting, if any frame or mirror resolved
    pub primary_url: Option<String>,
    /// Every listed mirror in source order, unresolved ones with a null URL
    pub servers: Vec<VideoServerRef>,
}

/// Resolve the playback URL and mirror list of an episode page
pub fn resolve(doc: &RawDocument, cfg: &ResolverConfig) -> VideoResolution {
    let mut primary = direct_frame_url(doc);
    let mut servers = collect_mirrors(doc);

    if primary.is_none() {
        primary = servers.iter().find_map(|s| s.url.clone());
    }

    let token = find_playback_token(doc, cfg);
    let embed_id = primary
        .as_deref()
        .and_then(extract_embed_id)
        .or_else(|| {
            servers
                .iter()
                .filter_map(|s| s.url.as_deref())
                .find_map(extract_embed_id)
        });

    primary = primary.map(|url| rewrite(&url, token.as_deref(), embed_id.as_deref(), cfg));
    for server in &mut servers {
        if let Some(url) = server.url.take() {
            server.url = Some(rewrite(&url, token.as_deref(), embed_id.as_deref(), cfg));
        }
    }

    VideoResolution {
        primary_url: primary,
        servers,
    }
}

/// First playable frame on the page
///
/// Checks real frame elements first, then falls back to a raw src-attribute
/// scan for players injected through scripts the tree parser drops.
fn direct_frame_url(doc: &RawDocument) -> Option<String> {
    for el in doc.select_all("iframe, video source") {
        if let Some(src) = element_attr(el, "src") {
            return Some(src);
        }
    }

    Regex::new(r#"(?i)src=["'](https?://[^"']+)["']"#)
        .unwrap()
        .captures(&doc.outer_html())
        .map(|caps| caps[1].to_string())
}

/// Gather mirror entries in source order, decoding encoded payloads
fn collect_mirrors(doc: &RawDocument) -> Vec<VideoServerRef> {
    let mut servers = Vec::new();

    for option in doc.select_all("select.mirror option[value]") {
        let name = element_text(option);
        let value = element_attr(option, "value").unwrap_or_default();
        if name.is_empty() || name == "Select Video Server" || value.is_empty() {
            continue;
        }
        servers.push(VideoServerRef {
            name,
            url: decode_mirror_payload(&value),
        });
    }

    for item in doc.select_all(".mirrorstream ul.mirror li") {
        let name = element_text(item);
        if name.is_empty() {
            continue;
        }
        servers.push(VideoServerRef {
            url: element_attr(item, "data-frame"),
            name,
        });
    }

    servers
}

/// Decode a base64 mirror payload into its embedded frame URL
///
/// The payload is an HTML fragment carrying an iframe; failure at any stage
/// (encoding, UTF-8, no src) yields `None` so sibling mirrors survive.
fn decode_mirror_payload(payload: &str) -> Option<String> {
    let bytes = match BASE64.decode(payload.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(%err, "mirror payload is not valid base64");
            return None;
        }
    };
    let fragment = match String::from_utf8(bytes) {
        Ok(fragment) => fragment,
        Err(err) => {
            tracing::debug!(%err, "mirror payload is not valid utf-8");
            return None;
        }
    };

    let patterns = [
        r#"(?i)src\s*=\s*["']([^"']+)["']"#,
        r#"(?i)<iframe[^>]+src=["']?([^"' >]+)"#,
    ];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(&fragment) {
            return Some(caps[1].to_string());
        }
    }

    tracing::debug!("decoded mirror payload carries no frame url");
    None
}

/// Find the playback token planted by the page's scripts
///
/// Strategies in priority order: cookie get/set calls, an HLS manifest path,
/// a cookie-shaped assignment inside any script, and finally a frame src on
/// a known token domain.
fn find_playback_token(doc: &RawDocument, cfg: &ResolverConfig) -> Option<String> {
    let html = doc.outer_html();

    let cookie_call = Regex::new(r#"(?i)Cookies\.(?:get|set)\s*\(\s*['"]([a-z0-9]{6,15})['"]"#)
        .unwrap();
    if let Some(caps) = cookie_call.captures(&html) {
        return Some(caps[1].to_string());
    }

    let hls_path = Regex::new(r"(?i)/hls/([a-z0-9]{6,15})\.m3u8").unwrap();
    if let Some(caps) = hls_path.captures(&html) {
        return Some(caps[1].to_string());
    }

    let cookie_assign =
        Regex::new(r#"(?i)cookie\s*[:=]\s*['"]([a-z0-9]{6,15})['"]"#).unwrap();
    for script in doc.select_all("script") {
        let body = script.inner_html();
        if let Some(caps) = cookie_assign.captures(&body) {
            return Some(caps[1].to_string());
        }
    }

    let frame_token = Regex::new(r"(?i)[/=]([a-z0-9]{6,15})(?:\.m3u8|[?&]|$)").unwrap();
    for el in doc.select_all("iframe, video source") {
        let Some(src) = element_attr(el, "src") else {
            continue;
        };
        if !cfg.token_domains.iter().any(|d| src.contains(d)) {
            continue;
        }
        if let Some(caps) = frame_token.captures(&src) {
            return Some(caps[1].to_string());
        }
    }

    None
}

/// Extract the numeric video ID from a third-party embed URL
fn extract_embed_id(url: &str) -> Option<String> {
    let patterns = [
        r"ok\.ru/videoembed/(\d+)",
        r"ok\.ru/video/(\d+)",
        r"odnoklassniki\.ru/videoembed/(\d+)",
    ];
    for pattern in patterns {
        if let Some(caps) = Regex::new(pattern).unwrap().captures(url) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Rewrite a URL onto the canonical player when its host is recognized
fn rewrite(url: &str, token: Option<&str>, embed_id: Option<&str>, cfg: &ResolverConfig) -> String {
    if let Some(token) = token {
        if cfg.token_domains.iter().any(|d| url.contains(d)) {
            return format!("{}/{}", cfg.player_base, token);
        }
    }
    if let Some(id) = embed_id {
        if cfg.embed_domains.iter().any(|d| url.contains(d)) {
            return format!("{}/{}", cfg.player_base, id);
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    use super::*;
    use crate::document::RawDocument;

    fn encode_mirror(url: &str) -> String {
        BASE64.encode(format!("<iframe src=\"{url}\"></iframe>"))
    }

    #[test]
    fn test_direct_iframe_is_primary() {
        let doc = RawDocument::parse(
            "<div class=\"player-embed\"><iframe src=\"https://cdn.example/embed/1\"></iframe></div>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.primary_url.unwrap(), "https://cdn.example/embed/1");
    }

    #[test]
    fn test_mirrors_preserve_order_and_count() {
        let html = format!(
            "<select class=\"mirror\">\
             <option value=\"\">Select Video Server</option>\
             <option value=\"{}\">Server A</option>\
             <option value=\"not base64 at all!!\">Server B</option>\
             <option value=\"{}\">Server C</option>\
             </select>",
            encode_mirror("https://a.example/v/1"),
            encode_mirror("https://c.example/v/3"),
        );
        let doc = RawDocument::parse(&html).unwrap();
        let out = resolve(&doc, &ResolverConfig::default());

        let names: Vec<&str> = out.servers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Server A", "Server B", "Server C"]);
        assert_eq!(out.servers[0].url.as_deref(), Some("https://a.example/v/1"));
        assert_eq!(out.servers[1].url, None);
        assert_eq!(out.servers[2].url.as_deref(), Some("https://c.example/v/3"));
    }

    #[test]
    fn test_primary_falls_back_to_first_resolved_mirror() {
        let html = format!(
            "<select class=\"mirror\">\
             <option value=\"!!!\">Broken</option>\
             <option value=\"{}\">Good</option>\
             </select>",
            encode_mirror("https://good.example/v"),
        );
        let doc = RawDocument::parse(&html).unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.primary_url.as_deref(), Some("https://good.example/v"));
    }

    #[test]
    fn test_decoded_payload_without_src_yields_null_url() {
        let html = format!(
            "<select class=\"mirror\">\
             <option value=\"{}\">No Frame</option>\
             <option value=\"{}\">Good</option>\
             </select>",
            BASE64.encode("<p>nothing playable here</p>"),
            encode_mirror("https://ok2.example/v"),
        );
        let doc = RawDocument::parse(&html).unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.servers[0].url, None);
        assert_eq!(out.servers[1].url.as_deref(), Some("https://ok2.example/v"));
    }

    #[test]
    fn test_data_frame_mirror_list() {
        let doc = RawDocument::parse(
            "<div class=\"mirrorstream\"><ul class=\"mirror\">\
             <li data-frame=\"https://m1.example/e\">Mirror 1</li>\
             <li>Unlinked</li>\
             </ul></div>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.servers.len(), 2);
        assert_eq!(out.servers[0].url.as_deref(), Some("https://m1.example/e"));
        assert_eq!(out.servers[1].url, None);
    }

    #[test]
    fn test_cookie_token_rewrites_token_domain_urls() {
        let html = format!(
            "<script>var t = Cookies.get('ab12cd34ef');</script>\
             <iframe src=\"https://anichin.club/stream?x=1\"></iframe>\
             <select class=\"mirror\"><option value=\"{}\">Alt</option></select>",
            encode_mirror("https://anichin.watch/v/abc"),
        );
        let doc = RawDocument::parse(&html).unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(
            out.primary_url.as_deref(),
            Some("https://anichin.cloud/player/ab12cd34ef")
        );
        assert_eq!(
            out.servers[0].url.as_deref(),
            Some("https://anichin.cloud/player/ab12cd34ef")
        );
    }

    #[test]
    fn test_hls_path_token_strategy() {
        let doc = RawDocument::parse(
            "<script>player.load(\"/hls/tok3n99.m3u8\");</script>\
             <iframe src=\"https://anichin.click/embed\"></iframe>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(
            out.primary_url.as_deref(),
            Some("https://anichin.cloud/player/tok3n99")
        );
    }

    #[test]
    fn test_embed_id_rewrites_third_party_urls() {
        let doc = RawDocument::parse(
            "<iframe src=\"https://ok.ru/videoembed/7421351708364\"></iframe>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(
            out.primary_url.as_deref(),
            Some("https://anichin.cloud/player/7421351708364")
        );
    }

    #[test]
    fn test_embed_id_from_video_path_shape() {
        assert_eq!(
            extract_embed_id("https://ok.ru/video/123456"),
            Some("123456".to_string())
        );
        assert_eq!(
            extract_embed_id("https://odnoklassniki.ru/videoembed/987"),
            Some("987".to_string())
        );
        assert_eq!(extract_embed_id("https://other.example/v/1"), None);
    }

    #[test]
    fn test_unrecognized_urls_pass_through_unchanged() {
        let doc = RawDocument::parse(
            "<script>Cookies.set('ab12cd34ef', 1);</script>\
             <iframe src=\"https://neutral.example/embed/5\"></iframe>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(
            out.primary_url.as_deref(),
            Some("https://neutral.example/embed/5")
        );
    }

    #[test]
    fn test_raw_src_scan_fallback() {
        // Frame injected by script, invisible to element selection
        let doc = RawDocument::parse(
            "<script>document.write('<iframe src=\"https://late.example/v\"></iframe>');</script>",
        )
        .unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.primary_url.as_deref(), Some("https://late.example/v"));
    }

    #[test]
    fn test_no_player_yields_none_without_error() {
        let doc = RawDocument::parse("<p>maintenance page</p>").unwrap();
        let out = resolve(&doc, &ResolverConfig::default());
        assert_eq!(out.primary_url, None);
        assert!(out.servers.is_empty());
    }
}
