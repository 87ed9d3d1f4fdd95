/// URL normalization used as the duplicate grouping key
use crate::constants::INTERNAL_URL_PREFIXES;
use crate::error::{Error, Result};
use url::Url;

/// Normalize a URL for duplicate comparison
///
/// The key is the serialized origin (scheme, host and any non-default port)
/// followed by the path and the query string. The fragment is dropped, so
/// `https://x.com/p?q=1#a` and `https://x.com/p?q=1#b` share a key.
///
/// Opaque origins (e.g. `file:` and `data:` URLs) serialize as `null`, so
/// those URLs group by path and query alone.
pub fn normalize_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    let mut key = url.origin().ascii_serialization();
    key.push_str(url.path());

    // An empty query ("?") is dropped, matching location.search
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        key.push('?');
        key.push_str(query);
    }

    Ok(key)
}

/// Check if a URL points at a browser-internal page (chrome://, edge://)
pub fn is_internal_url(url: &str) -> bool {
    INTERNAL_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}
