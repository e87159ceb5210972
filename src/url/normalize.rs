use super::CanonicalUrl;
use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into its canonical form
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse the URL, resolving it against `base` when one is given
/// 3. Reject anything that is not `http` or `https`, or has no host
/// 4. Lowercase the scheme and host (the parser does this for http(s))
/// 5. Remove trailing slashes from the path (root `/` is kept)
/// 6. Remove the fragment
///
/// The query string is left exactly as written.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize, absolute or relative
/// * `base` - The URL relative references are resolved against
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or the scheme is not supported
///
/// # Examples
///
/// ```
/// use kb_harvest::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM/blog/post/#comments", None).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog/post");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> UrlResult<CanonicalUrl> {
    let raw = raw.trim();

    let mut url = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    let path = strip_trailing_slashes(url.path()).to_string();
    url.set_path(&path);

    url.set_fragment(None);

    Ok(CanonicalUrl(url))
}

/// Removes trailing slashes, keeping the root path intact
///
/// Every trailing slash is removed, not just the last one.
fn strip_trailing_slashes(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
