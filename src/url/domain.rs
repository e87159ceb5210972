use super::CanonicalUrl;

/// Returns true if both URLs live on the same host
///
/// Ports are ignored; `www.example.com` and `example.com` are different hosts.
pub fn same_host(a: &CanonicalUrl, b: &CanonicalUrl) -> bool {
    match (a.host(), b.host()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
