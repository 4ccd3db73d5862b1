use url::Url;

/// True when both URLs parse and point at the same host and port.
pub fn is_same_domain(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a.host_str() == b.host_str() && a.port() == b.port(),
        _ => false,
    }
}

/// Reduces a cited URL to the site it most likely belongs to.
///
/// Query and fragment are dropped, paths nested deeper than two segments
/// collapse to the site root, and the result ends in exactly one `/`.
/// Only absolute URLs are normalized; relative or otherwise unparseable
/// input is returned as-is.
pub fn normalize_to_feed_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    url.set_fragment(None);
    url.set_query(None);
    if url.path().matches('/').count() > 2 {
        url.set_path("/");
    }
    let rendered = url.as_str();
    format!("{}/", rendered.strip_suffix('/').unwrap_or(rendered))
}
