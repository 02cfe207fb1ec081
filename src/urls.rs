use crate::error::ScrapeError;
use url::Url;

/// Canonicalizes a page URL: keeps scheme, host, path and query, drops the fragment.
///
/// Only `http` and `https` URLs with a non-empty host are accepted.
pub fn normalize(url: &str) -> Result<String, ScrapeError> {
    let mut parsed =
        Url::parse(url.trim()).map_err(|e| ScrapeError::InvalidUrl(format!("{url}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidUrl(format!(
            "{url}: scheme must be http or https"
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ScrapeError::InvalidUrl(format!("{url}: missing host")));
    }

    parsed.set_fragment(None);
    Ok(parsed.to_string())
}

/// Resolves `relative` against `base` using standard URL joining rules.
///
/// Returns an empty string when `relative` is empty or cannot be resolved.
pub fn resolve_absolute(base: &str, relative: &str) -> String {
    let relative = relative.trim();
    if relative.is_empty() {
        return String::new();
    }

    match Url::parse(base) {
        Ok(base) => base
            .join(relative)
            .map(|u| u.to_string())
            .unwrap_or_default(),
        // Without a usable base only already-absolute references survive
        Err(_) => Url::parse(relative)
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}
