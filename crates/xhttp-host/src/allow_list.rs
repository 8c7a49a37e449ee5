//! Destination and method validation.
//!
//! The allow-list is fixed when the handler is built. An absent list means
//! every host is reachable; a present list (even an empty one) only admits
//! the hosts it names. Host and method comparison are ASCII
//! case-insensitive.

use http::Method;
use url::Url;
use xhttp_core::ALLOWED_METHODS;

use crate::error::{HttpError, HttpResult};

/// Immutable set of permitted destination hosts.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    /// Lower-cased hostnames, `None` when unrestricted.
    hosts: Option<Vec<String>>,
}

impl AllowList {
    pub fn unrestricted() -> Self {
        Self { hosts: None }
    }

    /// Build a restricted list.
    ///
    /// Entries may be bare hostnames (`api.example.com`) or absolute URLs
    /// (`https://api.example.com`), in which case only the host is kept.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = entries
            .into_iter()
            .filter_map(|entry| normalize_entry(entry.as_ref()))
            .collect();
        Self { hosts: Some(hosts) }
    }

    pub fn from_option<S: AsRef<str>>(entries: Option<&[S]>) -> Self {
        match entries {
            Some(entries) => Self::new(entries),
            None => Self::unrestricted(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.hosts.is_some()
    }

    pub fn permits(&self, host: &str) -> bool {
        match &self.hosts {
            None => true,
            Some(hosts) => hosts.iter().any(|h| h.eq_ignore_ascii_case(host)),
        }
    }

    /// Parse a guest-supplied URL and check its host against the list.
    pub fn validate_url(&self, raw: &str) -> HttpResult<Url> {
        if raw.is_empty() {
            tracing::debug!("request url is missing");
            return Err(HttpError::InvalidUrl(String::new()));
        }

        let url = Url::parse(raw).map_err(|e| {
            tracing::debug!(url = %raw, error = %e, "request url is invalid");
            HttpError::InvalidUrl(raw.to_string())
        })?;

        let Some(host) = url.host_str() else {
            tracing::debug!(url = %raw, "request url has no host");
            return Err(HttpError::InvalidUrl(raw.to_string()));
        };

        if !self.permits(host) {
            tracing::debug!(host = %host, "destination not in allow-list");
            return Err(HttpError::DestinationNotAllowed(host.to_string()));
        }

        Ok(url)
    }
}

fn normalize_entry(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    match Url::parse(entry) {
        Ok(url) if url.host_str().is_some() => url.host_str().map(str::to_ascii_lowercase),
        _ => Some(entry.to_ascii_lowercase()),
    }
}

/// Check a guest-supplied method against the fixed method set.
pub fn validate_method(raw: &str) -> HttpResult<Method> {
    if raw.is_empty() {
        tracing::debug!("request method is missing");
        return Err(HttpError::InvalidMethod(String::new()));
    }

    let Some(allowed) = ALLOWED_METHODS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(raw))
    else {
        tracing::debug!(method = %raw, "request method is not allowed");
        return Err(HttpError::InvalidMethod(raw.to_string()));
    };

    Method::from_bytes(allowed.as_bytes()).map_err(|_| HttpError::InvalidMethod(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hosts ─────────────────────────────────────────────────────────

    #[test]
    fn unrestricted_permits_any_host() {
        let list = AllowList::unrestricted();
        assert!(!list.is_restricted());
        assert!(list.validate_url("https://anything.example/path").is_ok());
    }

    #[test]
    fn host_comparison_ignores_case() {
        let list = AllowList::new(["Management.Azure.com"]);
        let url = list.validate_url("https://management.azure.com/").unwrap();
        assert_eq!(url.host_str(), Some("management.azure.com"));
    }

    #[test]
    fn url_entries_contribute_their_host() {
        let list = AllowList::new(["https://management.azure.com"]);
        assert!(list.permits("MANAGEMENT.AZURE.COM"));
        assert!(!list.permits("azure.com"));
    }

    #[test]
    fn absent_host_is_rejected() {
        let list = AllowList::new(["management.azure.com"]);
        let err = list.validate_url("https://evil.example/").unwrap_err();
        assert!(matches!(err, HttpError::DestinationNotAllowed(h) if h == "evil.example"));
    }

    #[test]
    fn empty_list_rejects_everything() {
        let list = AllowList::new(Vec::<String>::new());
        assert!(list.is_restricted());
        assert!(matches!(
            list.validate_url("https://a.example/"),
            Err(HttpError::DestinationNotAllowed(_))
        ));
    }

    #[test]
    fn from_option_none_is_unrestricted() {
        assert!(!AllowList::from_option::<String>(None).is_restricted());
        let hosts = vec!["a.example".to_string()];
        assert!(AllowList::from_option(Some(hosts.as_slice())).permits("a.example"));
    }

    // ── urls ──────────────────────────────────────────────────────────

    #[test]
    fn empty_url_is_invalid() {
        let err = AllowList::unrestricted().validate_url("").unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    #[test]
    fn relative_url_is_invalid() {
        let err = AllowList::unrestricted().validate_url("/just/a/path").unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    #[test]
    fn hostless_url_is_invalid() {
        let err = AllowList::unrestricted().validate_url("mailto:me@example.com").unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    // ── methods ───────────────────────────────────────────────────────

    #[test]
    fn every_allowed_method_passes_in_any_case() {
        for m in ALLOWED_METHODS {
            assert_eq!(validate_method(m).unwrap().as_str(), m);
            assert_eq!(validate_method(&m.to_lowercase()).unwrap().as_str(), m);
        }
        assert_eq!(validate_method("pAtCh").unwrap(), Method::PATCH);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(matches!(validate_method("CONNECT"), Err(HttpError::InvalidMethod(_))));
        assert!(matches!(validate_method("FETCH"), Err(HttpError::InvalidMethod(_))));
    }

    #[test]
    fn empty_method_is_rejected() {
        assert!(matches!(validate_method(""), Err(HttpError::InvalidMethod(_))));
    }
}
