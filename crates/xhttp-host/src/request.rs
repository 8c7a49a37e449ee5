//! Outbound request assembly.
//!
//! Turns the already-validated URL and method plus the guest's raw header
//! block and body into an [`OutboundRequest`]. Content headers travel with
//! the body and are dropped when there is no body. Every other header is a
//! message header whose value is split on `;` into separate values, except
//! `Cookie` and `User-Agent`, which keep theirs whole.

use http::header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::error::{HttpError, HttpResult};
use crate::headers::{self, VALUE_SEPARATOR};

/// Content type applied to a body that does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A fully validated request, ready for the transport.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    /// Message headers.
    pub headers: HeaderMap,
    /// Headers describing the body (`content-*`).
    pub content_headers: HeaderMap,
    pub body: Vec<u8>,
}

impl OutboundRequest {
    /// Assemble a request from a raw `Name:Value` header block.
    pub fn build(method: Method, url: Url, header_block: &str, body: Vec<u8>) -> HttpResult<Self> {
        let mut headers = HeaderMap::new();
        let mut content_headers = HeaderMap::new();

        for (name, value) in headers::parse_request_headers(header_block)? {
            let header_name = parse_name(&name)?;
            if headers::is_content_header(&name) {
                tracing::debug!(name = %name, "adding content header");
                content_headers.insert(header_name, parse_value(&name, &value)?);
            } else if keeps_separator(&header_name) {
                headers.insert(header_name, parse_value(&name, &value)?);
            } else {
                for part in value.split(VALUE_SEPARATOR) {
                    headers.append(header_name.clone(), parse_value(&name, part.trim())?);
                }
            }
        }

        if body.is_empty() {
            // Without a body there is nothing for content headers to describe.
            for name in content_headers.keys() {
                tracing::debug!(name = %name, "dropping content header, request has no body");
            }
            content_headers.clear();
        } else {
            // Framing always comes from the real body length.
            if content_headers.remove(CONTENT_LENGTH).is_some() {
                tracing::debug!("dropping guest-supplied content-length");
            }
            if !content_headers.contains_key(CONTENT_TYPE) {
                content_headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            }
        }

        tracing::debug!(
            method = %method,
            url = %url,
            headers = headers.len(),
            content_headers = content_headers.len(),
            body_len = body.len(),
            "built outbound request"
        );

        Ok(Self {
            method,
            url,
            headers,
            content_headers,
            body,
        })
    }

    /// Message and content headers merged, as they go on the wire.
    pub fn wire_headers(&self) -> HeaderMap {
        let mut merged = self.headers.clone();
        for (name, value) in &self.content_headers {
            merged.append(name.clone(), value.clone());
        }
        merged
    }
}

/// Headers whose own grammar uses `;`. They go out as one line, unsplit.
fn keeps_separator(name: &HeaderName) -> bool {
    *name == COOKIE || *name == USER_AGENT
}

fn parse_name(name: &str) -> HttpResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        tracing::debug!(name = %name, error = %e, "rejected header name");
        HttpError::InvalidEncoding(format!("header name {name:?}: {e}"))
    })
}

fn parse_value(name: &str, value: &str) -> HttpResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        tracing::debug!(name = %name, error = %e, "rejected header value");
        HttpError::InvalidEncoding(format!("header {name:?} value: {e}"))
    })
}
