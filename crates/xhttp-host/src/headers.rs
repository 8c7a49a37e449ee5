//! Header codec for the guest ABI.
//!
//! Headers cross the boundary as newline-separated text, one header per
//! line:
//!
//! ```text
//! Name:value
//! Accept:text/html;application/json
//! ```
//!
//! Everything after the first colon is the value. On the way out, multiple
//! values for one name are joined with `;`.

use http::{HeaderMap, HeaderValue};

use crate::error::{HttpError, HttpResult};

/// Separator used when joining multiple values of one header.
pub const VALUE_SEPARATOR: char = ';';

/// Headers whose names start with `content` belong to the body, not the message.
pub fn is_content_header(name: &str) -> bool {
    name.as_bytes()
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"content"))
}

/// Parse the guest's request header block into `(name, value)` pairs.
///
/// Blank lines are skipped. Name and value lose surrounding whitespace,
/// which is not part of an HTTP field value. A repeated name (compared
/// case-insensitively) replaces the earlier value in place.
pub fn parse_request_headers(block: &str) -> HttpResult<Vec<(String, String)>> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(HttpError::InvalidEncoding(format!(
                "header line without a colon: {line:?}"
            )));
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return Err(HttpError::InvalidEncoding(format!(
                "header line without a name: {line:?}"
            )));
        }

        tracing::debug!(name = %name, "adding request header");
        match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = value.to_string(),
            None => headers.push((name.to_string(), value.to_string())),
        }
    }

    Ok(headers)
}

/// Join every value of one header with `;`.
pub fn join_values<'a>(values: impl IntoIterator<Item = &'a HeaderValue>) -> String {
    let mut joined = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            joined.push(VALUE_SEPARATOR);
        }
        joined.push_str(&String::from_utf8_lossy(value.as_bytes()));
    }
    joined
}

/// Case-insensitive lookup returning the joined value, if the header is present.
pub fn lookup(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<&HeaderValue> = headers
        .iter()
        .filter(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(join_values(values))
    }
}

/// Encode several header maps, in order, as `Name:v1;v2` lines.
pub fn encode_lines(maps: &[&HeaderMap]) -> String {
    let mut out = String::new();
    for map in maps {
        for name in map.keys() {
            tracing::debug!(name = %name, "encoding response header");
            out.push_str(name.as_str());
            out.push(':');
            out.push_str(&join_values(map.get_all(name)));
            out.push('\n');
        }
    }
    out
}

/// Decode `Name:v1;v2` lines back into names with their value lists.
///
/// This is the grammar a guest applies to the `headers_get_all` buffer.
pub fn parse_lines(text: &str) -> HttpResult<Vec<(String, Vec<String>)>> {
    let mut headers = Vec::new();
    for line in text.lines().filter(|l| !l.is_empty()) {
        let (name, value) = line.split_once(':').ok_or_else(|| {
            HttpError::InvalidEncoding(format!("header line without a colon: {line:?}"))
        })?;
        let values = value.split(VALUE_SEPARATOR).map(str::to_string).collect();
        headers.push((name.to_string(), values));
    }
    Ok(headers)
}
