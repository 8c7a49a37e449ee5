//! An open response held by the registry.

use http::HeaderMap;

use crate::headers;
use crate::transport::TransportResponse;

/// Status, split headers and a forward-only body cursor.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    content_headers: HeaderMap,
    body: Vec<u8>,
    /// Current read offset into `body`.
    position: usize,
}

impl Response {
    /// Split the transport's headers into message and content sets.
    pub fn from_transport(response: TransportResponse) -> Self {
        let mut headers = HeaderMap::new();
        let mut content_headers = HeaderMap::new();
        let mut current = None;
        for (name, value) in response.headers {
            // `name` is only yielded for the first value of each header.
            if let Some(name) = name {
                current = Some(name);
            }
            let Some(name) = current.clone() else {
                continue;
            };
            if headers::is_content_header(name.as_str()) {
                content_headers.append(name, value);
            } else {
                headers.append(name, value);
            }
        }

        Self {
            status: response.status,
            headers,
            content_headers,
            body: response.body,
            position: 0,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_headers(&self) -> &HeaderMap {
        &self.content_headers
    }

    /// Joined value of one header, searched in the set its name belongs to.
    pub fn header(&self, name: &str) -> Option<String> {
        let set = if headers::is_content_header(name) {
            &self.content_headers
        } else {
            &self.headers
        };
        headers::lookup(set, name)
    }

    /// Message headers followed by content headers as `Name:v1;v2` lines.
    pub fn encode_headers(&self) -> String {
        headers::encode_lines(&[&self.headers, &self.content_headers])
    }

    pub fn remaining(&self) -> usize {
        self.body.len() - self.position
    }

    /// The body bytes not yet read.
    pub fn unread(&self) -> &[u8] {
        &self.body[self.position..]
    }

    /// Advance the cursor by `n` bytes, stopping at the end of the body.
    pub fn consume(&mut self, n: usize) {
        self.position += n.min(self.remaining());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn response(body: &[u8]) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.append("vary", HeaderValue::from_static("origin"));
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.insert("content-length", HeaderValue::from_static("5"));
        Response::from_transport(TransportResponse {
            status: 201,
            headers,
            body: body.to_vec(),
        })
    }

    #[test]
    fn splits_content_headers() {
        let resp = response(b"hello");
        assert_eq!(resp.status(), 201);
        assert_eq!(resp.content_headers().len(), 2);
        assert_eq!(resp.headers().len(), 2);
        assert!(resp.headers().get("content-type").is_none());
    }

    #[test]
    fn header_lookup_uses_matching_set() {
        let resp = response(b"");
        assert_eq!(resp.header("Content-Type").as_deref(), Some("application/json"));
        assert_eq!(resp.header("VARY").as_deref(), Some("origin;accept"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn encode_puts_message_headers_first() {
        let encoded = response(b"").encode_headers();
        let first_content = encoded.find("content-").unwrap();
        assert!(encoded.find("vary:origin;accept").unwrap() < first_content);
    }

    #[test]
    fn consume_advances_cursor() {
        let mut resp = response(b"hello");
        assert_eq!(&resp.unread()[..2], b"he");
        resp.consume(2);
        assert_eq!(resp.remaining(), 3);
        assert_eq!(resp.unread(), b"llo");
        resp.consume(10);
        assert!(resp.unread().is_empty());
        assert_eq!(resp.remaining(), 0);
    }

    #[test]
    fn zero_length_consume_does_not_move() {
        let mut resp = response(b"abc");
        resp.consume(0);
        assert_eq!(resp.remaining(), 3);
    }
}
