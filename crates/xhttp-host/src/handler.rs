//! The five `wasi_experimental_http` host operations.
//!
//! Each public method is one guest import. It takes only `u32` offsets and
//! lengths into guest memory, writes every output back into that memory,
//! and returns a status code. Internals return [`HttpResult`]; the status
//! is assigned once, on the way out, by [`crate::error::to_status`]. A panic
//! inside an operation is caught and reported as `RuntimeError`.
//!
//! # Request flow
//!
//! ```text
//! Guest calls req(url, method, headers, body)
//!   → AllowList validates host and method
//!   → OutboundRequest::build parses headers, splits content headers
//!   → HttpTransport::send blocks until the response is buffered
//!   → ResponseRegistry::register issues the next handle
//!   → status code + handle written to guest memory
//!
//! Guest calls header_get / headers_get_all / body_read(handle, ...)
//!   → bytes copied into the guest buffer, bounded by its declared capacity
//!
//! Guest calls close(handle)
//!   → response removed from the registry and dropped
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use xhttp_core::ErrorCode;

use crate::allow_list::{self, AllowList};
use crate::config::HandlerConfig;
use crate::error::{self, HttpResult};
use crate::memory::GuestMemory;
use crate::registry::ResponseRegistry;
use crate::request::OutboundRequest;
use crate::response::Response;
use crate::transport::HttpTransport;

/// Per-instance host state for the HTTP imports.
///
/// Owns the transport for its whole lifetime. Every response it hands out
/// is owned by the registry and released on `close` or when the handler
/// is dropped.
pub struct HttpRequestHandler {
    transport: Arc<dyn HttpTransport>,
    allow_list: AllowList,
    registry: ResponseRegistry,
}

impl HttpRequestHandler {
    pub fn new(transport: Arc<dyn HttpTransport>, allow_list: AllowList, max_requests: u32) -> Self {
        tracing::debug!(
            restricted = allow_list.is_restricted(),
            max_requests,
            "http request handler created"
        );
        Self {
            transport,
            allow_list,
            registry: ResponseRegistry::new(max_requests),
        }
    }

    pub fn from_config(config: &HandlerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let allow_list = AllowList::from_option(config.allowed_hosts.as_deref());
        Self::new(transport, allow_list, config.max_requests)
    }

    pub fn registry(&self) -> &ResponseRegistry {
        &self.registry
    }

    /// `req`: send a request, then write its HTTP status and a new handle.
    #[allow(clippy::too_many_arguments)]
    pub fn req(
        &self,
        memory: &mut impl GuestMemory,
        url_ptr: u32,
        url_len: u32,
        method_ptr: u32,
        method_len: u32,
        headers_ptr: u32,
        headers_len: u32,
        body_ptr: u32,
        body_len: u32,
        status_code_ptr: u32,
        handle_ptr: u32,
    ) -> u32 {
        tracing::debug!("host call: req");
        guard("req", || {
            let url = memory.read_str(url_ptr, url_len, "url")?;
            let url = self.allow_list.validate_url(url)?;
            let method = memory.read_str(method_ptr, method_len, "method")?;
            let method = allow_list::validate_method(method)?;
            let header_block = memory.read_str(headers_ptr, headers_len, "headers")?;
            let body = memory.read_bytes(body_ptr, body_len)?.to_vec();
            let request = OutboundRequest::build(method, url, header_block, body)?;

            let response = self.transport.send(request).inspect_err(|e| {
                tracing::debug!(error = %e, "transport failed");
            })?;
            let status = u32::from(response.status);
            let handle = self.registry.register(Response::from_transport(response))?;

            let written = memory
                .write_u32(status_code_ptr, status)
                .and_then(|()| memory.write_u32(handle_ptr, handle));
            if let Err(e) = written {
                // The guest never learns this handle, so it cannot close it.
                let _ = self.registry.close(handle);
                return Err(e);
            }

            tracing::debug!(handle = handle, status = status, "req created handle");
            Ok(())
        })
    }

    /// `header_get`: copy one header value, `;`-joined, into the guest buffer.
    ///
    /// A header the response does not carry yields an empty value and success.
    #[allow(clippy::too_many_arguments)]
    pub fn header_get(
        &self,
        memory: &mut impl GuestMemory,
        handle: u32,
        name_ptr: u32,
        name_len: u32,
        value_ptr: u32,
        value_len: u32,
        value_written_ptr: u32,
    ) -> u32 {
        tracing::debug!(handle = handle, "host call: header_get");
        guard("header_get", || {
            let name = memory.read_str(name_ptr, name_len, "header name")?;
            let value = self.registry.with_response(handle, |r| Ok(r.header(name)))?;
            let value = value.unwrap_or_else(|| {
                tracing::debug!(handle = handle, name = %name, "header not present");
                String::new()
            });

            memory.write_bytes(value_ptr, value_len, value.as_bytes())?;
            memory.write_u32(value_written_ptr, value.len() as u32)
        })
    }

    /// `headers_get_all`: copy every header as `Name:v1;v2` lines into the guest buffer.
    pub fn headers_get_all(
        &self,
        memory: &mut impl GuestMemory,
        handle: u32,
        buf_ptr: u32,
        buf_len: u32,
        buf_written_ptr: u32,
    ) -> u32 {
        tracing::debug!(handle = handle, "host call: headers_get_all");
        guard("headers_get_all", || {
            let encoded = self.registry.with_response(handle, |r| Ok(r.encode_headers()))?;
            memory.write_bytes(buf_ptr, buf_len, encoded.as_bytes())?;
            memory.write_u32(buf_written_ptr, encoded.len() as u32)
        })
    }

    /// `body_read`: copy the next chunk of the body and advance the cursor.
    pub fn body_read(
        &self,
        memory: &mut impl GuestMemory,
        handle: u32,
        buf_ptr: u32,
        buf_len: u32,
        buf_written_ptr: u32,
    ) -> u32 {
        tracing::debug!(handle = handle, "host call: body_read");
        guard("body_read", || {
            let n = self.registry.with_response(handle, |r| {
                let n = r.remaining().min(buf_len as usize);
                memory.write_bytes(buf_ptr, buf_len, &r.unread()[..n])?;
                r.consume(n);
                Ok(n)
            })?;
            memory.write_u32(buf_written_ptr, n as u32)?;
            tracing::debug!(handle = handle, bytes = n, "read response body");
            Ok(())
        })
    }

    /// `close`: release the response behind `handle`.
    pub fn close(&self, handle: u32) -> u32 {
        tracing::debug!(handle = handle, "host call: close");
        guard("close", || self.registry.close(handle))
    }
}

fn guard(op: &'static str, f: impl FnOnce() -> HttpResult<()>) -> u32 {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => error::to_status(op, result),
        Err(_) => {
            tracing::error!(op, "host call panicked");
            ErrorCode::RuntimeError.into()
        }
    }
}
