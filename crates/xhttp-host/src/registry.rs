//! Response handle table.
//!
//! Handles are issued from an atomic counter starting at 1 and are never
//! reused. The ceiling bounds how many handles are ever issued over the
//! registry's lifetime, not how many are open at once. Closing a response
//! does not give its slot back.
//!
//! The map itself sits behind one `std::sync::Mutex`; each lock covers a
//! single map operation or one bounded copy out of a response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{HttpError, HttpResult};
use crate::response::Response;

pub struct ResponseRegistry {
    responses: Mutex<HashMap<u32, Response>>,
    /// Last handle issued (0 before the first request).
    last_handle: AtomicU32,
    max_requests: u32,
}

impl ResponseRegistry {
    pub fn new(max_requests: u32) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            last_handle: AtomicU32::new(0),
            max_requests,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Number of handles issued so far, including refused ones.
    pub fn issued(&self) -> u32 {
        self.last_handle.load(Ordering::SeqCst)
    }

    /// Number of responses currently open.
    pub fn open_count(&self) -> HttpResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Issue the next handle and take ownership of `response`.
    ///
    /// Past the ceiling the response is dropped and nothing is registered.
    pub fn register(&self, response: Response) -> HttpResult<u32> {
        let handle = self
            .last_handle
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        if handle > self.max_requests {
            tracing::debug!(
                handle = handle,
                limit = self.max_requests,
                "request limit reached, discarding response"
            );
            return Err(HttpError::TooManySessions {
                limit: self.max_requests,
            });
        }

        self.lock()?.insert(handle, response);
        tracing::debug!(handle = handle, "registered response");
        Ok(handle)
    }

    /// Run `f` against the response for `handle`.
    pub fn with_response<R>(
        &self,
        handle: u32,
        f: impl FnOnce(&mut Response) -> HttpResult<R>,
    ) -> HttpResult<R> {
        let mut responses = self.lock()?;
        let response = responses.get_mut(&handle).ok_or_else(|| {
            tracing::debug!(handle = handle, "unknown response handle");
            HttpError::InvalidHandle(handle)
        })?;
        f(response)
    }

    /// Remove and release the response for `handle`.
    pub fn close(&self, handle: u32) -> HttpResult<()> {
        match self.lock()?.remove(&handle) {
            Some(_) => {
                tracing::debug!(handle = handle, "closed response handle");
                Ok(())
            }
            None => {
                tracing::debug!(handle = handle, "close failed, invalid handle");
                Err(HttpError::InvalidHandle(handle))
            }
        }
    }

    fn lock(&self) -> HttpResult<MutexGuard<'_, HashMap<u32, Response>>> {
        self.responses
            .lock()
            .map_err(|_| HttpError::Runtime("response registry lock poisoned".to_string()))
    }
}

impl Drop for ResponseRegistry {
    fn drop(&mut self) {
        let responses = match self.responses.get_mut() {
            Ok(responses) => responses,
            Err(poisoned) => poisoned.into_inner(),
        };
        let open = responses.len();
        responses.clear();
        if open > 0 {
            tracing::debug!(open = open, "released open responses on teardown");
        }
    }
}
