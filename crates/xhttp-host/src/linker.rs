//! Registers the host operations with a core-module `wasmtime::Linker`.
//!
//! Each import resolves the caller's `memory` export, then hands the
//! handler a [`SliceMemory`] over it. A guest that does not export
//! `memory` gets `MemoryNotFound` from every call that needs it.

use wasmtime::{Caller, Extern, Linker, Memory};
use xhttp_core::{ErrorCode, MEMORY_NAME, MODULE_NAME};

use crate::handler::HttpRequestHandler;
use crate::memory::SliceMemory;

/// Projection from store data to the handler.
pub type HandlerProjection<T> = fn(&mut T) -> &HttpRequestHandler;

/// Define `req`, `header_get`, `headers_get_all`, `body_read` and `close`
/// under the `wasi_experimental_http` namespace.
pub fn add_to_linker<T: 'static>(
    linker: &mut Linker<T>,
    get: HandlerProjection<T>,
) -> anyhow::Result<()> {
    linker.func_wrap(
        MODULE_NAME,
        "req",
        move |mut caller: Caller<'_, T>,
              url_ptr: u32,
              url_len: u32,
              method_ptr: u32,
              method_len: u32,
              headers_ptr: u32,
              headers_len: u32,
              body_ptr: u32,
              body_len: u32,
              status_code_ptr: u32,
              handle_ptr: u32|
              -> u32 {
            let Some(memory) = guest_memory(&mut caller) else {
                return memory_not_found("req");
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            get(state).req(
                &mut SliceMemory::new(data),
                url_ptr,
                url_len,
                method_ptr,
                method_len,
                headers_ptr,
                headers_len,
                body_ptr,
                body_len,
                status_code_ptr,
                handle_ptr,
            )
        },
    )?;

    linker.func_wrap(
        MODULE_NAME,
        "header_get",
        move |mut caller: Caller<'_, T>,
              handle: u32,
              name_ptr: u32,
              name_len: u32,
              value_ptr: u32,
              value_len: u32,
              value_written_ptr: u32|
              -> u32 {
            let Some(memory) = guest_memory(&mut caller) else {
                return memory_not_found("header_get");
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            get(state).header_get(
                &mut SliceMemory::new(data),
                handle,
                name_ptr,
                name_len,
                value_ptr,
                value_len,
                value_written_ptr,
            )
        },
    )?;

    linker.func_wrap(
        MODULE_NAME,
        "headers_get_all",
        move |mut caller: Caller<'_, T>,
              handle: u32,
              buf_ptr: u32,
              buf_len: u32,
              buf_written_ptr: u32|
              -> u32 {
            let Some(memory) = guest_memory(&mut caller) else {
                return memory_not_found("headers_get_all");
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            get(state).headers_get_all(
                &mut SliceMemory::new(data),
                handle,
                buf_ptr,
                buf_len,
                buf_written_ptr,
            )
        },
    )?;

    linker.func_wrap(
        MODULE_NAME,
        "body_read",
        move |mut caller: Caller<'_, T>,
              handle: u32,
              buf_ptr: u32,
              buf_len: u32,
              buf_written_ptr: u32|
              -> u32 {
            let Some(memory) = guest_memory(&mut caller) else {
                return memory_not_found("body_read");
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            get(state).body_read(
                &mut SliceMemory::new(data),
                handle,
                buf_ptr,
                buf_len,
                buf_written_ptr,
            )
        },
    )?;

    // `close` touches no guest memory.
    linker.func_wrap(
        MODULE_NAME,
        "close",
        move |mut caller: Caller<'_, T>, handle: u32| -> u32 {
            get(caller.data_mut()).close(handle)
        },
    )?;

    tracing::debug!(module = MODULE_NAME, "registered http host functions");
    Ok(())
}

fn guest_memory<T>(caller: &mut Caller<'_, T>) -> Option<Memory> {
    caller.get_export(MEMORY_NAME).and_then(Extern::into_memory)
}

fn memory_not_found(op: &'static str) -> u32 {
    tracing::debug!(op, "guest does not export memory");
    ErrorCode::MemoryNotFound.into()
}
