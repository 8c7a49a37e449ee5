//! Wasmtime host functions for guest-initiated HTTP.
//!
//! Exposes the `wasi_experimental_http` import namespace to core Wasm guests.
//! Every function takes pointer/length pairs into guest linear memory and
//! returns a closed numeric status code:
//! - **memory**: Bounds-checked reads and writes against guest memory
//! - **allow_list**: Destination host and method validation
//! - **headers**: `Name:v1;v2` line codec and header lookup
//! - **request**: Outbound request assembly from guest-supplied parts
//! - **transport**: Pluggable HTTP transport (reqwest by default)
//! - **response**: Open responses with forward-only body cursors
//! - **registry**: Handle table with a lifetime request ceiling
//! - **error**: Typed failure categories and their ABI codes
//! - **handler**: The five host operations
//! - **linker**: Registration of the operations with a `wasmtime::Linker`
//! - **config**: Handler configuration from `xhttp-core` config
//! - **engine**: Top-level HttpEngine that wires everything together

pub mod allow_list;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod headers;
pub mod linker;
pub mod memory;
pub mod registry;
pub mod request;
pub mod response;
pub mod transport;

pub use error::{HttpError, HttpResult};
pub use handler::HttpRequestHandler;
pub use xhttp_core::ErrorCode;
