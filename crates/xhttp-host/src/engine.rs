//! Top-level wiring for embedders.
//!
//! Creates a `wasmtime::Engine` for core modules and a `Linker<HostState>`
//! with the HTTP imports registered. `HostState` holds the per-instance
//! [`HttpRequestHandler`]; one store gets one handler, so the request
//! ceiling and handle numbering are per guest instance.
//!
//! This is also where the embedding-side bound on the request ceiling is
//! enforced: handlers themselves accept any ceiling.

use std::sync::Arc;

use wasmtime::{Config, Engine, Linker};
use xhttp_core::MAX_HTTP_REQUEST_LIMIT;

use crate::config::HandlerConfig;
use crate::handler::HttpRequestHandler;
use crate::linker;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Per-instance host state.
pub struct HostState {
    pub http: HttpRequestHandler,
}

fn http_handler(state: &mut HostState) -> &HttpRequestHandler {
    &state.http
}

/// Configures Wasmtime and owns the shared linker.
///
/// `HttpEngine` is cheap to clone (holds `Arc` references internally).
#[derive(Clone)]
pub struct HttpEngine {
    engine: Engine,
    linker: Arc<Linker<HostState>>,
}

impl HttpEngine {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::new();
        let engine = Engine::new(&config)?;
        let mut linker = Linker::new(&engine);

        linker::add_to_linker(&mut linker, http_handler)?;

        tracing::info!("xhttp engine initialized");

        Ok(Self {
            engine,
            linker: Arc::new(linker),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn linker(&self) -> &Linker<HostState> {
        &self.linker
    }

    /// Build a `HostState` around a caller-supplied transport.
    pub fn build_host_state(
        &self,
        config: &HandlerConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> anyhow::Result<HostState> {
        anyhow::ensure!(
            config.max_requests <= MAX_HTTP_REQUEST_LIMIT,
            "max_requests {} exceeds the maximum of {MAX_HTTP_REQUEST_LIMIT}",
            config.max_requests
        );
        Ok(HostState {
            http: HttpRequestHandler::from_config(config, transport),
        })
    }

    /// Build a `HostState` backed by [`ReqwestTransport`].
    ///
    /// Must be called from within a multi-thread tokio runtime.
    pub fn build_default_host_state(&self, config: &HandlerConfig) -> anyhow::Result<HostState> {
        let runtime_handle = tokio::runtime::Handle::try_current()?;
        let transport = ReqwestTransport::new(runtime_handle, config.timeout)?;
        self.build_host_state(config, Arc::new(transport))
    }
}
