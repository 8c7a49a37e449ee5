//! Live network test against the real `ReqwestTransport`.
//!
//! Run with `cargo test -p xhttp-host --features integration`.
#![cfg(feature = "integration")]

use wasmtime::{Module, Store};

use xhttp_host::config::HandlerConfig;
use xhttp_host::engine::HttpEngine;

const WAT: &str = r#"
(module
  (import "wasi_experimental_http" "req"
    (func $req (param i32 i32 i32 i32 i32 i32 i32 i32 i32 i32) (result i32)))
  (import "wasi_experimental_http" "header_get"
    (func $header_get (param i32 i32 i32 i32 i32 i32) (result i32)))
  (import "wasi_experimental_http" "close"
    (func $close (param i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 1024) "https://management.azure.com/")
  (data (i32.const 1100) "GET")
  (data (i32.const 1200) "Content-Type")
  (func (export "run") (result i32)
    (local $rc i32)
    (local.set $rc
      (call $req (i32.const 1024) (i32.const 29) (i32.const 1100) (i32.const 3)
                 (i32.const 0) (i32.const 0) (i32.const 0) (i32.const 0)
                 (i32.const 16) (i32.const 20)))
    (if (local.get $rc) (then (return (local.get $rc))))
    (local.set $rc
      (call $header_get (i32.load (i32.const 20)) (i32.const 1200) (i32.const 12)
                        (i32.const 2048) (i32.const 256) (i32.const 24)))
    (if (local.get $rc) (then (return (local.get $rc))))
    (call $close (i32.load (i32.const 20))))
)
"#;

#[tokio::test(flavor = "multi_thread")]
async fn test_management_azure_returns_json_content_type() {
    let engine = HttpEngine::new().unwrap();
    let config = HandlerConfig::default().with_allowed_hosts(["management.azure.com"]);
    let state = engine.build_default_host_state(&config).unwrap();
    let module = Module::new(engine.engine(), wat::parse_str(WAT).unwrap()).unwrap();
    let mut store = Store::new(engine.engine(), state);
    let instance = engine.linker().instantiate(&mut store, &module).unwrap();

    let run = instance.get_typed_func::<(), u32>(&mut store, "run").unwrap();
    assert_eq!(run.call(&mut store, ()).unwrap(), 0);

    let memory = instance.get_memory(&mut store, "memory").unwrap();
    let data = memory.data(&store);
    let status = u32::from_le_bytes(data[16..20].try_into().unwrap());
    let written = u32::from_le_bytes(data[24..28].try_into().unwrap()) as usize;
    let content_type = std::str::from_utf8(&data[2048..2048 + written]).unwrap();

    assert!((100..600).contains(&status), "status {status}");
    assert!(content_type.starts_with("application/json"), "got {content_type}");
}
