pub mod config;
pub mod types;

pub use config::HttpConfig;
pub use types::*;
