//! Shared types, error model, and configuration for md2web.
//!
//! This crate is the foundation depended on by all other md2web crates.
//! It provides:
//! - [`Md2WebError`]: the unified error type
//! - Domain types ([`SourceFile`])
//! - Configuration ([`Md2WebConfig`], config loading)
//! - Lexical path helpers ([`path`])

pub mod config;
pub mod error;
pub mod path;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, Md2WebConfig, WatchConfig, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{GenerationTask, Md2WebError, Result, TaskFailure};
pub use types::SourceFile;
