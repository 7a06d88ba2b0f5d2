//! Core pipeline orchestration for md2web.
//!
//! This crate ties discovery, route derivation and markdown rendering into
//! the end-to-end pipeline, and exposes it to hosts through the [`Md2Web`]
//! plugin adapter and the [`watch`](watch::watch) loop.

pub mod components;
mod output;
pub mod pipeline;
pub mod plugin;
pub mod route;
pub mod routes;
pub mod watch;

pub use pipeline::{ProgressReporter, RunReport, SilentProgress, run_pipeline};
pub use plugin::{Md2Web, PLUGIN_NAME};
pub use route::RouteDescriptor;
