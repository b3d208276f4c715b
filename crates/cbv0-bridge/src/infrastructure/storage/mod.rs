//! Storage infrastructure: the TOML configuration file.
//!
//! Reading, writing, and defaulting of [`config::AppConfig`] live here so the
//! rest of the bridge only ever sees typed settings.

pub mod config;
