//! Configuration for the `scanfmt` tool.
//!
//! [`config::load_config`] layers built-in defaults, an optional
//! `scanfmt.yaml` and `SCANFMT_*` environment variables into a
//! [`config::ScanConfig`]. [`discovery`] finds the file.

pub mod config;
pub mod discovery;

pub use config::{ConfigError, LogConfig, ScanConfig, load_config, save_config};
pub use discovery::{CONFIG_FILE_NAME, find_config_file};
