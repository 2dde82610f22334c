//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what every command handler needs: the
//! effective configuration, where it came from, and the global flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use scan_config::{ScanConfig, find_config_file, load_config};
use scan_fieldset::LoadOptions;

use crate::cli::{DocumentArgs, GlobalArgs};

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Config file that was read, if any.
    pub config_path: Option<PathBuf>,

    /// Defaults, file and environment merged.
    pub config: ScanConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The config file is `--config` when given, otherwise discovered from the
    /// current directory.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => Some(path.clone()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| find_config_file(&cwd)),
        };

        let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("failed to load config from {}", path.display()),
            None => "failed to load config".to_string(),
        })?;

        Ok(Self {
            config_path,
            config,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }

    /// Load options for one document, with command-line overrides applied.
    pub fn load_options(&self, args: &DocumentArgs) -> LoadOptions {
        let mut options = self.config.load.clone();
        if args.strict_sub_fields {
            options.strict_sub_fields = true;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn context(config: ScanConfig) -> RuntimeContext {
        RuntimeContext {
            config_path: None,
            config,
            json: false,
            verbose: false,
            quiet: false,
        }
    }

    fn document_args(strict_sub_fields: bool) -> DocumentArgs {
        DocumentArgs {
            file: Path::new("scan.json").to_path_buf(),
            strict_sub_fields,
        }
    }

    #[test]
    fn flag_turns_on_strict_sub_fields() {
        let ctx = context(ScanConfig::default());
        assert!(!ctx.load_options(&document_args(false)).strict_sub_fields);
        assert!(ctx.load_options(&document_args(true)).strict_sub_fields);
    }

    #[test]
    fn config_value_survives_without_flag() {
        let mut config = ScanConfig::default();
        config.load.strict_sub_fields = true;
        config.load.canonical_field_order = false;
        let options = context(config).load_options(&document_args(false));
        assert!(options.strict_sub_fields);
        assert!(!options.canonical_field_order);
    }
}
