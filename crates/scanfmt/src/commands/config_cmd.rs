//! `scanfmt config` -- show or create the configuration file.

use anyhow::{Context, Result, bail};
use scan_config::{CONFIG_FILE_NAME, ScanConfig, save_config};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `scanfmt config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            if ctx.json {
                output_json(&ctx.config);
            } else {
                let yaml = serde_yaml::to_string(&ctx.config)
                    .context("failed to render configuration")?;
                print!("{yaml}");
            }
        }

        ConfigCommands::Path => {
            if ctx.json {
                output_json(&serde_json::json!({
                    "path": ctx.config_path.as_ref().map(|p| p.display().to_string()),
                }));
            } else {
                match &ctx.config_path {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No config file found (using defaults)"),
                }
            }
        }

        ConfigCommands::Init(init_args) => {
            let path = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(CONFIG_FILE_NAME);
            if path.exists() && !init_args.force {
                bail!(
                    "{} already exists\nHint: use --force to overwrite it",
                    path.display()
                );
            }
            save_config(&path, &ScanConfig::default())
                .with_context(|| format!("failed to write {}", path.display()))?;

            if ctx.json {
                output_json(&serde_json::json!({ "path": path.display().to_string() }));
            } else if !ctx.quiet {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}
