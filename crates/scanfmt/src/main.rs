//! scanfmt -- load scan formulas into field sets and save them back.

mod cli;
mod commands;
mod context;
mod document;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

const VERBOSE_FILTER: &str = "scanfmt=debug,scan_fieldset=debug,scan_config=debug";

fn main() {
    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        init_logging(&ctx);
        match cli.command {
            Some(Commands::Fields(args)) => commands::fields::run(&ctx, &args),
            Some(Commands::Resave(args)) => commands::resave::run(&ctx, &args),
            Some(Commands::Check(args)) => commands::check::run(&ctx, &args),
            Some(Commands::Config(args)) => commands::config_cmd::run(&ctx, &args),
            None => {
                // No subcommand -- print help
                use clap::CommandFactory;
                Cli::command().print_help().ok();
                println!();
                Ok(())
            }
        }
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// `--verbose` turns on debug output for the scan crates; otherwise the
/// configured `log.filter` is used, and without one nothing is logged.
fn init_logging(ctx: &RuntimeContext) {
    let directives = if ctx.verbose {
        VERBOSE_FILTER.to_string()
    } else {
        match &ctx.config.log.filter {
            Some(filter) => filter.clone(),
            None => return,
        }
    };

    match EnvFilter::try_new(&directives) {
        Ok(filter) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        Err(e) => eprintln!("Warning: ignoring log filter '{}': {}", directives, e),
    }
}
