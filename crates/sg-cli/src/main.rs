use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sg_cli::commands::{check, generate};
use sg_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so `--output -` keeps stdout clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Generate {
            input,
            output,
            jsonl,
        }) => {
            let format = if *jsonl {
                generate::OutputFormat::JsonLines
            } else {
                generate::OutputFormat::Json
            };
            let expansion = generate::run(&config, input.as_deref(), output.as_deref(), format)?;
            let destination = output.as_deref().unwrap_or(&config.output_path);
            eprintln!("{}", generate::summary_line(&expansion, destination));
        }
        Some(Commands::Check { input, json }) => {
            let stdout = io::stdout();
            check::run(&mut stdout.lock(), &config, input.as_deref(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
