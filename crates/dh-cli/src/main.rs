//! deckhand CLI
//!
//! Reports the deployment status of a service in an environment. Any of the
//! project, service and environment may be left out; deckhand narrows the
//! catalog down to a deployed pair, prompting when more than one remains.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckhand::commands::{self, StatusArgs};
use deckhand::output::Output;
use dh_core::config::{self, ColorMode};

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(author, version, about = "Show the deployment status of your services")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of a deployed service
    Status {
        /// Project name (prompts if omitted)
        #[arg(short, long, env = "DECKHAND_PROJECT")]
        project: Option<String>,
        /// Service name
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
        /// Environment name
        #[arg(short, long)]
        env: Option<String>,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Status {
            project,
            name,
            env,
            json,
        } => {
            let config = match config::load_or_default(config_path).context("load configuration") {
                Ok(config) => config,
                Err(e) => exit_with_error(Output::detect(ColorMode::Auto), e),
            };
            let output = Output::detect(config.output.color);
            let args = StatusArgs {
                project,
                service: name,
                environment: env,
                json,
            };
            if let Err(e) = commands::status_command(&config, output, args).await {
                exit_with_error(output, e);
            }
        }

        // Config commands work even when the file is broken
        Commands::Config { action } => {
            let output = Output::detect(ColorMode::Auto);
            let result = match action {
                ConfigAction::Show => commands::config_show(config_path, output),
                ConfigAction::Path => commands::config_path(config_path),
                ConfigAction::Init { force } => commands::config_init(config_path, force, output),
            };
            if let Err(e) = result {
                exit_with_error(output, e);
            }
        }
    }
}

fn exit_with_error(output: Output, e: anyhow::Error) -> ! {
    // Most errors already spell out their cause, so skip repeats
    let mut message = e.to_string();
    for cause in e.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    output.error(&message);
    std::process::exit(1);
}
