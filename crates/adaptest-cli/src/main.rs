//! adaptest CLI: the terminal view over the adaptive session controller.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod view;

#[derive(Parser)]
#[command(name = "adaptest", version, about = "Adaptive skills assessment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take assessment sessions interactively
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Question service base URL (overrides config)
        #[arg(long)]
        gateway_url: Option<String>,

        /// Questions per session (overrides config)
        #[arg(long)]
        length: Option<u32>,

        /// Results format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch one question to verify the question service
    Check {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Question service base URL (overrides config)
        #[arg(long)]
        gateway_url: Option<String>,
    },

    /// Show the configured student profile
    Profile {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptest=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            gateway_url,
            length,
            format,
        } => commands::run::execute(config, gateway_url, length, format).await,
        Commands::Check {
            config,
            gateway_url,
        } => commands::check::execute(config, gateway_url).await,
        Commands::Profile { config } => commands::profile::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
