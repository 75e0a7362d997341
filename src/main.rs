mod demo;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use demo::Config;

#[derive(Parser)]
#[command(name = "panic-guard")]
#[command(about = "Demo server for panic recovery helpers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo HTTP server
    Serve {
        #[arg(long)]
        config: Option<String>,
    },
    /// Validate a config file
    Check { config: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Check { config } => check(&config),
    }
}

fn load(path: Option<&str>) -> Option<Config> {
    let Some(path) = path else {
        return Some(Config::default());
    };

    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path, e);
            None
        }
    }
}

async fn serve(path: Option<&str>) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    match demo::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &str) -> ExitCode {
    let Some(config) = load(Some(path)) else {
        return ExitCode::FAILURE;
    };

    println!("Config is valid");
    println!("  bind: {}", config.web.bind);
    println!("  retry.max_attempts: {}", config.retry.max_attempts);
    println!(
        "  retry.failures_before_success: {}",
        config.retry.failures_before_success
    );
    ExitCode::SUCCESS
}
