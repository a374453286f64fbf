use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use urlpoll::config::{CONFIG_FILE_NAME, LOG_FILE_NAME};
use urlpoll::error::Error;
use urlpoll::scheduler::Scheduler;

#[derive(Parser)]
#[command(
    name = "urlpoll",
    version,
    about = "Continuously polls a list of URLs and logs whether each is UP or DOWN",
    long_about = None
)]
struct Cli {
    /// Application config file (JSON with targetFile and numGoRoutines)
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log file rewritten on every probe record
    #[arg(long, default_value = LOG_FILE_NAME)]
    log_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, default_value = "text")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose);

    let scheduler = match Scheduler::from_files(&cli.config, &cli.log_file).await {
        Ok(scheduler) => scheduler,
        Err(e) => {
            report_startup_failure(&e);
            return Err(e.into());
        }
    };

    scheduler.run_forever().await;
    Ok(())
}

fn report_startup_failure(e: &Error) {
    tracing::error!(
        category = %e.category(),
        recoverable = e.is_recoverable(),
        error = %e,
        "Startup failed"
    );
    if let Error::Config(_) = e {
        tracing::error!("Failed to process provided JSON file containing the list of URLs");
    }
}

fn setup_tracing(format: &str, verbose: bool) {
    let default_filter = if verbose {
        "urlpoll=debug,info"
    } else {
        "urlpoll=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
