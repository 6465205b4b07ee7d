use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shelly_core::{ConfigLoader, MemoryLogger, TracingLogger, DEFAULT_CONFIG_PATH};
use shelly_server::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "shelly-manager", version, about = "Shelly Manager server")]
struct Args {
    /// Base configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Resolve the configuration, print a redacted summary and exit
    #[arg(long)]
    check: bool,

    /// Log filter, overriding server.log_level (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = real_main().await {
        eprintln!("shelly-manager exited with error: {err:#}");
        process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The log level is itself configuration, so loader diagnostics are
    // buffered until the subscriber exists.
    let startup_log = Arc::new(MemoryLogger::new());
    let loaded = ConfigLoader::new(args.config.clone())
        .with_logger(startup_log.clone())
        .load()
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.settings.server.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
    startup_log.replay(&TracingLogger::with_target("shelly_manager::config"));

    if args.check {
        print_summary(&loaded.resolved);
        return Ok(());
    }

    let (host, port) = (loaded.settings.server.host.clone(), loaded.settings.server.port);
    let state = AppState::from_loaded(loaded).context("failed to open export output directory")?;
    info!(
        export_root = %state.exports.root().display(),
        admin_key_configured = state.admin_key.is_configured(),
        "starting shelly-manager"
    );

    shelly_server::run(&host, port, state).await
}

fn print_summary(resolved: &shelly_core::ResolvedConfig) {
    for entry in resolved.redacted() {
        println!("{:<40} {:<24} {}", entry.key, entry.value, entry.source);
    }
    for var in resolved.ignored_env_vars() {
        println!("ignored: {var}");
    }
    for key in resolved.unknown_file_keys() {
        println!("unknown: {key}");
    }
}
