mod error;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zipbridge_core::Bridge;

use crate::error::DaemonError;
use crate::platform::TracingPlatform;

#[derive(Parser)]
#[command(
    name = "zipbridge",
    version,
    about = "Expose Zipato box devices as smart-home accessories"
)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Profile to run.
    #[arg(long, short)]
    profile: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), DaemonError> {
    let (config, config_path) = match cli.config {
        Some(ref path) => (
            zipbridge_config::load_config_from(path)?,
            path.display().to_string(),
        ),
        None => (
            zipbridge_config::load_config_or_default(),
            zipbridge_config::config_path().display().to_string(),
        ),
    };

    let profile_name = zipbridge_config::active_profile_name(cli.profile.as_deref(), &config);
    let profile =
        config
            .profiles
            .get(&profile_name)
            .ok_or_else(|| DaemonError::ProfileNotFound {
                name: profile_name.clone(),
                path: config_path,
            })?;

    let bridge_config =
        zipbridge_config::profile_to_bridge_config(profile, &profile_name, &config.defaults)?;

    let bridge = Bridge::new(bridge_config, Arc::new(TracingPlatform));

    info!(profile = %profile_name, "connecting to box");
    bridge.connect().await?;
    info!("bridge running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    bridge.shutdown().await;

    Ok(())
}
