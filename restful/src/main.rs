mod args;

use anyhow::Context;
use args::Args;
use clap::Parser;
use restful_config::Config;
use restful_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let _telemetry_guard = restful_telemetry::init(config.telemetry.as_ref(), &args.log)?;
    tracing::info!(
        config_path = %args.config.display(),
        max_cause_depth = config.faults.max_cause_depth,
        "starting restful"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    Server::new(&config)?.serve(shutdown).await?;

    tracing::info!("restful stopped");
    Ok(())
}

/// Read the config file, letting `--listen` win over `server.listen_address`
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config =
        Config::load(&args.config).with_context(|| format!("cannot start from {}", args.config.display()))?;
    if args.listen.is_some() {
        config.server.listen_address = args.listen;
    }
    Ok(config)
}

/// Cancel `shutdown` on Ctrl+C, or on `SIGTERM` where signals exist
async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(error) => {
                tracing::warn!(%error, "SIGTERM handler unavailable, waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("shutdown signal received");
    shutdown.cancel();
}
