//! klok-bot binary: loads accounts and keeps their chat threads active.

use anyhow::Context;
use clap::Parser;
use klok_bot::credentials::{CredentialFormat, load_accounts};
use klok_bot::{BotConfig, start_workers};
use std::path::PathBuf;
use tracing::{error, info};

/// Keeps Klok chat threads active for every configured account.
#[derive(Parser)]
#[command(name = "klok-bot", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "KLOK_BOT_CONFIG")]
    config: Option<PathBuf>,

    /// Credential file (overrides `accounts.path`).
    #[arg(short, long)]
    accounts: Option<PathBuf>,

    /// Credential file format: auto, lines or json.
    #[arg(short, long)]
    format: Option<CredentialFormat>,

    /// Seconds between ticks (overrides `worker.interval_secs`).
    #[arg(short, long)]
    interval_secs: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut BotConfig) {
        if let Some(path) = &self.accounts {
            config.accounts.path = path.clone();
        }
        if let Some(format) = self.format {
            config.accounts.format = format;
        }
        if let Some(secs) = self.interval_secs {
            config.worker.interval_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = BotConfig::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config);
    config.validate()?;

    let _log_guard = klok_bot::logging::init(&config.logging)?;

    info!("klok-bot v{}", env!("CARGO_PKG_VERSION"));

    let accounts = load_accounts(&config.accounts).with_context(|| {
        format!(
            "failed to load accounts from {}",
            config.accounts.path.display()
        )
    })?;
    info!(
        "loaded {} account(s) from {}",
        accounts.len(),
        config.accounts.path.display()
    );

    let mut supervisor = start_workers(&config, &accounts, None)?;

    tokio::select! {
        () = supervisor.run() => {
            error!("all account workers have exited");
            anyhow::bail!("no account workers left running");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            info!("ctrl-c received, shutting down");
            supervisor.shutdown().await;
        }
    }

    Ok(())
}
