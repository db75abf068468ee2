use std::io;
use anyhow::Context;
use pawn_cli::{Config, Shell};
use pawn_ledger::Ledger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    // Logs go to stderr so they never interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("Starting {} with pricing {:?}", config.shop.name, config.pricing);

    let ledger = Ledger::with_policy(config.pricing);
    let mut shell = Shell::new(io::stdin().lock(), io::stdout().lock(), ledger, config.shop.name);
    shell.run()?;

    let summary = shell.ledger().summary();
    tracing::info!(
        "Session closed: balance {}, {} available, {} sold",
        summary.balance,
        summary.available_count,
        summary.sold_count
    );
    Ok(())
}
