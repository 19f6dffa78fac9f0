//! One-shot registry lookup: prints the normalized card for an ИНН as JSON.
//!
//! Usage: `org_lookup <inn> [--raw]`

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use zcb_registry::config::Config;
use zcb_registry::lookup::RegistryLookup;
use zcb_registry::models::OrgCard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "zcb_registry=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let inn = args.next().context("usage: org_lookup <inn> [--raw]")?;
    let raw = args.any(|a| a == "--raw");

    let config = Config::from_env()?;
    let lookup = RegistryLookup::from_config(&config)?;
    let record = lookup.lookup(inn.trim()).await?;

    let output = if raw {
        serde_json::to_string_pretty(&record.raw)?
    } else {
        serde_json::to_string_pretty(&OrgCard::from(record))?
    };
    println!("{}", output);

    Ok(())
}
