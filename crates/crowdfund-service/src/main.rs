//! Command-line client for the crowdfund contract.
//!
//! Write operations (donate, claim) live in `crowdfund-core` behind the
//! pluggable signer boundary; this binary only exposes the read and watch
//! surfaces, which need no wallet.

use anyhow::{Context, Result};
use clap::Parser;
use crowdfund_config::{ConfigLoader, NetworkConfig};
use crowdfund_core::CrowdfundService;
use crowdfund_events::EventTailer;
use crowdfund_rpc::SorobanRpcClient;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	setup_tracing(args.log_level.as_deref());

	let mut loader = ConfigLoader::new();
	if let Some(path) = &args.config {
		loader = loader.with_file(path);
	}
	let config = loader.load().context("Failed to load configuration")?;

	match args.command {
		Command::Campaign => show_campaign(config).await,
		Command::Donations { donor } => show_donations(config, &donor).await,
		Command::Watch => watch_events(config).await,
		Command::Validate => {
			println!("configuration OK: {} ({})", config.name, config.rpc_url);
			Ok(())
		}
	}
}

fn setup_tracing(level: Option<&str>) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));
	tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn service(config: NetworkConfig) -> CrowdfundService {
	let client = Arc::new(SorobanRpcClient::new(config.rpc_url.clone()));
	// No signer: read and watch surfaces only.
	CrowdfundService::new(client, None, config)
}

async fn show_campaign(config: NetworkConfig) -> Result<()> {
	let snapshot = service(config)
		.fetch_campaign()
		.await
		.map_err(|err| anyhow::anyhow!("{err}"))?;

	println!("owner:        {}", snapshot.owner);
	println!("token:        {}", snapshot.token);
	println!("goal:         {}", snapshot.goal);
	println!("deadline:     {}", snapshot.deadline);
	println!("total raised: {}", snapshot.total_raised);
	println!("claimed:      {}", snapshot.claimed);
	println!("goal reached: {}", snapshot.goal_reached());
	Ok(())
}

async fn show_donations(config: NetworkConfig, donor: &str) -> Result<()> {
	let total = service(config).fetch_donation_total(donor).await;
	println!("{donor}: {total}");
	Ok(())
}

async fn watch_events(config: NetworkConfig) -> Result<()> {
	let client = Arc::new(SorobanRpcClient::new(config.rpc_url.clone()));
	let tailer = EventTailer::new(client, config.contract_id.clone());

	let mut receiver = tailer
		.start()
		.await
		.context("event tailer failed to start")?;
	info!(contract_id = %config.contract_id, "watching for donations, ctrl-c to stop");

	loop {
		tokio::select! {
			event = receiver.recv() => match event {
				Some(event) => {
					println!(
						"{} donated {} (tx {})",
						event.donor, event.amount, event.tx_id
					);
				}
				None => break,
			},
			_ = signal::ctrl_c() => {
				info!("interrupted, stopping");
				break;
			}
		}
	}

	tailer.stop().await;
	Ok(())
}
