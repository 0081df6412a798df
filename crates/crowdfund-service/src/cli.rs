//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crowdfund")]
#[command(about = "Client for the crowdfund contract", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file; testnet defaults when omitted
	#[arg(short, long, env = "CROWDFUND_CONFIG")]
	pub config: Option<PathBuf>,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long, env = "CROWDFUND_LOG_LEVEL")]
	pub log_level: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Show the current campaign snapshot
	Campaign,

	/// Show the total donated by one account (best effort)
	Donations {
		/// Donor account address
		#[arg(long)]
		donor: String,
	},

	/// Tail donation events until interrupted
	Watch,

	/// Validate the configuration and exit
	Validate,
}
