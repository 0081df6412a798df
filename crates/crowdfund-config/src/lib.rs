//! Configuration loading with environment variable substitution.

mod types;

pub use types::NetworkConfig;

use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Loads a [`NetworkConfig`] from TOML, substituting `${VAR}` references
/// and applying `CROWDFUND_`-prefixed environment overrides.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "CROWDFUND_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub fn load(&self) -> Result<NetworkConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			info!("Loading configuration from {}", file_path);
			let contents = std::fs::read_to_string(file_path)
				.map_err(|_| ConfigError::FileNotFound(file_path.clone()))?;
			Self::from_toml(&contents)?
		} else {
			debug!("No configuration file specified, using testnet defaults");
			NetworkConfig::testnet()
		};

		self.apply_env_overrides(&mut config);
		Self::validate(&config)?;
		Ok(config)
	}

	pub fn from_toml(contents: &str) -> Result<NetworkConfig, ConfigError> {
		let substituted = substitute_env_vars(contents)?;
		toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn apply_env_overrides(&self, config: &mut NetworkConfig) {
		if let Ok(url) = env::var(format!("{}RPC_URL", self.env_prefix)) {
			debug!("Overriding RPC URL from environment");
			config.rpc_url = url;
		}
		if let Ok(contract_id) = env::var(format!("{}CONTRACT_ID", self.env_prefix)) {
			debug!("Overriding contract id from environment");
			config.contract_id = contract_id;
		}
		if let Ok(passphrase) = env::var(format!("{}NETWORK_PASSPHRASE", self.env_prefix)) {
			config.network_passphrase = passphrase;
		}
	}

	pub fn validate(config: &NetworkConfig) -> Result<(), ConfigError> {
		if config.rpc_url.is_empty() {
			return Err(ConfigError::ValidationError("rpc_url is empty".to_string()));
		}
		if config.network_passphrase.is_empty() {
			return Err(ConfigError::ValidationError(
				"network_passphrase is empty".to_string(),
			));
		}
		// Strkey prefixes: contracts are C..., accounts are G...
		if !config.contract_id.starts_with('C') {
			return Err(ConfigError::ValidationError(format!(
				"contract_id does not look like a contract address: {}",
				config.contract_id
			)));
		}
		if !config.campaign_owner.starts_with('G') {
			return Err(ConfigError::ValidationError(format!(
				"campaign_owner does not look like an account address: {}",
				config.campaign_owner
			)));
		}
		if !config.token_id.starts_with('C') {
			return Err(ConfigError::ValidationError(format!(
				"token_id does not look like a contract address: {}",
				config.token_id
			)));
		}
		Ok(())
	}
}

/// Replace `${VAR}` references with the corresponding environment variable.
fn substitute_env_vars(contents: &str) -> Result<String, ConfigError> {
	let mut result = String::with_capacity(contents.len());
	let mut rest = contents;

	while let Some(start) = rest.find("${") {
		let after = &rest[start + 2..];
		let end = after
			.find('}')
			.ok_or_else(|| ConfigError::ParseError("unterminated ${ reference".to_string()))?;
		let var_name = &after[..end];
		let value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
		result.push_str(&rest[..start]);
		result.push_str(&value);
		rest = &after[end + 1..];
	}
	result.push_str(rest);
	Ok(result)
}
