//! Network and contract configuration.

use serde::{Deserialize, Serialize};

/// Everything the orchestrator and tailer need to know about the network
/// they talk to. Read-only after load; shared by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
	pub name: String,
	pub rpc_url: String,
	pub network_passphrase: String,
	/// The crowdfund contract.
	pub contract_id: String,
	/// Campaign owner (deployer); also the reference account for read-only
	/// simulations.
	pub campaign_owner: String,
	/// Funding token (SAC).
	pub token_id: String,
	#[serde(default)]
	pub friendbot_url: String,
}

impl NetworkConfig {
	/// The testnet deployment this client was written against.
	pub fn testnet() -> Self {
		Self {
			name: "Testnet".to_string(),
			rpc_url: "https://soroban-testnet.stellar.org".to_string(),
			network_passphrase: "Test SDF Network ; September 2015".to_string(),
			contract_id: "CCNXRR5JYDC4EIPMPK2YV4U6JH6RLPASXAQBYN3Q4Y5DYDUB3TU6YR7U".to_string(),
			campaign_owner: "GDHQ6TNWZ4V2JVCDWEUVW7YKFBXCOQZRRUCT27LAKES3PGOE6JSZMSMD"
				.to_string(),
			token_id: "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC".to_string(),
			friendbot_url: "https://friendbot.stellar.org".to_string(),
		}
	}
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self::testnet()
	}
}
