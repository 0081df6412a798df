//! External signer boundary.
//!
//! Key management and the signing UI live outside this workspace; the
//! orchestrator only needs the capability to produce a signature over an
//! assembled envelope. Wallet integrations implement [`Signer`].

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
	/// The user explicitly refused to sign.
	#[error("Signing declined: {0}")]
	Declined(String),
	/// Any other signer fault (unavailable wallet, transport, bad key).
	#[error("Signing failed: {0}")]
	Failed(String),
}

/// Capability to sign an assembled envelope for a given identity on a
/// given network.
#[async_trait]
pub trait Signer: Send + Sync {
	async fn sign(
		&self,
		envelope_bytes: &[u8],
		public_key: &str,
		network_passphrase: &str,
	) -> Result<Vec<u8>, SignerError>;
}

/// Thin handle the orchestrator holds onto a pluggable signer.
#[derive(Clone)]
pub struct SignerService {
	provider: Arc<dyn Signer>,
}

impl SignerService {
	pub fn new(provider: Arc<dyn Signer>) -> Self {
		Self { provider }
	}

	pub async fn sign(
		&self,
		envelope_bytes: &[u8],
		public_key: &str,
		network_passphrase: &str,
	) -> Result<Vec<u8>, SignerError> {
		self.provider
			.sign(envelope_bytes, public_key, network_passphrase)
			.await
	}
}
