//! Remote ledger client boundary.
//!
//! [`LedgerClient`] is the capability set the orchestrator and event tailer
//! consume: account lookup, simulation, submission, status polling, and
//! event queries. [`SorobanRpcClient`] implements it over JSON-RPC. Callers
//! never see [`LedgerError`] directly; the orchestrator classifies it into
//! the error taxonomy at its boundary.

mod client;
mod jsonrpc;

pub use client::SorobanRpcClient;

use async_trait::async_trait;
use crowdfund_types::{
	AccountState, ConfirmationStatus, ExecutionFootprint, RawLedgerEvent, SignedEnvelope,
	SimulationResult, SubmissionResult, TransactionEnvelope,
};
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
	#[error("HTTP transport error: {0}")]
	Http(String),

	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	/// The node answered with a wire shape this client does not decode,
	/// e.g. a status introduced by a newer protocol version.
	#[error("Malformed response: {0}")]
	Malformed(String),

	#[error("Account not found: {0}")]
	AccountNotFound(String),
}

impl From<reqwest::Error> for LedgerError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			LedgerError::Malformed(err.to_string())
		} else {
			LedgerError::Http(err.to_string())
		}
	}
}

/// The remote ledger as the rest of the workspace sees it.
#[async_trait]
pub trait LedgerClient: Send + Sync {
	async fn get_account(&self, account_id: &str) -> LedgerResult<AccountState>;

	async fn simulate_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> LedgerResult<SimulationResult>;

	/// Merge a successful simulation's footprint back into the envelope.
	/// Client-side in the reference SDK, so a provided method rather than a
	/// network round trip.
	fn assemble_transaction(
		&self,
		envelope: TransactionEnvelope,
		footprint: &ExecutionFootprint,
	) -> TransactionEnvelope {
		TransactionEnvelope {
			footprint: Some(footprint.clone()),
			..envelope
		}
	}

	async fn send_transaction(&self, signed: &SignedEnvelope) -> LedgerResult<SubmissionResult>;

	async fn get_transaction(&self, hash: &str) -> LedgerResult<ConfirmationStatus>;

	async fn get_latest_ledger(&self) -> LedgerResult<u64>;

	async fn get_events(
		&self,
		from_ledger: u64,
		contract_id: &str,
		limit: u32,
	) -> LedgerResult<Vec<RawLedgerEvent>>;
}
