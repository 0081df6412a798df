//! Results returned across the remote ledger boundary.

use crate::envelope::ExecutionFootprint;
use serde::{Deserialize, Serialize};

/// Account state needed to build an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
	pub account_id: String,
	pub sequence: u64,
}

/// Outcome of a dry-run execution. Consumed immediately to decide whether
/// the pipeline proceeds to assembly and signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationResult {
	Success {
		/// Natively decoded return value of the call.
		retval: serde_json::Value,
		footprint: ExecutionFootprint,
	},
	Failure {
		diagnostic: String,
	},
}

/// Outcome of handing a signed envelope to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionResult {
	Accepted { hash: String },
	Rejected { reason: String },
	TryAgainLater,
}

/// Status of a submitted transaction as reported by the ledger. A timeout
/// is an orchestrator outcome, not a wire status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
	Success,
	Failed { diagnostic: String },
	NotFound,
}

/// A raw contract event as yielded by the event query, before any
/// filtering or decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLedgerEvent {
	pub id: String,
	pub ledger: u64,
	pub topics: Vec<serde_json::Value>,
	pub value: serde_json::Value,
}
