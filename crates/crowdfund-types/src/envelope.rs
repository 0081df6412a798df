//! Transaction envelopes and their lifecycle.
//!
//! An envelope moves through built -> simulated -> assembled -> signed ->
//! submitted. Assembly merges the simulation's execution footprint back in;
//! signing an unassembled envelope produces an invalid transaction.

use crate::intent::OperationIntent;
use serde::{Deserialize, Serialize};

/// Ledger entries and resources a simulated call is predicted to touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFootprint {
	pub read_entries: Vec<String>,
	pub write_entries: Vec<String>,
	pub cpu_instructions: u64,
	pub resource_fee: u64,
}

/// The serialized, signable representation of a pending transaction.
/// One envelope is built per attempt and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
	pub source: String,
	pub sequence: u64,
	pub fee: u64,
	pub timeout_secs: u64,
	pub network_passphrase: String,
	pub operation: OperationIntent,
	/// Present only after assembly.
	pub footprint: Option<ExecutionFootprint>,
}

impl TransactionEnvelope {
	pub fn is_assembled(&self) -> bool {
		self.footprint.is_some()
	}

	/// The byte payload handed to the external signer.
	pub fn signable_bytes(&self) -> Vec<u8> {
		serde_json::to_vec(self).unwrap_or_default()
	}
}

/// An assembled envelope plus the signature produced over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
	pub envelope: TransactionEnvelope,
	pub signature: Vec<u8>,
}
