//! Mock collaborators shared by the unit tests in this crate.

use async_trait::async_trait;
use crowdfund_rpc::{LedgerClient, LedgerError, LedgerResult};
use crowdfund_signer::{Signer, SignerError};
use crowdfund_types::{
	AccountState, ConfirmationStatus, ExecutionFootprint, RawLedgerEvent, SignedEnvelope,
	SimulationResult, SubmissionResult, TransactionEnvelope,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct CallCounters {
	pub get_account: AtomicU32,
	pub get_transaction: AtomicU32,
}

pub enum MockConfirmation {
	Status(ConfirmationStatus),
	ParseFault,
}

pub struct MockLedger {
	accounts_available: bool,
	simulation_error: Option<String>,
	retval: serde_json::Value,
	submission: SubmissionResult,
	confirmation: MockConfirmation,
	assert_assembled: bool,
	counters: Arc<CallCounters>,
}

impl MockLedger {
	/// A ledger that accepts everything and confirms immediately.
	pub fn accepting(hash: &str) -> Self {
		Self {
			accounts_available: true,
			simulation_error: None,
			retval: serde_json::Value::Null,
			submission: SubmissionResult::Accepted {
				hash: hash.to_string(),
			},
			confirmation: MockConfirmation::Status(ConfirmationStatus::Success),
			assert_assembled: false,
			counters: Arc::default(),
		}
	}

	pub fn counters(&self) -> Arc<CallCounters> {
		self.counters.clone()
	}

	pub fn asserting_assembled(mut self) -> Self {
		self.assert_assembled = true;
		self
	}

	pub fn failing_simulation(mut self, diagnostic: &str) -> Self {
		self.simulation_error = Some(diagnostic.to_string());
		self
	}

	pub fn with_retval(mut self, retval: serde_json::Value) -> Self {
		self.retval = retval;
		self
	}

	pub fn rejecting_submission(mut self, reason: &str) -> Self {
		self.submission = SubmissionResult::Rejected {
			reason: reason.to_string(),
		};
		self
	}

	pub fn busy_submission(mut self) -> Self {
		self.submission = SubmissionResult::TryAgainLater;
		self
	}

	pub fn confirming(mut self, confirmation: MockConfirmation) -> Self {
		self.confirmation = confirmation;
		self
	}

	pub fn without_accounts(mut self) -> Self {
		self.accounts_available = false;
		self
	}
}

#[async_trait]
impl LedgerClient for MockLedger {
	async fn get_account(&self, account_id: &str) -> LedgerResult<AccountState> {
		self.counters.get_account.fetch_add(1, Ordering::SeqCst);
		if !self.accounts_available {
			return Err(LedgerError::AccountNotFound(account_id.to_string()));
		}
		Ok(AccountState {
			account_id: account_id.to_string(),
			sequence: 41,
		})
	}

	async fn simulate_transaction(
		&self,
		_envelope: &TransactionEnvelope,
	) -> LedgerResult<SimulationResult> {
		match &self.simulation_error {
			Some(diagnostic) => Ok(SimulationResult::Failure {
				diagnostic: diagnostic.clone(),
			}),
			None => Ok(SimulationResult::Success {
				retval: self.retval.clone(),
				footprint: ExecutionFootprint {
					cpu_instructions: 1_000,
					resource_fee: 50,
					..Default::default()
				},
			}),
		}
	}

	async fn send_transaction(&self, signed: &SignedEnvelope) -> LedgerResult<SubmissionResult> {
		if self.assert_assembled {
			assert!(
				signed.envelope.is_assembled(),
				"envelope reached submission without a merged footprint"
			);
			assert!(!signed.signature.is_empty(), "envelope was not signed");
		}
		Ok(self.submission.clone())
	}

	async fn get_transaction(&self, _hash: &str) -> LedgerResult<ConfirmationStatus> {
		self.counters.get_transaction.fetch_add(1, Ordering::SeqCst);
		match &self.confirmation {
			MockConfirmation::Status(status) => Ok(status.clone()),
			MockConfirmation::ParseFault => {
				Err(LedgerError::Malformed("Bad union switch: 4".to_string()))
			}
		}
	}

	async fn get_latest_ledger(&self) -> LedgerResult<u64> {
		Ok(1_000)
	}

	async fn get_events(
		&self,
		_from_ledger: u64,
		_contract_id: &str,
		_limit: u32,
	) -> LedgerResult<Vec<RawLedgerEvent>> {
		Ok(Vec::new())
	}
}

pub struct MockSigner {
	failure: Option<SignerError>,
}

impl MockSigner {
	pub fn approving() -> Self {
		Self { failure: None }
	}

	pub fn failing(failure: SignerError) -> Self {
		Self {
			failure: Some(failure),
		}
	}
}

#[async_trait]
impl Signer for MockSigner {
	async fn sign(
		&self,
		envelope_bytes: &[u8],
		_public_key: &str,
		_network_passphrase: &str,
	) -> Result<Vec<u8>, SignerError> {
		match &self.failure {
			Some(SignerError::Declined(message)) => {
				Err(SignerError::Declined(message.clone()))
			}
			Some(SignerError::Failed(message)) => Err(SignerError::Failed(message.clone())),
			None => {
				// Token signature: just tag the payload.
				let mut signature = b"signed:".to_vec();
				signature.extend_from_slice(&envelope_bytes[..envelope_bytes.len().min(8)]);
				Ok(signature)
			}
		}
	}
}
