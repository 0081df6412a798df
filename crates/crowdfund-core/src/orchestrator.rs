//! The submission pipeline: build, simulate, assemble, sign, submit,
//! confirm.

use crate::classify::{
	classify_confirmation_failure, classify_signer_failure, classify_simulation_failure,
};
use crowdfund_config::NetworkConfig;
use crowdfund_rpc::{LedgerClient, LedgerError};
use crowdfund_signer::SignerService;
use crowdfund_types::{
	AccountState, ConfirmationStatus, CrowdfundError, ErrorKind, OperationIntent, Result,
	SignedEnvelope, SimulationResult, SubmissionResult, TransactionEnvelope,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fee ceiling per transaction, in stroops.
const FEE_CEILING: u64 = 100_000;
/// Validity window for write envelopes.
const WRITE_TIMEOUT_SECS: u64 = 60;
/// Confirmation polling cadence and ceiling (about sixty seconds total).
const CONFIRM_INTERVAL: Duration = Duration::from_secs(2);
const CONFIRM_ATTEMPTS: u32 = 30;

/// What a completed submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
	pub tx_id: String,
	/// Set when confirmation polling gave up while the transaction stayed
	/// unseen. The network did accept the submission, so the id above is
	/// still the operation's outcome for caller bookkeeping.
	pub warning: Option<CrowdfundError>,
}

impl SubmitOutcome {
	fn confirmed(tx_id: String) -> Self {
		Self {
			tx_id,
			warning: None,
		}
	}
}

/// Drives one intended operation at a time through the transaction
/// lifecycle. Holds no mutable state; concurrent `submit` calls for the
/// same signer are not serialized here and may both reach the network.
pub struct Orchestrator {
	client: Arc<dyn LedgerClient>,
	signer: Option<SignerService>,
	config: NetworkConfig,
	confirm_interval: Duration,
	confirm_attempts: u32,
}

impl Orchestrator {
	pub fn new(
		client: Arc<dyn LedgerClient>,
		signer: Option<SignerService>,
		config: NetworkConfig,
	) -> Self {
		Self {
			client,
			signer,
			config,
			confirm_interval: CONFIRM_INTERVAL,
			confirm_attempts: CONFIRM_ATTEMPTS,
		}
	}

	/// Override the confirmation polling cadence. Tests shrink it.
	pub fn with_confirmation_policy(mut self, interval: Duration, attempts: u32) -> Self {
		self.confirm_interval = interval;
		self.confirm_attempts = attempts;
		self
	}

	pub(crate) fn client(&self) -> &dyn LedgerClient {
		self.client.as_ref()
	}

	pub(crate) fn config(&self) -> &NetworkConfig {
		&self.config
	}

	/// Drive `intent` through simulate, assemble, sign, submit, confirm on
	/// behalf of `signer_id`.
	///
	/// A confirmation timeout is deliberately not an error: the returned
	/// outcome carries the accepted transaction id plus a
	/// `NetworkError`-classified warning. There is no idempotency key, so
	/// blindly retrying after such a timeout may submit twice; callers must
	/// confirm via an external status check first.
	pub async fn submit(&self, intent: OperationIntent, signer_id: &str) -> Result<SubmitOutcome> {
		let signer = self.signer.as_ref().ok_or_else(|| {
			CrowdfundError::new(ErrorKind::WalletNotFound, "No wallet connected")
		})?;

		let account = self.client.get_account(signer_id).await.map_err(|err| {
			CrowdfundError::network("Cannot reach Stellar network").with_details(err.to_string())
		})?;

		let envelope = self.build_envelope(&account, intent, WRITE_TIMEOUT_SECS);
		debug!(
			function = %envelope.operation.function,
			sequence = envelope.sequence,
			"built transaction envelope"
		);

		let footprint = match self.client.simulate_transaction(&envelope).await {
			Ok(SimulationResult::Success { footprint, .. }) => footprint,
			Ok(SimulationResult::Failure { diagnostic }) => {
				return Err(classify_simulation_failure(&diagnostic));
			}
			Err(err) => {
				return Err(CrowdfundError::network("Cannot reach Stellar network")
					.with_details(err.to_string()));
			}
		};

		// Merge the simulated execution plan back in before signing;
		// signing the unassembled envelope produces an invalid transaction.
		let assembled = self.client.assemble_transaction(envelope, &footprint);

		let signature = signer
			.sign(
				&assembled.signable_bytes(),
				signer_id,
				&self.config.network_passphrase,
			)
			.await
			.map_err(|err| classify_signer_failure(&err.to_string()))?;
		let signed = SignedEnvelope {
			envelope: assembled,
			signature,
		};

		let hash = match self.client.send_transaction(&signed).await {
			Ok(SubmissionResult::Accepted { hash }) => hash,
			Ok(SubmissionResult::Rejected { reason }) => {
				return Err(
					CrowdfundError::contract("Transaction submission failed").with_details(reason)
				);
			}
			Ok(SubmissionResult::TryAgainLater) => {
				return Err(CrowdfundError::network(
					"Network is busy. Please try again in a moment.",
				));
			}
			Err(err) => {
				return Err(CrowdfundError::network("Cannot reach Stellar network")
					.with_details(err.to_string()));
			}
		};
		info!(%hash, "transaction accepted, polling for confirmation");

		self.confirm(hash).await
	}

	pub(crate) fn build_envelope(
		&self,
		account: &AccountState,
		intent: OperationIntent,
		timeout_secs: u64,
	) -> TransactionEnvelope {
		TransactionEnvelope {
			source: account.account_id.clone(),
			sequence: account.sequence + 1,
			fee: FEE_CEILING,
			timeout_secs,
			network_passphrase: self.config.network_passphrase.clone(),
			operation: intent,
			footprint: None,
		}
	}

	/// Poll for the on-chain result: once immediately, then on a fixed
	/// interval while the transaction stays unseen.
	async fn confirm(&self, hash: String) -> Result<SubmitOutcome> {
		let mut attempts = 0;
		loop {
			match self.client.get_transaction(&hash).await {
				Ok(ConfirmationStatus::Success) => {
					info!(%hash, "transaction confirmed");
					return Ok(SubmitOutcome::confirmed(hash));
				}
				Ok(ConfirmationStatus::Failed { diagnostic }) => {
					return Err(classify_confirmation_failure(&diagnostic));
				}
				Ok(ConfirmationStatus::NotFound) => {
					if attempts >= self.confirm_attempts {
						warn!(%hash, "confirmation timed out; submission still stands");
						return Ok(SubmitOutcome {
							tx_id: hash,
							warning: Some(CrowdfundError::network(
								"Transaction submitted but confirmation timed out. \
								 Check the explorer for status.",
							)),
						});
					}
					attempts += 1;
					tokio::time::sleep(self.confirm_interval).await;
				}
				// The network already accepted the submission; an
				// unparsable status response does not retroactively
				// invalidate it.
				Err(LedgerError::Malformed(message)) => {
					warn!(%hash, %message, "unparsable status response, treating as success");
					return Ok(SubmitOutcome::confirmed(hash));
				}
				Err(err) => {
					warn!(%hash, error = %err, "status poll failed after acceptance");
					return Ok(SubmitOutcome {
						tx_id: hash,
						warning: Some(
							CrowdfundError::network(
								"Transaction submitted but confirmation could not be retrieved.",
							)
							.with_details(err.to_string()),
						),
					});
				}
			}
		}
	}
}
