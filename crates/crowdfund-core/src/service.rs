//! The interface the presentation layer consumes.

use crate::orchestrator::{Orchestrator, SubmitOutcome};
use crowdfund_config::NetworkConfig;
use crowdfund_rpc::LedgerClient;
use crowdfund_signer::{Signer, SignerService};
use crowdfund_types::{
	CampaignSnapshot, CrowdfundError, ErrorKind, OperationIntent, Result,
};
use std::sync::Arc;

/// Campaign operations surfaced to the caller. Every method fails with a
/// taxonomy-classified [`CrowdfundError`].
pub struct CrowdfundService {
	client: Arc<dyn LedgerClient>,
	orchestrator: Orchestrator,
}

impl CrowdfundService {
	pub fn new(
		client: Arc<dyn LedgerClient>,
		signer: Option<Arc<dyn Signer>>,
		config: NetworkConfig,
	) -> Self {
		let orchestrator =
			Orchestrator::new(client.clone(), signer.map(SignerService::new), config);
		Self {
			client,
			orchestrator,
		}
	}

	/// Build directly on a preconfigured orchestrator (tests shrink its
	/// confirmation policy this way).
	pub fn with_orchestrator(client: Arc<dyn LedgerClient>, orchestrator: Orchestrator) -> Self {
		Self {
			client,
			orchestrator,
		}
	}

	pub async fn fetch_campaign(&self) -> Result<CampaignSnapshot> {
		self.orchestrator.fetch_campaign().await
	}

	pub async fn fetch_donation_total(&self, donor: &str) -> i128 {
		self.orchestrator.fetch_donation_total(donor).await
	}

	/// Donate `amount` units from `signer_id`. Rejects non-positive
	/// amounts before any network call, then pre-validates that the donor
	/// account exists (an unfunded account is a funding problem, not a
	/// connectivity one).
	pub async fn submit_donation(&self, signer_id: &str, amount: i128) -> Result<SubmitOutcome> {
		if amount <= 0 {
			return Err(CrowdfundError::contract(
				"Donation amount must be greater than zero.",
			));
		}

		if let Err(err) = self.client.get_account(signer_id).await {
			return Err(CrowdfundError::new(
				ErrorKind::InsufficientBalance,
				"Account not found or not funded. Use Friendbot first.",
			)
			.with_details(err.to_string()));
		}

		self.orchestrator
			.submit(OperationIntent::donate(signer_id, amount), signer_id)
			.await
	}

	/// Claim the raised funds as the campaign owner.
	pub async fn claim(&self, signer_id: &str) -> Result<SubmitOutcome> {
		self.orchestrator
			.submit(OperationIntent::claim(), signer_id)
			.await
	}
}
