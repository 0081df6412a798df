//! Read path: campaign state via read-only simulation.
//!
//! Reads build a throwaway envelope from the configured reference account
//! (the campaign owner), simulate it, and decode the return value. No
//! signature is ever requested.

use crate::orchestrator::Orchestrator;
use crowdfund_types::{
	campaign::decode_i128, CampaignSnapshot, CrowdfundError, OperationIntent, Result,
	SimulationResult,
};
use tracing::debug;

/// Validity window for read envelopes.
const READ_TIMEOUT_SECS: u64 = 30;

impl Orchestrator {
	/// Fetch a fresh campaign snapshot. Missing numeric fields decode to
	/// zero and missing identities to the empty string.
	pub async fn fetch_campaign(&self) -> Result<CampaignSnapshot> {
		let retval = self.simulate_read(OperationIntent::get_campaign()).await?;
		Ok(CampaignSnapshot::from_value(&retval))
	}

	/// Total donated by `donor`, for best-effort display. Degrades to zero
	/// on any failure instead of surfacing an error.
	pub async fn fetch_donation_total(&self, donor: &str) -> i128 {
		match self.simulate_read(OperationIntent::get_donation(donor)).await {
			Ok(retval) => decode_i128(Some(&retval)),
			Err(err) => {
				debug!(%donor, error = %err, "donation lookup failed, defaulting to zero");
				0
			}
		}
	}

	async fn simulate_read(&self, intent: OperationIntent) -> Result<serde_json::Value> {
		let owner = self.config().campaign_owner.clone();
		let account = self
			.client()
			.get_account(&owner)
			.await
			.map_err(|err| {
				CrowdfundError::network("Cannot reach Stellar network")
					.with_details(err.to_string())
			})?;

		let envelope = self.build_envelope(&account, intent, READ_TIMEOUT_SECS);
		match self.client().simulate_transaction(&envelope).await {
			Ok(SimulationResult::Success { retval, .. }) => Ok(retval),
			Ok(SimulationResult::Failure { diagnostic }) => Err(CrowdfundError::contract(
				"Failed to read campaign from contract",
			)
			.with_details(diagnostic)),
			Err(err) => Err(CrowdfundError::network("Cannot reach Stellar network")
				.with_details(err.to_string())),
		}
	}
}
