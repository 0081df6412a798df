//! Heuristic mapping from free-text diagnostics to taxonomy kinds.
//!
//! The contract reports failures as free text with no structured code, so
//! classification is substring matching. It lives here, isolated and pure,
//! so the heuristic can be tested and extended without touching the
//! pipeline. Unmatched diagnostics fall back to an explicit catch-all kind
//! rather than being dropped.

use crowdfund_types::{CrowdfundError, ErrorKind};

/// Classify a failed simulation's diagnostic.
pub fn classify_simulation_failure(diagnostic: &str) -> CrowdfundError {
	if diagnostic.contains("campaign has ended") || diagnostic.contains("deadline") {
		return CrowdfundError::new(
			ErrorKind::CampaignEnded,
			"Campaign has ended — no more donations accepted.",
		)
		.with_details(diagnostic);
	}
	if diagnostic.contains("goal not reached") {
		return CrowdfundError::new(
			ErrorKind::GoalNotReached,
			"Funding goal was not reached. Cannot claim.",
		)
		.with_details(diagnostic);
	}
	if diagnostic.contains("already claimed") {
		return CrowdfundError::contract("Funds have already been claimed.")
			.with_details(diagnostic);
	}
	CrowdfundError::contract(diagnostic)
}

/// Classify a signer failure. An explicit user refusal gets the friendly
/// message; everything else still maps to `TransactionRejected` (there is
/// no separate signer-unavailable kind), with the raw message preserved.
pub fn classify_signer_failure(message: &str) -> CrowdfundError {
	let lowered = message.to_lowercase();
	let refused = ["declined", "rejected", "cancel", "denied"]
		.iter()
		.any(|needle| lowered.contains(needle));
	if refused {
		CrowdfundError::new(
			ErrorKind::TransactionRejected,
			"You rejected the transaction in your wallet.",
		)
		.with_details(message)
	} else {
		CrowdfundError::new(ErrorKind::TransactionRejected, message).with_details(message)
	}
}

/// Classify an on-chain failure reported by confirmation polling.
pub fn classify_confirmation_failure(diagnostic: &str) -> CrowdfundError {
	if diagnostic.contains("balance") || diagnostic.contains("insufficient") {
		return CrowdfundError::new(
			ErrorKind::InsufficientBalance,
			"Insufficient balance to complete this transaction.",
		)
		.with_details(diagnostic);
	}
	CrowdfundError::contract("Transaction failed on-chain. Check your balance and try again.")
		.with_details(diagnostic)
}
