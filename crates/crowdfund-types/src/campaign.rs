//! Campaign state and donation events as seen by the presentation layer.

use serde::{Deserialize, Serialize};

/// Point-in-time view of the campaign. Produced fresh on every read; a new
/// snapshot replaces the old rather than mutating it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
	pub owner: String,
	pub token: String,
	pub goal: i128,
	/// Epoch seconds.
	pub deadline: u64,
	pub total_raised: i128,
	pub claimed: bool,
}

impl CampaignSnapshot {
	/// Decode from a natively decoded contract value. Missing numeric
	/// fields default to zero, missing identities to the empty string.
	pub fn from_value(value: &serde_json::Value) -> Self {
		Self {
			owner: decode_string(value.get("owner")),
			token: decode_string(value.get("token")),
			goal: decode_i128(value.get("goal")),
			deadline: u64::try_from(decode_i128(value.get("deadline"))).unwrap_or(0),
			total_raised: decode_i128(value.get("total_raised")),
			claimed: value
				.get("claimed")
				.and_then(serde_json::Value::as_bool)
				.unwrap_or(false),
		}
	}

	pub fn goal_reached(&self) -> bool {
		self.total_raised >= self.goal
	}
}

/// A single observed donation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationEvent {
	pub donor: String,
	pub amount: i128,
	/// Wall-clock time of observation in epoch milliseconds, not ledger time.
	pub observed_at_ms: i64,
	pub tx_id: String,
}

fn decode_string(value: Option<&serde_json::Value>) -> String {
	value
		.and_then(serde_json::Value::as_str)
		.unwrap_or_default()
		.to_string()
}

/// Decode an i128 that may arrive as a JSON number or as a decimal string
/// (the usual encoding for values past u64 range).
pub fn decode_i128(value: Option<&serde_json::Value>) -> i128 {
	match value {
		Some(serde_json::Value::Number(n)) => n
			.as_i64()
			.map(i128::from)
			.or_else(|| n.as_u64().map(i128::from))
			.unwrap_or(0),
		Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
		_ => 0,
	}
}
