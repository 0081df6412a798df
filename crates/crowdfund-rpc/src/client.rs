//! JSON-RPC client for a Soroban RPC endpoint.

use crate::jsonrpc::{RpcRequest, RpcResponse};
use crate::{LedgerClient, LedgerError, LedgerResult};
use async_trait::async_trait;
use crowdfund_types::{
	AccountState, ConfirmationStatus, ExecutionFootprint, RawLedgerEvent, SignedEnvelope,
	SimulationResult, SubmissionResult, TransactionEnvelope,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// HTTP JSON-RPC implementation of [`LedgerClient`].
pub struct SorobanRpcClient {
	http: reqwest::Client,
	endpoint: String,
	next_id: AtomicU64,
}

impl SorobanRpcClient {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			endpoint: endpoint.into(),
			next_id: AtomicU64::new(1),
		}
	}

	async fn call<P: Serialize, T: DeserializeOwned>(
		&self,
		method: &str,
		params: P,
	) -> LedgerResult<T> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		debug!(method, id, "ledger rpc call");

		let response = self
			.http
			.post(&self.endpoint)
			.json(&RpcRequest::new(id, method, params))
			.send()
			.await?;
		let body: RpcResponse<T> = response.json().await?;

		if let Some(error) = body.error {
			return Err(LedgerError::Rpc {
				code: error.code,
				message: error.message,
			});
		}
		body.result.ok_or_else(|| {
			LedgerError::Malformed("response carried neither result nor error".to_string())
		})
	}
}

#[async_trait]
impl LedgerClient for SorobanRpcClient {
	async fn get_account(&self, account_id: &str) -> LedgerResult<AccountState> {
		let response: AccountResponse = self
			.call("getAccount", json!({ "account": account_id }))
			.await
			.map_err(|err| match err {
				LedgerError::Rpc { .. } => LedgerError::AccountNotFound(account_id.to_string()),
				other => other,
			})?;
		Ok(AccountState {
			account_id: response.id,
			sequence: response.sequence,
		})
	}

	async fn simulate_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> LedgerResult<SimulationResult> {
		let payload = hex::encode(envelope.signable_bytes());
		let response: SimulateResponse = self
			.call("simulateTransaction", json!({ "transaction": payload }))
			.await?;
		Ok(simulation_from_response(response))
	}

	async fn send_transaction(&self, signed: &SignedEnvelope) -> LedgerResult<SubmissionResult> {
		let payload = serde_json::to_vec(signed)
			.map_err(|e| LedgerError::Malformed(e.to_string()))?;
		let response: SendResponse = self
			.call(
				"sendTransaction",
				json!({ "transaction": hex::encode(payload) }),
			)
			.await?;
		submission_from_response(response)
	}

	async fn get_transaction(&self, hash: &str) -> LedgerResult<ConfirmationStatus> {
		let response: GetTransactionResponse =
			self.call("getTransaction", json!({ "hash": hash })).await?;
		confirmation_from_response(response)
	}

	async fn get_latest_ledger(&self) -> LedgerResult<u64> {
		let response: LatestLedgerResponse = self.call("getLatestLedger", json!({})).await?;
		Ok(response.sequence)
	}

	async fn get_events(
		&self,
		from_ledger: u64,
		contract_id: &str,
		limit: u32,
	) -> LedgerResult<Vec<RawLedgerEvent>> {
		let params = json!({
			"startLedger": from_ledger,
			"filters": [{
				"type": "contract",
				"contractIds": [contract_id],
				"topics": [["*"]],
			}],
			"pagination": { "limit": limit },
		});
		let response: EventsResponse = self.call("getEvents", params).await?;
		Ok(response
			.events
			.unwrap_or_default()
			.into_iter()
			.map(|event| RawLedgerEvent {
				id: event.id,
				ledger: event.ledger,
				topics: event.topic,
				value: event.value,
			})
			.collect())
	}
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
	id: String,
	sequence: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
	error: Option<String>,
	results: Option<Vec<SimulateResultEntry>>,
	footprint: Option<ExecutionFootprint>,
}

#[derive(Debug, Deserialize)]
struct SimulateResultEntry {
	retval: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
	status: String,
	hash: Option<String>,
	error_result: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTransactionResponse {
	status: String,
	result_xdr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestLedgerResponse {
	sequence: u64,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
	events: Option<Vec<EventBody>>,
}

#[derive(Debug, Deserialize)]
struct EventBody {
	id: String,
	ledger: u64,
	topic: Vec<serde_json::Value>,
	value: serde_json::Value,
}

fn simulation_from_response(response: SimulateResponse) -> SimulationResult {
	if let Some(diagnostic) = response.error {
		return SimulationResult::Failure { diagnostic };
	}
	let retval = response
		.results
		.and_then(|mut results| {
			if results.is_empty() {
				None
			} else {
				Some(results.remove(0).retval)
			}
		})
		.unwrap_or(serde_json::Value::Null);
	SimulationResult::Success {
		retval,
		footprint: response.footprint.unwrap_or_default(),
	}
}

fn submission_from_response(response: SendResponse) -> LedgerResult<SubmissionResult> {
	match response.status.as_str() {
		"PENDING" | "DUPLICATE" => {
			let hash = response.hash.ok_or_else(|| {
				LedgerError::Malformed("accepted submission carried no hash".to_string())
			})?;
			Ok(SubmissionResult::Accepted { hash })
		}
		"ERROR" => Ok(SubmissionResult::Rejected {
			reason: response
				.error_result
				.unwrap_or_else(|| "Unknown error".to_string()),
		}),
		"TRY_AGAIN_LATER" => Ok(SubmissionResult::TryAgainLater),
		other => Err(LedgerError::Malformed(format!(
			"unrecognized submission status: {other}"
		))),
	}
}

fn confirmation_from_response(response: GetTransactionResponse) -> LedgerResult<ConfirmationStatus> {
	match response.status.as_str() {
		"SUCCESS" => Ok(ConfirmationStatus::Success),
		"FAILED" => Ok(ConfirmationStatus::Failed {
			diagnostic: response.result_xdr.unwrap_or_default(),
		}),
		"NOT_FOUND" => Ok(ConfirmationStatus::NotFound),
		// Newer protocol versions grow statuses this client does not
		// understand; surface that as a parse fault, not a status.
		other => Err(LedgerError::Malformed(format!(
			"unrecognized transaction status: {other}"
		))),
	}
}
