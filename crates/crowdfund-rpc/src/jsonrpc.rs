//! Minimal JSON-RPC 2.0 envelope types for the Soroban RPC wire.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, P: Serialize> {
	pub jsonrpc: &'static str,
	pub id: u64,
	pub method: &'a str,
	pub params: P,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
	pub fn new(id: u64, method: &'a str, params: P) -> Self {
		Self {
			jsonrpc: "2.0",
			id,
			method,
			params,
		}
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
	pub result: Option<T>,
	pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
	pub code: i64,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_request_wire_shape() {
		let request = RpcRequest::new(3, "getLatestLedger", json!({}));
		let encoded = serde_json::to_value(&request).expect("encode");
		assert_eq!(
			encoded,
			json!({"jsonrpc": "2.0", "id": 3, "method": "getLatestLedger", "params": {}})
		);
	}

	#[test]
	fn test_response_decodes_error_object() {
		let body = json!({"error": {"code": -32600, "message": "bad request"}});
		let response: RpcResponse<serde_json::Value> =
			serde_json::from_value(body).expect("decode");
		assert!(response.result.is_none());
		let error = response.error.expect("error object");
		assert_eq!(error.code, -32600);
		assert_eq!(error.message, "bad request");
	}
}
