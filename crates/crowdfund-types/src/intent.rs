//! Operation intents: a named contract invocation plus wire-typed arguments.

use serde::{Deserialize, Serialize};

/// Wire-typed contract call argument. Only the types the crowdfund
/// contract surface actually uses are represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ScVal {
	Address(String),
	Symbol(String),
	I128(i128),
	U64(u64),
	Bool(bool),
}

/// An intended contract call. Immutable once built; a new intent is
/// constructed per submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationIntent {
	pub function: String,
	pub args: Vec<ScVal>,
}

impl OperationIntent {
	pub fn new(function: impl Into<String>) -> Self {
		Self {
			function: function.into(),
			args: Vec::new(),
		}
	}

	pub fn with_arg(mut self, arg: ScVal) -> Self {
		self.args.push(arg);
		self
	}

	pub fn donate(donor: &str, amount: i128) -> Self {
		Self::new("donate")
			.with_arg(ScVal::Address(donor.to_string()))
			.with_arg(ScVal::I128(amount))
	}

	pub fn claim() -> Self {
		Self::new("claim")
	}

	pub fn get_campaign() -> Self {
		Self::new("get_campaign")
	}

	pub fn get_donation(donor: &str) -> Self {
		Self::new("get_donation").with_arg(ScVal::Address(donor.to_string()))
	}
}
