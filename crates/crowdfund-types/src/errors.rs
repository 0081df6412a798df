//! The closed error taxonomy every public operation fails with.
//!
//! All failures crossing the orchestrator or event tailer boundary are
//! classified into one of the seven kinds below. Lower-level faults that
//! match no specific kind collapse into `ContractError` (catch-all) or
//! `NetworkError` (connectivity and timeouts).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrowdfundError>;

/// Classified failure kinds. This set is closed: no operation surfaces a
/// failure outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
	WalletNotFound,
	TransactionRejected,
	InsufficientBalance,
	CampaignEnded,
	GoalNotReached,
	NetworkError,
	ContractError,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ErrorKind::WalletNotFound => "WALLET_NOT_FOUND",
			ErrorKind::TransactionRejected => "TRANSACTION_REJECTED",
			ErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
			ErrorKind::CampaignEnded => "CAMPAIGN_ENDED",
			ErrorKind::GoalNotReached => "GOAL_NOT_REACHED",
			ErrorKind::NetworkError => "NETWORK_ERROR",
			ErrorKind::ContractError => "CONTRACT_ERROR",
		};
		f.write_str(name)
	}
}

/// A classified failure: kind, human-readable message, and the raw
/// lower-level diagnostic when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct CrowdfundError {
	pub kind: ErrorKind,
	pub message: String,
	pub details: Option<String>,
}

impl CrowdfundError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			details: None,
		}
	}

	pub fn with_details(mut self, details: impl Into<String>) -> Self {
		self.details = Some(details.into());
		self
	}

	pub fn network(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::NetworkError, message)
	}

	pub fn contract(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::ContractError, message)
	}
}
