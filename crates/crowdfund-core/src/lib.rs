//! Transaction lifecycle orchestration for the crowdfund contract.
//!
//! Drives intended ledger operations through simulation, signing,
//! submission, and confirmation, and maps every failure onto the closed
//! error taxonomy in `crowdfund-types`.

pub mod classify;
mod orchestrator;
mod query;
mod service;

#[cfg(test)]
pub(crate) mod testutil;

pub use orchestrator::{Orchestrator, SubmitOutcome};
pub use service::CrowdfundService;
