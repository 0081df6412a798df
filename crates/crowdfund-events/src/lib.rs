//! Incremental tailing of the contract's donation events.
//!
//! The tailer keeps a watermark cursor into the ledger's event log, polls
//! on a fixed interval, and delivers new donation events to the subscriber
//! channel. Deduplication is cursor-based and best-effort: overlapping
//! polls can redeliver an event, and that is preserved behavior rather
//! than something to paper over here.

use chrono::Utc;
use crowdfund_rpc::{LedgerClient, LedgerError};
use crowdfund_types::{campaign::decode_i128, DonationEvent, RawLedgerEvent};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Polling cadence.
const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Max events fetched per poll.
const EVENTS_PER_POLL: u32 = 20;
/// How far behind the ledger head a fresh cursor starts, to catch
/// near-term events instead of beginning exactly at the tip.
const START_BACKOFF_LEDGERS: u64 = 100;
/// Retained event buffer bound, newest first.
const RETAINED_EVENTS: usize = 50;
/// Cursor sentinel for "unset"; real ledger sequences start at one.
const CURSOR_UNSET: u64 = 0;

/// Tails donation events for one contract. At most one polling loop is
/// active at a time; `start` while listening and `stop` while idle are
/// both no-ops. Safe under single-threaded invocation of `start`/`stop`.
pub struct EventTailer {
	client: Arc<dyn LedgerClient>,
	contract_id: String,
	poll_interval: Duration,
	task: RwLock<Option<JoinHandle<()>>>,
	cursor: Arc<AtomicU64>,
	recent: Arc<Mutex<VecDeque<DonationEvent>>>,
}

impl EventTailer {
	pub fn new(client: Arc<dyn LedgerClient>, contract_id: impl Into<String>) -> Self {
		Self {
			client,
			contract_id: contract_id.into(),
			poll_interval: POLL_INTERVAL,
			task: RwLock::new(None),
			cursor: Arc::new(AtomicU64::new(CURSOR_UNSET)),
			recent: Arc::new(Mutex::new(VecDeque::new())),
		}
	}

	/// Override the polling cadence. Tests shrink it.
	pub fn with_poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	/// Transition idle -> listening: spawn the polling loop and hand back
	/// its delivery channel. Returns `None` when already listening.
	pub async fn start(&self) -> Option<mpsc::Receiver<DonationEvent>> {
		let mut task = self.task.write().await;
		if task.is_some() {
			debug!("event tailer already listening");
			return None;
		}

		info!(contract_id = %self.contract_id, "starting event polling");
		let (sender, receiver) = mpsc::channel(64);
		let client = self.client.clone();
		let contract_id = self.contract_id.clone();
		let cursor = self.cursor.clone();
		let recent = self.recent.clone();
		let poll_interval = self.poll_interval;

		let handle = tokio::spawn(async move {
			let mut ticker = tokio::time::interval(poll_interval);
			loop {
				ticker.tick().await;

				if cursor.load(Ordering::SeqCst) == CURSOR_UNSET {
					match client.get_latest_ledger().await {
						Ok(latest) => {
							cursor.store(
								latest.saturating_sub(START_BACKOFF_LEDGERS).max(1),
								Ordering::SeqCst,
							);
						}
						Err(err) => {
							warn!(error = %err, "event polling error");
							continue;
						}
					}
				}

				let from = cursor.load(Ordering::SeqCst);
				match poll_once(client.as_ref(), &contract_id, from, EVENTS_PER_POLL).await {
					Ok((events, next_cursor)) => {
						cursor.store(next_cursor, Ordering::SeqCst);
						for event in events {
							record_event(&recent, event.clone());
							if sender.send(event).await.is_err() {
								// Subscriber went away; keep polling until
								// an explicit stop().
								debug!("subscriber dropped, discarding event");
							}
						}
					}
					Err(err) => warn!(error = %err, "event polling error"),
				}
			}
		});
		*task = Some(handle);
		Some(receiver)
	}

	/// Transition listening -> idle. The cursor resets to unset; an
	/// in-flight tick is aborted at its next await point.
	pub async fn stop(&self) {
		let mut task = self.task.write().await;
		if let Some(handle) = task.take() {
			handle.abort();
			self.cursor.store(CURSOR_UNSET, Ordering::SeqCst);
			info!(contract_id = %self.contract_id, "stopped event polling");
		}
	}

	pub async fn is_listening(&self) -> bool {
		self.task.read().await.is_some()
	}

	/// Retained events, newest first, at most [`RETAINED_EVENTS`] entries.
	pub fn recent(&self) -> Vec<DonationEvent> {
		self.recent
			.lock()
			.map(|buffer| buffer.iter().cloned().collect())
			.unwrap_or_default()
	}
}

/// One polling pass: fetch raw events past `cursor`, decode the donations,
/// and compute the advanced cursor. The cursor only moves forward, even
/// when results arrive out of ledger order.
pub async fn poll_once(
	client: &dyn LedgerClient,
	contract_id: &str,
	cursor: u64,
	limit: u32,
) -> Result<(Vec<DonationEvent>, u64), LedgerError> {
	let raw = client.get_events(cursor, contract_id, limit).await?;
	let mut next_cursor = cursor;
	let mut donations = Vec::new();

	for event in raw {
		if let Some(donation) = decode_donation(&event) {
			donations.push(donation);
		}
		next_cursor = next_cursor.max(event.ledger);
	}

	Ok((donations, next_cursor))
}

/// Decode a raw event into a donation if its second topic is the "donate"
/// tag. The observation timestamp is wall-clock time of processing, not
/// ledger time.
fn decode_donation(event: &RawLedgerEvent) -> Option<DonationEvent> {
	if event.topics.len() < 2 {
		return None;
	}
	if event.topics[1].as_str()? != "donate" {
		return None;
	}

	let donor = event
		.value
		.get("donor")
		.and_then(serde_json::Value::as_str)
		.unwrap_or("Unknown")
		.to_string();
	let amount = decode_i128(event.value.get("amount"));

	Some(DonationEvent {
		donor,
		amount,
		observed_at_ms: Utc::now().timestamp_millis(),
		tx_id: event.id.clone(),
	})
}

/// Push an event onto the front of the retained buffer, dropping the
/// oldest entries past the bound.
fn record_event(recent: &Mutex<VecDeque<DonationEvent>>, event: DonationEvent) {
	if let Ok(mut buffer) = recent.lock() {
		buffer.push_front(event);
		buffer.truncate(RETAINED_EVENTS);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use crowdfund_rpc::LedgerResult;
	use crowdfund_types::{
		AccountState, ConfirmationStatus, RawLedgerEvent, SignedEnvelope, SimulationResult,
		SubmissionResult, TransactionEnvelope,
	};
	use serde_json::json;

	struct MockLedger {
		latest_ledger: u64,
		events: Vec<RawLedgerEvent>,
		fail_events: bool,
	}

	impl MockLedger {
		fn with_events(events: Vec<RawLedgerEvent>) -> Self {
			Self {
				latest_ledger: 1_000,
				events,
				fail_events: false,
			}
		}
	}

	#[async_trait]
	impl LedgerClient for MockLedger {
		async fn get_account(&self, account_id: &str) -> LedgerResult<AccountState> {
			Ok(AccountState {
				account_id: account_id.to_string(),
				sequence: 1,
			})
		}

		async fn simulate_transaction(
			&self,
			_envelope: &TransactionEnvelope,
		) -> LedgerResult<SimulationResult> {
			Ok(SimulationResult::Failure {
				diagnostic: "not used".to_string(),
			})
		}

		async fn send_transaction(
			&self,
			_signed: &SignedEnvelope,
		) -> LedgerResult<SubmissionResult> {
			Ok(SubmissionResult::TryAgainLater)
		}

		async fn get_transaction(&self, _hash: &str) -> LedgerResult<ConfirmationStatus> {
			Ok(ConfirmationStatus::NotFound)
		}

		async fn get_latest_ledger(&self) -> LedgerResult<u64> {
			Ok(self.latest_ledger)
		}

		async fn get_events(
			&self,
			from_ledger: u64,
			_contract_id: &str,
			_limit: u32,
		) -> LedgerResult<Vec<RawLedgerEvent>> {
			if self.fail_events {
				return Err(LedgerError::Http("connection refused".to_string()));
			}
			Ok(self
				.events
				.iter()
				.filter(|event| event.ledger >= from_ledger)
				.cloned()
				.collect())
		}
	}

	fn donate_event(id: &str, ledger: u64, donor: &str, amount: i128) -> RawLedgerEvent {
		RawLedgerEvent {
			id: id.to_string(),
			ledger,
			topics: vec![json!("crowdfund"), json!("donate")],
			value: json!({ "donor": donor, "amount": amount.to_string() }),
		}
	}

	fn other_event(id: &str, ledger: u64) -> RawLedgerEvent {
		RawLedgerEvent {
			id: id.to_string(),
			ledger,
			topics: vec![json!("crowdfund"), json!("claim")],
			value: json!({}),
		}
	}

	#[tokio::test]
	async fn test_poll_once_filters_to_donate_topic() {
		let client = MockLedger::with_events(vec![
			donate_event("ev1", 901, "GDONOR", 250),
			other_event("ev2", 902),
			RawLedgerEvent {
				id: "ev3".to_string(),
				ledger: 903,
				topics: vec![json!("crowdfund")],
				value: json!({}),
			},
		]);
		let (events, cursor) = poll_once(&client, "CCONTRACT", 900, 20).await.unwrap();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].donor, "GDONOR");
		assert_eq!(events[0].amount, 250);
		assert_eq!(events[0].tx_id, "ev1");
		assert_eq!(cursor, 903);
	}

	#[tokio::test]
	async fn test_cursor_never_regresses_on_out_of_order_results() {
		let client = MockLedger::with_events(vec![
			donate_event("ev1", 950, "GA", 1),
			donate_event("ev2", 920, "GB", 2),
			donate_event("ev3", 910, "GC", 3),
		]);
		let (_, cursor) = poll_once(&client, "CCONTRACT", 900, 20).await.unwrap();
		assert_eq!(cursor, 950);

		// A poll returning only older ledgers must not move it back.
		let client = MockLedger::with_events(vec![donate_event("ev4", 960, "GD", 4)]);
		let (_, cursor) = poll_once(&client, "CCONTRACT", cursor, 20).await.unwrap();
		assert_eq!(cursor, 960);

		let client = MockLedger::with_events(Vec::new());
		let (_, cursor) = poll_once(&client, "CCONTRACT", cursor, 20).await.unwrap();
		assert_eq!(cursor, 960);
	}

	#[tokio::test]
	async fn test_missing_value_fields_use_defaults() {
		let client = MockLedger::with_events(vec![RawLedgerEvent {
			id: "ev1".to_string(),
			ledger: 901,
			topics: vec![json!("crowdfund"), json!("donate")],
			value: json!({}),
		}]);
		let (events, _) = poll_once(&client, "CCONTRACT", 900, 20).await.unwrap();
		assert_eq!(events[0].donor, "Unknown");
		assert_eq!(events[0].amount, 0);
	}

	#[test]
	fn test_retained_buffer_is_bounded_and_newest_first() {
		let recent = Mutex::new(VecDeque::new());
		for i in 0..60 {
			record_event(
				&recent,
				DonationEvent {
					donor: format!("G{i}"),
					amount: i as i128,
					observed_at_ms: i,
					tx_id: format!("tx{i}"),
				},
			);
		}
		let buffer = recent.lock().unwrap();
		assert_eq!(buffer.len(), RETAINED_EVENTS);
		assert_eq!(buffer.front().unwrap().tx_id, "tx59");
		assert_eq!(buffer.back().unwrap().tx_id, "tx10");
	}

	#[tokio::test]
	async fn test_start_twice_keeps_a_single_loop() {
		let tailer = EventTailer::new(
			Arc::new(MockLedger::with_events(Vec::new())),
			"CCONTRACT",
		)
		.with_poll_interval(Duration::from_millis(5));

		let first = tailer.start().await;
		assert!(first.is_some());
		assert!(tailer.is_listening().await);

		let second = tailer.start().await;
		assert!(second.is_none(), "second start must be a no-op");

		tailer.stop().await;
		assert!(!tailer.is_listening().await);
	}

	#[tokio::test]
	async fn test_stop_while_idle_is_a_noop() {
		let tailer = EventTailer::new(
			Arc::new(MockLedger::with_events(Vec::new())),
			"CCONTRACT",
		);
		tailer.stop().await;
		assert!(!tailer.is_listening().await);
	}

	#[tokio::test]
	async fn test_delivery_and_cursor_initialization() {
		let tailer = EventTailer::new(
			Arc::new(MockLedger::with_events(vec![donate_event(
				"ev1", 950, "GDONOR", 77,
			)])),
			"CCONTRACT",
		)
		.with_poll_interval(Duration::from_millis(5));

		let mut receiver = tailer.start().await.expect("receiver");
		let event = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
			.await
			.expect("delivery in time")
			.expect("channel open");
		assert_eq!(event.donor, "GDONOR");
		assert_eq!(event.amount, 77);

		// Cursor initialized to latest - 100, then advanced to the event.
		assert_eq!(tailer.cursor.load(Ordering::SeqCst), 950);
		assert!(!tailer.recent().is_empty());
		assert_eq!(tailer.recent()[0].tx_id, "ev1");

		tailer.stop().await;
		// Stop clears the cursor for the next session.
		assert_eq!(tailer.cursor.load(Ordering::SeqCst), CURSOR_UNSET);
	}

	#[tokio::test]
	async fn test_polling_faults_are_swallowed_and_loop_survives() {
		let tailer = EventTailer::new(
			Arc::new(MockLedger {
				latest_ledger: 1_000,
				events: Vec::new(),
				fail_events: true,
			}),
			"CCONTRACT",
		)
		.with_poll_interval(Duration::from_millis(5));

		let _receiver = tailer.start().await.expect("receiver");
		tokio::time::sleep(Duration::from_millis(30)).await;
		// Several failed ticks later the loop is still alive.
		assert!(tailer.is_listening().await);
		tailer.stop().await;
	}
}
