//! Soroban RPC client — polls `getEvents` and decodes scholarship events.
//!
//! ## Resilience
//!
//! * Transport errors, HTTP 429 and non-fatal JSON-RPC errors are retried
//!   with exponential back-off from [`INITIAL_BACKOFF_SECS`] up to
//!   [`MAX_BACKOFF_SECS`].
//! * JSON-RPC `-32600` (invalid request) and `-32601` (unknown method) are
//!   returned to the caller; retrying them cannot succeed.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, ScholarshipEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn is_fatal(&self) -> bool {
        matches!(self.code, -32600 | -32601)
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list as rendered by the RPC.
    pub topic: Vec<String>,
    /// Event data as rendered by the RPC.
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of events plus where to continue from.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// Exponential back-off schedule.
#[derive(Debug)]
struct Backoff {
    current: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            current: INITIAL_BACKOFF_SECS,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.current);
        self.current = (self.current * 2).min(MAX_BACKOFF_SECS);
        delay
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of contract events, retrying transient failures.
///
/// With a `cursor` the page continues a previous one; otherwise it starts at
/// `start_ledger` (inclusive).
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let delay = backoff.next_delay();
                warn!("RPC request failed (retrying in {delay:?}): {e}");
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let delay = backoff.next_delay();
            warn!("Rate-limited by RPC (retrying in {delay:?})");
            tokio::time::sleep(delay).await;
            continue;
        }

        let text = resp.text().await?;
        let body: RpcResponse = serde_json::from_str(&text)?;

        if let Some(err) = body.error {
            if err.is_fatal() {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            let delay = backoff.next_delay();
            warn!(
                "RPC soft error (retrying in {delay:?}): {} {}",
                err.code, err.message
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            events = result.events.len(),
            latest_ledger = ?result.latest_ledger,
            "fetched event page"
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events. Events from failed invocations are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<ScholarshipEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<ScholarshipEvent> {
    let kind = EventKind::from_topic(&extract_scalar(raw.topic.first()?));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let subject = raw.topic.get(1).map(|t| extract_scalar(t));
    let (scholarship_id, subject_actor) = if kind.keyed_by_scholarship() {
        (subject, None)
    } else {
        (None, subject)
    };

    let data = decode_data(&raw.value, kind);

    Some(ScholarshipEvent {
        event_type: kind.as_str().to_string(),
        scholarship_id,
        application_index: data.index,
        actor: subject_actor.or(data.actor),
        amount: data.amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Debug, Default)]
struct EventData {
    actor: Option<String>,
    amount: Option<String>,
    index: Option<i64>,
}

/// Pull the interesting fields out of the event data blob.
fn decode_data(value: &Value, kind: EventKind) -> EventData {
    let index = || extract_field(value, &["index"]).and_then(|s| s.parse().ok());
    match kind {
        EventKind::ScholarshipCreated => EventData {
            actor: extract_field(value, &["creator"]).or_else(|| find_nested(value, "creator")),
            amount: extract_field(value, &["amount_per_slot"]),
            index: None,
        },
        EventKind::ApplicationSubmitted => EventData {
            actor: extract_field(value, &["applicant"]),
            amount: None,
            index: index(),
        },
        EventKind::ApplicationVerified
        | EventKind::ApplicationRejected
        | EventKind::ApplicationApproved => EventData {
            actor: extract_field(value, &["reviewer"]),
            amount: None,
            index: index(),
        },
        EventKind::ApplicationPaid => EventData {
            actor: extract_field(value, &["applicant"]),
            amount: extract_field(value, &["amount"]),
            index: index(),
        },
        EventKind::RemainderWithdrawn => EventData {
            actor: extract_field(value, &["recipient"]),
            amount: extract_field(value, &["amount"]),
            index: None,
        },
        // The data is the administrator that made the change; the verifier
        // itself comes from the topic.
        EventKind::VerifierAdded | EventKind::VerifierRemoved | EventKind::Unknown => {
            EventData::default()
        }
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn find_nested(value: &Value, key: &str) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };
    map.iter().find_map(|(k, v)| {
        if k == key {
            v.as_str().map(String::from)
        } else {
            find_nested(v, key)
        }
    })
}

/// The RPC renders a topic either as `{"type":…,"value":…}` or as the bare
/// value; return the value as a string.
fn extract_scalar(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        match v.get("value") {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    raw.to_string()
}

/// Parse an RFC 3339 timestamp into Unix seconds.
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
