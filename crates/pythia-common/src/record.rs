//! Wire shapes returned by the prediction service.
//!
//! Records are validated structurally (the expected top-level keys must be
//! present and well-typed) but their contents are passed through to callers
//! unchanged; interpreting the prediction fields is the caller's business.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One day's prediction record, as served by the last-elements endpoint.
///
/// The service names its keys in upper case on the wire (`DID`, `ID`);
/// unknown top-level keys are collected in [`extra`](Self::extra) so the
/// record serializes back to exactly what was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// The day key this record answers for, in YYMMDD form.
    #[serde(rename = "DID")]
    pub did: String,

    /// The service's numeric identifier for the record.
    #[serde(rename = "ID")]
    pub id: i64,

    /// Timestamp labels attached to the prediction run.
    pub ctime: Vec<String>,

    /// The prediction values themselves, keyed by market symbol.
    pub last_elements: Map<String, Value>,

    /// Any further top-level keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the debug endpoint returned, plus how the fetch went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    /// The endpoint's payload, unaltered.
    pub payload: Value,

    /// HTTP status observed on the fetch.
    pub status: u16,

    /// Wall-clock duration of the round trip, in milliseconds.
    pub latency_ms: u64,
}
