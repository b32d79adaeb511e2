use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::types::MonitorError;

/// Celery-style job lifecycle state. Anything other than PENDING/PROGRESS
/// is terminal, including states we have never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    Progress,
    Success,
    Failure,
    Other(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Progress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Progress => "PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for JobState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => Self::Pending,
            "PROGRESS" => Self::Progress,
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            _ => Self::Other(raw),
        }
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque slot key, stable across polls. Orders numerically when both sides
/// are integers so slot "10" lists after "9".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotIndex(String);

impl SlotIndex {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotIndex {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for SlotIndex {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Ord for SlotIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SlotIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for SlotIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// The backend sends slot keys as JSON object keys (strings) but slot fields
// inside action results as bare numbers; accept both.
impl<'de> Deserialize<'de> for SlotIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => SlotIndex(text),
            Raw::Number(number) => SlotIndex(number.to_string()),
        })
    }
}

/// Partial view of one slot. Fields absent from a patch leave the previous
/// value alone; a field is never cleared by omission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotPatch {
    #[serde(default)]
    pub full: Option<bool>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCommand {
    Eject,
    Load,
}

impl ActionCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eject => "eject",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal payload of an eject or load job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub slot: SlotIndex,
    pub command: ActionCommand,
    #[serde(default)]
    pub ejected: Option<bool>,
    #[serde(default)]
    pub loaded: Option<bool>,
}

impl ActionResult {
    /// Fullness of the slot after the action. Defaults to full; only a
    /// confirmed eject or a declined load leaves the slot empty.
    pub fn resulting_full(&self) -> bool {
        match self.command {
            ActionCommand::Eject => !self.ejected.unwrap_or(false),
            ActionCommand::Load => self.loaded.unwrap_or(true),
        }
    }
}

/// One response from the changer backend. `updates`, when present, points
/// at the URL that must be polled next instead of the current one.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDescriptor {
    pub state: JobState,
    #[serde(default)]
    pub updates: Option<String>,
    #[serde(default)]
    pub info: Option<Value>,
}

impl JobDescriptor {
    /// Slot map carried by a terminal status job. Accepts both backend
    /// shapes: the map directly under `info`, or nested under `info.status`.
    pub fn slot_map(&self) -> Result<BTreeMap<SlotIndex, SlotPatch>, MonitorError> {
        let info = self.info.as_ref().ok_or_else(|| {
            MonitorError::Changer("status job finished without slot data".to_string())
        })?;
        let map_value = match info.get("status") {
            Some(nested) if nested.is_object() => nested,
            _ => info,
        };
        serde_json::from_value(map_value.clone())
            .map_err(|err| MonitorError::Changer(format!("malformed slot map: {err}")))
    }

    /// Action result carried by a terminal eject/load job.
    pub fn action_result(&self) -> Result<ActionResult, MonitorError> {
        let info = self.info.as_ref().ok_or_else(|| {
            MonitorError::Changer("action job finished without a result".to_string())
        })?;
        serde_json::from_value(info.clone())
            .map_err(|err| MonitorError::Changer(format!("malformed action result: {err}")))
    }
}
