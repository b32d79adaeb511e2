use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::MonitorError;

use super::super::api::{JobState, SlotIndex, SlotPatch};
use super::super::helpers::format_relative_time;
use super::overview::ChangerOverview;

/// Per-slot action affordance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Idle,
    Busy,
}

/// One display row. Created by the first patch that mentions its index and
/// never destroyed; later patches only overwrite the fields they carry.
#[derive(Debug, Clone)]
pub struct SlotRow {
    index: SlotIndex,
    full: Option<bool>,
    album: Option<String>,
    artist: Option<String>,
    action: ActionState,
    updated_at: Option<DateTime<Utc>>,
}

impl SlotRow {
    fn new(index: SlotIndex) -> Self {
        Self {
            index,
            full: None,
            album: None,
            artist: None,
            action: ActionState::Idle,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: &SlotPatch) {
        if let Some(full) = patch.full {
            self.full = Some(full);
        }
        if let Some(album) = &patch.album {
            self.album = Some(album.clone());
        }
        if let Some(artist) = &patch.artist {
            self.artist = Some(artist.clone());
        }
        self.updated_at = Some(Utc::now());
    }

    pub fn index(&self) -> &SlotIndex {
        &self.index
    }

    pub fn full(&self) -> Option<bool> {
        self.full
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.action == ActionState::Busy
    }

    pub fn state_label(&self) -> &'static str {
        match self.full {
            Some(true) => "Full",
            Some(false) => "Empty",
            None => "Unknown",
        }
    }
}

/// Serialize-ready snapshot of one row.
#[derive(Debug, Clone, Serialize)]
pub struct SlotRowPayload {
    pub index: SlotIndex,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// The live slot table. Owns every row keyed by slot index; all mutation
/// goes through `reconcile` and the action bookkeeping, so there are no
/// ambient lookups of display state.
#[derive(Debug, Default)]
pub struct SlotBoard {
    rows: Vec<SlotRow>,
    overview: ChangerOverview,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one status payload. Rows appear in the order their index was
    /// first seen; indexes missing from `slots` keep their previous state.
    pub fn reconcile(&mut self, slots: &BTreeMap<SlotIndex, SlotPatch>) {
        for (index, patch) in slots {
            let pos = match self.rows.iter().position(|row| &row.index == index) {
                Some(pos) => pos,
                None => {
                    self.rows.push(SlotRow::new(index.clone()));
                    self.rows.len() - 1
                }
            };
            self.rows[pos].apply(patch);
        }
    }

    pub fn mark_available(&mut self, state: JobState) {
        self.overview = ChangerOverview::ok(state);
    }

    /// Records a refresh failure as a renderable condition instead of
    /// tearing the rows down. Cleared by the next successful refresh.
    pub fn mark_unreachable(&mut self, message: String) {
        self.overview = ChangerOverview::error(message);
    }

    pub fn overview(&self) -> &ChangerOverview {
        &self.overview
    }

    pub fn row(&self, index: &SlotIndex) -> Option<&SlotRow> {
        self.rows.iter().find(|row| &row.index == index)
    }

    pub fn rows(&self) -> &[SlotRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Marks the slot Busy and returns its recorded fullness, which decides
    /// whether the pending action is an eject or a load.
    pub fn begin_action(&mut self, index: &SlotIndex) -> Result<bool, MonitorError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| &row.index == index)
            .ok_or_else(|| MonitorError::UnknownSlot(index.clone()))?;
        if row.action == ActionState::Busy {
            return Err(MonitorError::SlotBusy(index.clone()));
        }
        let full = row
            .full
            .ok_or_else(|| MonitorError::UnknownSlot(index.clone()))?;
        row.action = ActionState::Busy;
        Ok(full)
    }

    /// Returns the slot to Idle with its post-action fullness.
    pub fn finish_action(&mut self, index: &SlotIndex, full: bool) {
        if let Some(row) = self.rows.iter_mut().find(|row| &row.index == index) {
            row.action = ActionState::Idle;
            row.full = Some(full);
            row.updated_at = Some(Utc::now());
        }
    }

    pub fn snapshot(&self) -> Vec<SlotRowPayload> {
        self.rows
            .iter()
            .map(|row| SlotRowPayload {
                index: row.index.clone(),
                state: row.state_label().to_string(),
                full: row.full,
                album: row.album.clone(),
                artist: row.artist.clone(),
                busy: row.is_busy(),
                updated: row.updated_at.map(format_relative_time),
            })
            .collect()
    }

    /// Plain-text table for the CLI surface.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.overview.available {
            let reason = self
                .overview
                .errors
                .first()
                .map(String::as_str)
                .unwrap_or("unknown error");
            let _ = writeln!(out, "changer unreachable: {reason}");
        }
        let _ = writeln!(
            out,
            "{:<6} {:<8} {:<28} {:<24} {}",
            "SLOT", "STATE", "ALBUM", "ARTIST", "UPDATED"
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<6} {:<8} {:<28} {:<24} {}",
                row.index,
                row.state_label(),
                row.album.as_deref().unwrap_or("-"),
                row.artist.as_deref().unwrap_or("-"),
                row.updated_at
                    .map(format_relative_time)
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        out
    }
}
