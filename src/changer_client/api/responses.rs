use std::collections::BTreeMap;

use super::types::{JobState, SlotIndex, SlotPatch};

/// Terminal result of a status refresh, ready for reconciliation.
pub struct StatusSnapshot {
    pub state: JobState,
    pub slots: BTreeMap<SlotIndex, SlotPatch>,
}
