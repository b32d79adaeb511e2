mod responses;
mod types;

pub use responses::StatusSnapshot;
pub use types::{ActionCommand, ActionResult, JobDescriptor, JobState, SlotIndex, SlotPatch};
