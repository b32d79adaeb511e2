mod api;
mod client;
mod core;
mod helpers;
mod models;

pub use api::{
    ActionCommand, ActionResult, JobDescriptor, JobState, SlotIndex, SlotPatch, StatusSnapshot,
};
pub use client::ChangerClient;
pub use core::{HttpClient, PollStep, StatusPoller};
pub use models::{ActionState, ChangerOverview, SlotBoard, SlotRow, SlotRowPayload};
pub use tokio_util::sync::CancellationToken;
