mod board;
mod overview;

pub use board::{ActionState, SlotBoard, SlotRow, SlotRowPayload};
pub use overview::ChangerOverview;
