use thiserror::Error;

use crate::changer_client::SlotIndex;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("changer API error: {0}")]
    Changer(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("slot {0} already has an action in flight")]
    SlotBusy(SlotIndex),

    #[error("slot {0} has no recorded state")]
    UnknownSlot(SlotIndex),

    #[error("poll chain was canceled")]
    Canceled,

    #[error("gave up polling {url} after {attempts} attempts")]
    PollBudget { url: String, attempts: u32 },
}
