use std::env;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::types::MonitorError;

use super::api::{ActionCommand, ActionResult, SlotIndex, StatusSnapshot};
use super::core::{HttpClient, StatusPoller};
use super::helpers::push_unique_url;
use super::models::SlotBoard;

#[derive(Clone)]
pub struct ChangerClient {
    http: HttpClient,
    poller: StatusPoller,
}

impl ChangerClient {
    /// Locate the changer backend using config/env and prepare an HTTP
    /// client. `CHANGER_API_URL` takes precedence over the configured base.
    pub fn discover(config: &Config) -> Result<Self, MonitorError> {
        let mut base_urls = Vec::new();
        if let Ok(custom) = env::var("CHANGER_API_URL") {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                push_unique_url(&mut base_urls, trimmed.to_string());
            }
        }
        push_unique_url(&mut base_urls, config.base_url.clone());
        if base_urls.is_empty() {
            base_urls.push("http://127.0.0.1:5000".to_string());
        }

        let http = HttpClient::new(base_urls, Duration::from_secs(config.http_timeout_secs))?;
        let poller = StatusPoller::new(
            Duration::from_millis(config.poll_interval_ms),
            config.max_poll_attempts,
        );

        Ok(Self { http, poller })
    }

    /// Drives a status job to its terminal payload and extracts the slot map.
    pub async fn fetch_status(
        &self,
        cancel: &CancellationToken,
    ) -> Result<StatusSnapshot, MonitorError> {
        let job = self.poller.run(&self.http, "/changer/status", cancel).await?;
        let slots = job.slot_map()?;
        debug!(state = %job.state, slots = slots.len(), "Status job completed");
        Ok(StatusSnapshot {
            state: job.state,
            slots,
        })
    }

    /// Refreshes the board in place. A failed refresh marks the board
    /// unreachable instead of discarding rows; the error still propagates so
    /// the caller can log it.
    pub async fn refresh_board(
        &self,
        board: &mut SlotBoard,
        cancel: &CancellationToken,
    ) -> Result<(), MonitorError> {
        match self.fetch_status(cancel).await {
            Ok(snapshot) => {
                board.reconcile(&snapshot.slots);
                board.mark_available(snapshot.state);
                Ok(())
            }
            Err(err) => {
                board.mark_unreachable(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn eject(
        &self,
        slot: &SlotIndex,
        cancel: &CancellationToken,
    ) -> Result<ActionResult, MonitorError> {
        self.run_action(ActionCommand::Eject, slot, cancel).await
    }

    pub async fn load(
        &self,
        slot: &SlotIndex,
        cancel: &CancellationToken,
    ) -> Result<ActionResult, MonitorError> {
        self.run_action(ActionCommand::Load, slot, cancel).await
    }

    /// The per-slot action affordance: eject when full, load when empty.
    /// The slot is Busy while the action job runs; a second toggle during
    /// that window is rejected with `SlotBusy` and issues no request. On a
    /// terminal result the recorded fullness follows the action outcome; on
    /// failure the previous fullness is restored.
    pub async fn toggle_slot(
        &self,
        board: &mut SlotBoard,
        slot: &SlotIndex,
        cancel: &CancellationToken,
    ) -> Result<bool, MonitorError> {
        let full = board.begin_action(slot)?;
        let command = if full {
            ActionCommand::Eject
        } else {
            ActionCommand::Load
        };

        let result = match self.run_action(command, slot, cancel).await {
            Ok(result) => result,
            Err(err) => {
                board.finish_action(slot, full);
                return Err(err);
            }
        };

        let now_full = result.resulting_full();
        info!(slot = %slot, command = %command, full = now_full, "Slot action completed");
        board.finish_action(slot, now_full);
        Ok(now_full)
    }

    async fn run_action(
        &self,
        command: ActionCommand,
        slot: &SlotIndex,
        cancel: &CancellationToken,
    ) -> Result<ActionResult, MonitorError> {
        let path = format!("/changer/{command}/{slot}");
        let job = self.poller.run(&self.http, &path, cancel).await?;
        job.action_result()
    }
}
