use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::types::MonitorError;

use super::super::api::JobDescriptor;
use super::http::HttpClient;

/// One classified poll response: follow the redirect, ask again later, or
/// hand the terminal payload back.
#[derive(Debug)]
pub enum PollStep {
    Redirect(String),
    Retry,
    Terminal(JobDescriptor),
}

impl PollStep {
    /// `updates` wins over the descriptor's own state: the server is
    /// redirecting us to the real polling URL.
    pub fn from_job(mut job: JobDescriptor) -> Self {
        if let Some(next) = job.updates.take() {
            return PollStep::Redirect(next);
        }
        if job.state.is_terminal() {
            PollStep::Terminal(job)
        } else {
            PollStep::Retry
        }
    }
}

/// Drives one poll chain to its terminal payload.
#[derive(Debug, Clone, Copy)]
pub struct StatusPoller {
    interval: Duration,
    max_attempts: u32,
}

impl StatusPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Polls `path` until a terminal JobDescriptor arrives: redirects are
    /// followed with no delay, a still-running job is re-polled after the
    /// configured interval, and the chain gives up once `max_attempts`
    /// requests have been issued. The cancellation token is honored before
    /// every request and while waiting between re-polls.
    pub async fn run(
        &self,
        http: &HttpClient,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<JobDescriptor, MonitorError> {
        let mut url = path.to_string();
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(MonitorError::Canceled);
            }
            if attempts >= self.max_attempts {
                return Err(MonitorError::PollBudget { url, attempts });
            }
            attempts += 1;

            let job: JobDescriptor = http.get_json(&url).await?;
            match PollStep::from_job(job) {
                PollStep::Redirect(next) => {
                    debug!(from = %url, to = %next, "Following updates redirect");
                    url = next;
                }
                PollStep::Retry => {
                    debug!(url = %url, attempt = attempts, "Job still running, polling again");
                    tokio::select! {
                        _ = sleep(self.interval) => {}
                        _ = cancel.cancelled() => return Err(MonitorError::Canceled),
                    }
                }
                PollStep::Terminal(job) => {
                    debug!(url = %url, state = %job.state, "Job reached terminal state");
                    return Ok(job);
                }
            }
        }
    }
}
