//! Completion polling for background jobs.
//!
//! ```text
//! submitted ──► completed | incomplete           (returned as-is, no polling)
//!           ──► failed | cancelled | expired     (JobFailed)
//!           ──► queued | in_progress ──► poll every `interval`
//!                                         ├─ terminal success  ─► Ok
//!                                         ├─ terminal failure  ─► JobFailed
//!                                         ├─ deadline passed   ─► Timeout
//!                                         └─ transport error   ─► propagated, not retried
//! ```
//!
//! The cadence is fixed: no backoff. The remote job keeps running after a local timeout.

use crate::metadata::RunMetadata;
use crate::types::response::{JobResponse, JobStatus};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default interval between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default wall-clock budget for polling one job.
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls forever.
    pub deadline: Option<Duration>,
}

impl PollPolicy {
    /// A zero `deadline` means poll forever.
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self {
            interval,
            deadline: (!deadline.is_zero()).then_some(deadline),
        }
    }

    pub fn forever(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_DEADLINE)
    }
}

/// Source of the current state of a job, by id.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_job(&self, job_id: &str) -> Result<JobResponse>;
}

/// Drive `initial` to a terminal state.
///
/// Returns the final response for terminal-success statuses. Every fetch is logged with
/// the job id and status; status transitions are logged at info, same-status heartbeats
/// at debug.
pub async fn wait_for_completion<S>(
    source: &S,
    initial: JobResponse,
    policy: &PollPolicy,
) -> Result<JobResponse>
where
    S: JobSource + ?Sized,
{
    let resp = poll_to_terminal(source, initial, policy).await?;
    if resp.status.is_terminal_failure() {
        return Err(job_failed(&resp, None));
    }
    Ok(resp)
}

/// Poll until the job is terminal. Terminal failures come back as `Ok` so the caller can
/// build run metadata from the failing response before reporting it.
pub(crate) async fn poll_to_terminal<S>(
    source: &S,
    initial: JobResponse,
    policy: &PollPolicy,
) -> Result<JobResponse>
where
    S: JobSource + ?Sized,
{
    if initial.status.is_terminal_success() || initial.status.is_terminal_failure() {
        return Ok(initial);
    }

    let job_id = initial.id.clone();
    info!(
        job_id = job_id.as_str(),
        status = initial.status.as_str(),
        interval_ms = policy.interval.as_millis() as u64,
        deadline = ?policy.deadline,
        "waiting for job completion"
    );

    let started = Instant::now();
    let deadline = policy.deadline.map(|d| started + d);
    let mut last_status: JobStatus = initial.status;
    let mut poll: u32 = 0;

    loop {
        if let Some(deadline) = deadline {
            if Instant::now() > deadline {
                let waited = started.elapsed();
                warn!(
                    job_id = job_id.as_str(),
                    last_status = last_status.as_str(),
                    waited_ms = waited.as_millis() as u64,
                    polls = poll,
                    "job polling timed out"
                );
                return Err(Error::Timeout {
                    job_id,
                    waited,
                    last_status,
                });
            }
        }

        poll += 1;
        let resp = source.fetch_job(&job_id).await?;

        if resp.status != last_status {
            info!(
                job_id = job_id.as_str(),
                poll,
                from = last_status.as_str(),
                to = resp.status.as_str(),
                "job status changed"
            );
            last_status = resp.status.clone();
        } else {
            debug!(
                job_id = job_id.as_str(),
                poll,
                status = resp.status.as_str(),
                "job poll heartbeat"
            );
        }

        if resp.status.is_terminal_success() || resp.status.is_terminal_failure() {
            return Ok(resp);
        }

        tokio::time::sleep(policy.interval).await;
    }
}

pub(crate) fn job_failed(resp: &JobResponse, metadata: Option<RunMetadata>) -> Error {
    warn!(
        job_id = resp.id.as_str(),
        status = resp.status.as_str(),
        "job ended without output"
    );
    Error::JobFailed {
        job_id: resp.id.clone(),
        status: resp.status.clone(),
        payload: resp.error.clone(),
        metadata: metadata.map(Box::new),
    }
}
