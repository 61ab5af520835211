//! Poll schedule and status classification for asynchronous image jobs.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tracing::debug;

pub const SUCCESS_STATUS: &str = "succeeded";
pub const FAILURE_STATUSES: [&str; 4] = ["failed", "cancelled", "canceled", "deleted"];

/// A status read from a job's operation location.
pub trait JobReport {
    fn status(&self) -> &str;
}

/// Where a job stands after one status read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` keeps polling until a terminal status is observed.
    pub max_attempts: Option<u32>,
    pub success_status: String,
    pub failure_statuses: Vec<String>,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
            success_status: SUCCESS_STATUS.to_string(),
            failure_statuses: FAILURE_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn unbounded(interval: Duration) -> Self {
        Self::new(interval, None)
    }

    pub fn with_failure_statuses(mut self, statuses: &[&str]) -> Self {
        self.failure_statuses = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Success requires an exact match; failure matching ignores case.
    pub fn classify(&self, status: &str) -> JobStatus {
        if status == self.success_status {
            JobStatus::Succeeded
        } else if self
            .failure_statuses
            .iter()
            .any(|failed| failed.eq_ignore_ascii_case(status))
        {
            JobStatus::Failed
        } else {
            JobStatus::Pending
        }
    }

    /// Sleep before each poll, one entry per allowed attempt.
    pub fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        let schedule = FixedInterval::new(self.interval);
        match self.max_attempts {
            Some(max) => Box::new(schedule.take(max as usize)),
            None => Box::new(schedule),
        }
    }

    /// Sleep, fetch, classify; repeat until the job is terminal or the attempts run out.
    ///
    /// Returns the terminal status with the report that carried it.
    pub async fn wait_for<R, F, Fut>(&self, mut fetch: F) -> Result<(JobStatus, R)>
    where
        R: JobReport,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempts = 0;

        for delay in self.delays() {
            tokio::time::sleep(delay).await;
            attempts += 1;

            let report = fetch().await?;
            debug!("Job poll {}: status {}", attempts, report.status());

            match self.classify(report.status()) {
                JobStatus::Pending => continue,
                terminal => return Ok((terminal, report)),
            }
        }

        Err(Error::PollTimeout { attempts })
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), None)
    }
}
