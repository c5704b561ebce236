use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Enrichment job status
///
/// Jobs move along `pending/queued → in_progress/running → {completed,
/// failed}`. `InProgress` is used by single tracked runs, `Running` by batch
/// scrape runs; both are the same active stage. Terminal states accept no
/// further writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Queued,
    InProgress,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::InProgress | JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a transition to `next` is allowed.
    pub fn can_transition(&self, next: JobStatus) -> bool {
        match self {
            JobStatus::Pending | JobStatus::Queued => next.is_active(),
            JobStatus::InProgress | JobStatus::Running => next.is_terminal(),
            JobStatus::Completed | JobStatus::Failed => false,
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "queued" => Ok(JobStatus::Queued),
            "in_progress" => Ok(JobStatus::InProgress),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// Enrichment job entity tracking one long-running run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    /// Requesting user or system identifier
    pub owner: String,
    /// Human-readable description of the input (file name or raw query)
    pub query_source: String,

    pub status: JobStatus,
    pub total_rows: i64,
    pub enriched_count: i64,
    /// Failed attempts recorded by the retry executor during this run
    pub retry_count: i64,
    pub output_link: Option<String>,
    pub last_error: Option<String>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating a new job record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub owner: String,
    pub query_source: String,
    pub total_rows: i64,
}

/// Payload pushed to subscribers on every job transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub id: i64,
    pub name: String,
    pub status: JobStatus,
    pub records: i64,
    pub enriched: i64,
    pub link: Option<String>,
}

impl JobEvent {
    pub fn from_job(job: &Job) -> Self {
        Self {
            id: job.id,
            name: job.query_source.clone(),
            status: job.status,
            records: job.total_rows,
            enriched: job.enriched_count,
            link: job.output_link.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_dispatch_transitions() {
        assert!(JobStatus::Pending.can_transition(JobStatus::InProgress));
        assert!(JobStatus::Queued.can_transition(JobStatus::Running));
        assert!(!JobStatus::Pending.can_transition(JobStatus::Completed));
        assert!(!JobStatus::Queued.can_transition(JobStatus::Pending));
    }

    #[test]
    fn test_active_jobs_only_terminate() {
        assert!(JobStatus::Running.can_transition(JobStatus::Completed));
        assert!(JobStatus::Running.can_transition(JobStatus::Failed));
        assert!(JobStatus::InProgress.can_transition(JobStatus::Failed));
        assert!(!JobStatus::Running.can_transition(JobStatus::Pending));
        assert!(!JobStatus::Running.can_transition(JobStatus::InProgress));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in [
            JobStatus::Pending,
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert!(!JobStatus::Completed.can_transition(next));
            assert!(!JobStatus::Failed.can_transition(next));
        }
    }
}
