//! Job state machine
//!
//! All writes to a job record flow through this service, scoped by job id.
//! Every transition is persisted, pushed to subscribers, and mirrored to the
//! notification channel. Transition validity is enforced twice: by
//! `JobStatus::can_transition` and by status predicates inside the
//! repository's UPDATE statements, so a terminal job can never be revived.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::broadcast;

use enrich::{ProviderError, RetryObserver};

use crate::models::{CreateJob, Job, JobEvent, JobStatus};
use crate::repositories::JobRepository;
use crate::services::NotificationService;

/// Broadcast channel capacity for job events
const BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job {0} not found")]
    NotFound(i64),

    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: i64,
        from: &'static str,
        to: &'static str,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct JobService {
    db: SqlitePool,
    notification: NotificationService,
    broadcaster: broadcast::Sender<JobEvent>,
}

impl JobService {
    pub fn new(db: SqlitePool, notification: NotificationService) -> Self {
        let (broadcaster, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            db,
            notification,
            broadcaster,
        }
    }

    /// Subscribe to job transition events
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.broadcaster.subscribe()
    }

    pub async fn get(&self, id: i64) -> Result<Job, JobError> {
        JobRepository::get_by_id(&self.db, id)
            .await?
            .ok_or(JobError::NotFound(id))
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<Job>, JobError> {
        Ok(JobRepository::list(&self.db, limit).await?)
    }

    /// Create a job in the `queued` state
    pub async fn create(&self, data: CreateJob) -> Result<Job, JobError> {
        let job = JobRepository::create(&self.db, data).await?;
        self.publish(&job);
        Ok(job)
    }

    /// Dispatch a waiting job into the given active status
    pub async fn start(&self, id: i64, status: JobStatus) -> Result<Job, JobError> {
        let updated = JobRepository::mark_started(&self.db, id, status).await?;
        if !updated {
            return Err(self.transition_error(id, status).await);
        }

        let job = self.get(id).await?;
        tracing::info!("Job {} started ({})", job.id, job.query_source);
        self.publish(&job);
        Ok(job)
    }

    /// Record one failed attempt on an active job. Best-effort: a job that
    /// terminated out-of-band in the meantime is left untouched.
    pub async fn attempt_failed(&self, id: i64, error: &str) {
        match JobRepository::record_attempt_failure(&self.db, id, error).await {
            Ok(true) => {
                if let Ok(job) = self.get(id).await {
                    self.publish(&job);
                    self.notification.notify_warning(
                        format!("Job #{} attempt failed", id),
                        format!("Retrying after: {}", error),
                    );
                }
            }
            Ok(false) => {
                tracing::debug!("Job {} no longer active, dropping attempt failure", id);
            }
            Err(e) => {
                tracing::error!("Failed to record attempt failure for job {}: {}", id, e);
            }
        }
    }

    /// Update the enriched-row counter. Best-effort, like `attempt_failed`.
    pub async fn progress(&self, id: i64, enriched_count: i64) {
        match JobRepository::set_progress(&self.db, id, enriched_count).await {
            Ok(true) => {
                if let Ok(job) = self.get(id).await {
                    self.publish(&job);
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Failed to update progress for job {}: {}", id, e);
            }
        }
    }

    /// Complete an active job
    pub async fn complete(
        &self,
        id: i64,
        enriched_count: i64,
        output_link: Option<&str>,
    ) -> Result<Job, JobError> {
        let updated =
            JobRepository::mark_completed(&self.db, id, enriched_count, output_link).await?;
        if !updated {
            return Err(self.transition_error(id, JobStatus::Completed).await);
        }

        let job = self.get(id).await?;
        tracing::info!(
            "Job {} completed: {}/{} rows enriched",
            job.id,
            job.enriched_count,
            job.total_rows
        );
        self.publish(&job);
        self.notification.notify_success(
            format!("Job #{} completed", job.id),
            format!(
                "{}: {} of {} rows enriched",
                job.query_source, job.enriched_count, job.total_rows
            ),
        );
        Ok(job)
    }

    /// Fail a job that has not yet terminated
    pub async fn fail(&self, id: i64, error: &str) -> Result<Job, JobError> {
        let updated = JobRepository::mark_failed(&self.db, id, error).await?;
        if !updated {
            return Err(self.transition_error(id, JobStatus::Failed).await);
        }

        let job = self.get(id).await?;
        tracing::warn!("Job {} failed: {}", job.id, error);
        self.publish(&job);
        self.notification
            .notify_error(format!("Job #{} failed", job.id), error);
        Ok(job)
    }

    /// Whether the batch driver should stop scheduling rows for this job.
    /// True when the job is gone or was failed out-of-band.
    pub async fn is_stopped(&self, id: i64) -> bool {
        match JobRepository::get_by_id(&self.db, id).await {
            Ok(Some(job)) => job.status == JobStatus::Failed,
            Ok(None) => true,
            Err(e) => {
                tracing::error!("Failed to read job {}: {}", id, e);
                false
            }
        }
    }

    fn publish(&self, job: &Job) {
        // Ignore send errors: no subscriber is fine
        let _ = self.broadcaster.send(JobEvent::from_job(job));
    }

    /// A guarded update affected zero rows; work out which error that means.
    async fn transition_error(&self, id: i64, to: JobStatus) -> JobError {
        match JobRepository::get_by_id(&self.db, id).await {
            Ok(Some(job)) => JobError::InvalidTransition {
                id,
                from: job.status.as_str(),
                to: to.as_str(),
            },
            Ok(None) => JobError::NotFound(id),
            Err(e) => JobError::Database(e),
        }
    }
}

/// Bridges per-attempt retry failures into job metadata updates
pub struct JobRetryObserver {
    jobs: Arc<JobService>,
    job_id: i64,
}

impl JobRetryObserver {
    pub fn new(jobs: Arc<JobService>, job_id: i64) -> Self {
        Self { jobs, job_id }
    }
}

#[async_trait]
impl RetryObserver for JobRetryObserver {
    async fn attempt_failed(&self, _attempt: u32, error: &ProviderError) {
        self.jobs
            .attempt_failed(self.job_id, &error.to_string())
            .await;
    }
}
