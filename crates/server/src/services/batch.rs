//! Batch enrichment over uploaded row sets
//!
//! Drives the single-query pipeline once per row with bounded concurrency.
//! Rows are isolated: a row exhausting its retries becomes an empty output
//! line, it never aborts the batch. Output order always matches input order
//! regardless of completion order.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use enrich::{CanonicalRecord, CompanyQuery, Enricher};

use crate::error::AppError;
use crate::models::JobStatus;
use crate::services::jobs::JobRetryObserver;
use crate::services::{JobError, JobService};
use crate::utils::{self, QueryRow};

/// Result of one batch run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Artifact location on disk
    pub path: PathBuf,
    /// Public download link for the artifact
    pub link: String,
    pub total_rows: usize,
    pub enriched: usize,
}

pub struct BatchService {
    enricher: Arc<Enricher>,
    jobs: Arc<JobService>,
    exports_path: PathBuf,
    concurrency: usize,
}

impl BatchService {
    pub fn new(
        enricher: Arc<Enricher>,
        jobs: Arc<JobService>,
        exports_path: PathBuf,
        concurrency: usize,
    ) -> Self {
        Self {
            enricher,
            jobs,
            exports_path,
            concurrency: concurrency.max(1),
        }
    }

    /// Run the batch under the given tracked job and write the CSV artifact.
    pub async fn run(&self, job_id: i64, rows: Vec<QueryRow>) -> Result<BatchOutcome, AppError> {
        self.jobs.start(job_id, JobStatus::Running).await?;

        let total_rows = rows.len();
        let enriched_counter = Arc::new(AtomicI64::new(0));

        let results: Vec<Option<CanonicalRecord>> = stream::iter(rows)
            .map(|row| {
                let enricher = Arc::clone(&self.enricher);
                let jobs = Arc::clone(&self.jobs);
                let counter = Arc::clone(&enriched_counter);
                async move {
                    // An operator failing the job out-of-band stops further
                    // rows, best-effort
                    if jobs.is_stopped(job_id).await {
                        return None;
                    }

                    let record = Self::enrich_row(enricher, Arc::clone(&jobs), job_id, row).await;
                    if record.is_some() {
                        let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        jobs.progress(job_id, count).await;
                    }
                    record
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let enriched = results.iter().filter(|r| r.is_some()).count();

        let file_name = format!("enrichment_{}.csv", job_id);
        let path = self.exports_path.join(&file_name);
        if let Err(e) = utils::write_records(&path, &results) {
            // Never mark a job completed when its artifact could not be
            // persisted
            if let Err(fail_err) = self.jobs.fail(job_id, &e.to_string()).await {
                tracing::error!("Failed to fail job {}: {}", job_id, fail_err);
            }
            return Err(AppError::internal(format!(
                "Failed to write output artifact: {}",
                e
            )));
        }

        let link = format!("/exports/{}", file_name);
        match self.jobs.complete(job_id, enriched as i64, Some(&link)).await {
            Ok(_) => {}
            // The job was failed out-of-band mid-run; the partial artifact
            // stays downloadable
            Err(JobError::InvalidTransition { .. }) => {
                tracing::warn!("Job {} terminated during the run, artifact kept", job_id);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(BatchOutcome {
            path,
            link,
            total_rows,
            enriched,
        })
    }

    /// Enrich one row in isolation: every outcome maps to `Some(record)` or
    /// `None`, errors never escape to the batch driver.
    async fn enrich_row(
        enricher: Arc<Enricher>,
        jobs: Arc<JobService>,
        job_id: i64,
        row: QueryRow,
    ) -> Option<CanonicalRecord> {
        let query = CompanyQuery::new(&row.query, row.location);
        let observer = JobRetryObserver::new(jobs, job_id);

        match enricher.enrich_observed(&query, &observer).await {
            Ok(record) if !record.is_empty() => Some(record),
            Ok(_) => {
                tracing::debug!("No data found for \"{}\"", row.query);
                None
            }
            Err(e) => {
                tracing::error!("Row \"{}\" failed after retries: {}", row.query, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use enrich::{CompanyProvider, ProviderError, ProviderRecord, ProviderSource, RetryPolicy};

    use crate::db::create_pool;
    use crate::models::CreateJob;
    use crate::services::create_notification_service;

    /// Registry double: one known company, one query that always errors,
    /// nothing for anything else.
    struct ScriptedRegistry;

    #[async_trait]
    impl CompanyProvider for ScriptedRegistry {
        async fn search(
            &self,
            query: &CompanyQuery,
        ) -> Result<Vec<ProviderRecord>, ProviderError> {
            match query.raw.as_str() {
                "ACME SAS" => Ok(vec![ProviderRecord {
                    source: Some(ProviderSource::Pappers),
                    company_name: Some("ACME SAS".to_string()),
                    siren: Some("123456789".to_string()),
                    ..Default::default()
                }]),
                "BROKEN Co" => Err(ProviderError::Pappers(pappers::PappersError::Api {
                    status_code: 500,
                    message: "upstream unavailable".to_string(),
                })),
                _ => Ok(Vec::new()),
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    struct EmptyDirectory;

    #[async_trait]
    impl CompanyProvider for EmptyDirectory {
        async fn search(
            &self,
            _query: &CompanyQuery,
        ) -> Result<Vec<ProviderRecord>, ProviderError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "empty"
        }
    }

    fn enricher() -> Arc<Enricher> {
        let policy = RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(1),
        };
        Arc::new(
            Enricher::new(Arc::new(ScriptedRegistry), Arc::new(EmptyDirectory))
                .with_policy(policy),
        )
    }

    async fn job_service() -> Arc<JobService> {
        let pool = create_pool("sqlite::memory:", 1).await.unwrap();
        let notification =
            create_notification_service(Default::default(), reqwest::Client::new());
        Arc::new(JobService::new(pool, notification))
    }

    fn upload_job(total_rows: i64) -> CreateJob {
        CreateJob {
            owner: "tests".to_string(),
            query_source: "companies.csv".to_string(),
            total_rows,
        }
    }

    fn row(query: &str, location: Option<&str>) -> QueryRow {
        QueryRow {
            query: query.to_string(),
            location: location.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn test_rows_are_isolated_and_order_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = job_service().await;
        let batch = BatchService::new(enricher(), Arc::clone(&jobs), dir.path().to_path_buf(), 2);

        let rows = vec![
            row("ACME SAS", Some("Paris")),
            row("BROKEN Co", None),
            row("Ghost SARL", None),
        ];
        let job = jobs.create(upload_job(rows.len() as i64)).await.unwrap();

        let outcome = batch.run(job.id, rows).await.unwrap();
        assert_eq!(outcome.total_rows, 3);
        assert_eq!(outcome.enriched, 1);

        // The erroring row never aborted the batch; its attempts are on
        // record and the job still completed
        let job = jobs.get(job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.enriched_count, 1);
        assert_eq!(job.retry_count, 3);
        assert_eq!(job.output_link.as_deref(), Some(outcome.link.as_str()));

        let content = std::fs::read_to_string(&outcome.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("ACME SAS,"));
        // Failed and not-found rows stay aligned as empty lines
        assert!(lines[2].chars().all(|c| c == ','));
        assert!(lines[3].chars().all(|c| c == ','));
    }

    #[tokio::test]
    async fn test_unwritable_artifact_fails_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let exports = dir.path().join("missing");
        let jobs = job_service().await;
        let batch = BatchService::new(enricher(), Arc::clone(&jobs), exports, 1);

        let job = jobs.create(upload_job(1)).await.unwrap();
        let result = batch.run(job.id, vec![row("ACME SAS", None)]).await;
        assert!(result.is_err());

        let job = jobs.get(job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_terminated_job_is_not_dispatched() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = job_service().await;
        let batch = BatchService::new(enricher(), Arc::clone(&jobs), dir.path().to_path_buf(), 1);

        let job = jobs.create(upload_job(1)).await.unwrap();
        jobs.fail(job.id, "Marked failed by operator").await.unwrap();

        let result = batch.run(job.id, vec![row("ACME SAS", None)]).await;
        assert!(result.is_err());
        // No artifact was produced for the dead job
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
