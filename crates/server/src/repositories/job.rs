use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{CreateJob, Job, JobStatus};

/// Common SELECT fields for job queries
const SELECT_JOB: &str = r#"
    SELECT
        id, created_at, updated_at,
        owner, query_source, status,
        total_rows, enriched_count, retry_count,
        output_link, last_error, started_at, completed_at
    FROM jobs
"#;

/// Data access for job records.
///
/// State-changing updates are guarded by a status predicate in the WHERE
/// clause, so an update racing a terminal transition affects zero rows
/// instead of resurrecting a finished job.
pub struct JobRepository;

impl JobRepository {
    /// Create a new job record
    pub async fn create(pool: &SqlitePool, data: CreateJob) -> Result<Job, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (owner, query_source, status, total_rows)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&data.owner)
        .bind(&data.query_source)
        .bind(JobStatus::Queued.as_str())
        .bind(data.total_rows)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Self::get_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a job by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_JOB);
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List jobs, most recent first
    pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("{} ORDER BY created_at DESC LIMIT $1", SELECT_JOB);
        let rows = sqlx::query_as::<_, JobRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Dispatch a waiting job: moves it to the given active status and
    /// resets the retry counter. Affects zero rows unless the job is
    /// pending or queued.
    pub async fn mark_started(
        pool: &SqlitePool,
        id: i64,
        status: JobStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                status = $1,
                retry_count = 0,
                enriched_count = 0,
                last_error = NULL,
                started_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status IN ('pending', 'queued')
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record one failed attempt without changing state. Active jobs only.
    pub async fn record_attempt_failure(
        pool: &SqlitePool,
        id: i64,
        error: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                retry_count = retry_count + 1,
                last_error = $1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status IN ('in_progress', 'running')
            "#,
        )
        .bind(error)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Update the enriched-row counter of an active job
    pub async fn set_progress(
        pool: &SqlitePool,
        id: i64,
        enriched_count: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                enriched_count = $1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status IN ('in_progress', 'running')
            "#,
        )
        .bind(enriched_count)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Complete an active job with its final counters and output link
    pub async fn mark_completed(
        pool: &SqlitePool,
        id: i64,
        enriched_count: i64,
        output_link: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                status = 'completed',
                enriched_count = $1,
                output_link = $2,
                completed_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $3 AND status IN ('in_progress', 'running')
            "#,
        )
        .bind(enriched_count)
        .bind(output_link)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fail a job that has not yet terminated. Waiting jobs may be failed
    /// out-of-band by an operator, so pending/queued are accepted too.
    pub async fn mark_failed(
        pool: &SqlitePool,
        id: i64,
        error: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                status = 'failed',
                last_error = $1,
                completed_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status IN ('pending', 'queued', 'in_progress', 'running')
            "#,
        )
        .bind(error)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete completed jobs older than the given number of days
    pub async fn delete_old_completed(pool: &SqlitePool, days: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM jobs
            WHERE status = 'completed'
            AND created_at < datetime('now', $1)
            "#,
        )
        .bind(format!("-{} days", days))
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner: String,
    query_source: String,
    status: String,
    total_rows: i64,
    enriched_count: i64,
    retry_count: i64,
    output_link: Option<String>,
    last_error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner: row.owner,
            query_source: row.query_source,
            status: row.status.parse().unwrap_or_default(),
            total_rows: row.total_rows,
            enriched_count: row.enriched_count,
            retry_count: row.retry_count,
            output_link: row.output_link,
            last_error: row.last_error,
            started_at: row.started_at,
            completed_at: row.completed_at,
        }
    }
}
