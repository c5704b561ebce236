//! Bounded-attempt retry executor
//!
//! Retries one end-to-end enrichment attempt on failure AND on semantically
//! empty success (a merged record with every field null). Exhausting the
//! budget with empty data is not an error; only a final-attempt failure
//! propagates.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CanonicalRecord, ProviderError};

/// Attempt budget for one enrichment run.
pub const MAX_RETRIES: u32 = 3;
/// Fixed delay between consecutive attempts. No backoff growth.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Receives per-attempt failures so tracked jobs can record retry metadata.
#[async_trait]
pub trait RetryObserver: Send + Sync {
    async fn attempt_failed(&self, attempt: u32, error: &ProviderError);
}

/// Observer that ignores attempt failures (untracked runs).
pub struct NoopObserver;

#[async_trait]
impl RetryObserver for NoopObserver {
    async fn attempt_failed(&self, _attempt: u32, _error: &ProviderError) {}
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it yields a non-empty record or the budget is spent.
    ///
    /// Exit conditions per attempt:
    /// - non-empty record: returned immediately, no further attempts
    /// - empty record: retried; the last one is returned after exhaustion
    /// - error: observer notified, retried; the last error propagates only
    ///   when the final attempt also failed
    pub async fn run<F, Fut>(
        &self,
        observer: &dyn RetryObserver,
        mut op: F,
    ) -> Result<CanonicalRecord, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<CanonicalRecord, ProviderError>>,
    {
        let mut last: Option<Result<CanonicalRecord, ProviderError>> = None;

        for attempt in 1..=self.max_retries {
            match op().await {
                Ok(record) if !record.is_empty() => return Ok(record),
                Ok(record) => {
                    tracing::debug!("Attempt {} produced no usable data", attempt);
                    last = Some(Ok(record));
                }
                Err(error) => {
                    tracing::warn!("Attempt {} failed: {}", attempt, error);
                    observer.attempt_failed(attempt, &error).await;
                    last = Some(Err(error));
                }
            }

            if attempt < self.max_retries {
                tokio::time::sleep(self.delay).await;
            }
        }

        last.unwrap_or_else(|| Ok(CanonicalRecord::default()))
    }
}
