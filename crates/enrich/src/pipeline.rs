//! Enrichment pipeline orchestration

use std::sync::Arc;

use crate::reconcile::reconcile;
use crate::{
    CanonicalRecord, CompanyProvider, CompanyQuery, NoopObserver, ProviderError, ProviderRecord,
    RetryObserver, RetryPolicy,
};

/// Drives one classify → fetch → reconcile cycle per attempt, wrapped by the
/// retry policy. Holds no per-query state; one instance serves all requests.
pub struct Enricher {
    registry: Arc<dyn CompanyProvider>,
    directory: Arc<dyn CompanyProvider>,
    policy: RetryPolicy,
}

impl Enricher {
    pub fn new(registry: Arc<dyn CompanyProvider>, directory: Arc<dyn CompanyProvider>) -> Self {
        Self {
            registry,
            directory,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enrich one query without attempt tracking.
    pub async fn enrich(&self, query: &CompanyQuery) -> Result<CanonicalRecord, ProviderError> {
        self.enrich_observed(query, &NoopObserver).await
    }

    /// Enrich one query, reporting per-attempt failures to `observer`.
    ///
    /// An all-null result after the attempt budget means "not found"; only a
    /// final-attempt provider failure surfaces as an error.
    pub async fn enrich_observed(
        &self,
        query: &CompanyQuery,
        observer: &dyn RetryObserver,
    ) -> Result<CanonicalRecord, ProviderError> {
        self.policy.run(observer, || self.attempt(query)).await
    }

    /// One full attempt: query both providers, then merge what settled.
    ///
    /// Registry-number queries resolve the company name through the registry
    /// first, then feed the resolved name to the location-based directory.
    /// Name queries hit both providers concurrently.
    async fn attempt(&self, query: &CompanyQuery) -> Result<CanonicalRecord, ProviderError> {
        let (registry_candidate, directory_listing) = if query.kind.is_registry_number() {
            let candidate = self.first(self.registry.search(query).await?);
            let listing = match candidate.as_ref().and_then(|c| c.company_name.clone()) {
                Some(resolved_name) => {
                    let shaped = CompanyQuery::name(resolved_name, query.location.clone());
                    self.first(self.directory.search(&shaped).await?)
                }
                // No resolved name: the directory cannot be queried meaningfully
                None => None,
            };
            (candidate, listing)
        } else {
            let (registry, directory) = tokio::join!(
                self.registry.search(query),
                self.directory.search(query)
            );
            (self.first(registry?), self.first(directory?))
        };

        Ok(reconcile(
            registry_candidate.as_ref(),
            directory_listing.as_ref(),
        ))
    }

    fn first(&self, mut results: Vec<ProviderRecord>) -> Option<ProviderRecord> {
        if results.is_empty() {
            None
        } else {
            Some(results.swap_remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProviderSource, QueryKind};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(1),
        }
    }

    /// Scripted provider: pops one canned response per search call and
    /// records the queries it was asked.
    struct FakeProvider {
        responses: Mutex<Vec<Result<Vec<ProviderRecord>, ProviderError>>>,
        seen: Mutex<Vec<CompanyQuery>>,
    }

    impl FakeProvider {
        fn new(responses: Vec<Result<Vec<ProviderRecord>, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn always_empty() -> Arc<Self> {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl CompanyProvider for FakeProvider {
        async fn search(
            &self,
            query: &CompanyQuery,
        ) -> Result<Vec<ProviderRecord>, ProviderError> {
            self.seen.lock().push(query.clone());
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Ok(Vec::new())
            } else {
                responses.remove(0)
            }
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn registry_candidate() -> ProviderRecord {
        ProviderRecord {
            source: Some(ProviderSource::Pappers),
            company_name: Some("ACME SAS".to_string()),
            siren: Some("123456789".to_string()),
            ..Default::default()
        }
    }

    fn directory_listing() -> ProviderRecord {
        ProviderRecord {
            source: Some(ProviderSource::Gplaces),
            phone: Some("0102030405".to_string()),
            ..Default::default()
        }
    }

    fn provider_error() -> ProviderError {
        ProviderError::Gplaces(gplaces::GplacesError::Status("UNKNOWN_ERROR".to_string()))
    }

    #[tokio::test]
    async fn test_numeric_query_resolves_name_before_directory() {
        // Scenario: "123456789" resolves to ACME SAS, the directory is then
        // queried with the resolved name and contributes the phone number
        let registry = FakeProvider::new(vec![Ok(vec![registry_candidate()])]);
        let directory = FakeProvider::new(vec![Ok(vec![directory_listing()])]);
        let enricher =
            Enricher::new(registry.clone(), directory.clone()).with_policy(fast_policy());

        let query = CompanyQuery::new("123456789", None);
        assert_eq!(query.kind, QueryKind::Siren);

        let record = enricher.enrich(&query).await.unwrap();
        assert_eq!(record.entreprise_name.as_deref(), Some("ACME SAS"));
        assert_eq!(record.phone_number.as_deref(), Some("0102030405"));
        assert_eq!(record.siren_number.as_deref(), Some("123456789"));

        let seen = directory.seen.lock();
        assert_eq!(seen[0].raw, "ACME SAS");
        assert_eq!(seen[0].kind, QueryKind::Name);
    }

    #[tokio::test]
    async fn test_name_query_fans_out_to_both_providers() {
        let registry = FakeProvider::new(vec![Ok(vec![registry_candidate()])]);
        let directory = FakeProvider::new(vec![Ok(vec![directory_listing()])]);
        let enricher =
            Enricher::new(registry.clone(), directory.clone()).with_policy(fast_policy());

        let record = enricher
            .enrich(&CompanyQuery::new("ACME SAS", Some("Paris".to_string())))
            .await
            .unwrap();

        assert_eq!(record.entreprise_name.as_deref(), Some("ACME SAS"));
        assert_eq!(record.phone_number.as_deref(), Some("0102030405"));
        assert_eq!(registry.seen.lock().len(), 1);
        assert_eq!(directory.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_found_retries_then_returns_empty() {
        // Scenario: both providers empty across all attempts; the run ends
        // with an empty record, not an error
        let registry = FakeProvider::always_empty();
        let directory = FakeProvider::always_empty();
        let enricher =
            Enricher::new(registry.clone(), directory.clone()).with_policy(fast_policy());

        let record = enricher
            .enrich(&CompanyQuery::new("Unknown Co", None))
            .await
            .unwrap();

        assert!(record.is_empty());
        assert_eq!(registry.seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_unresolved_number_skips_directory() {
        let registry = FakeProvider::always_empty();
        let directory = FakeProvider::always_empty();
        let enricher =
            Enricher::new(registry.clone(), directory.clone()).with_policy(fast_policy());

        let record = enricher
            .enrich(&CompanyQuery::new("12345678900012", None))
            .await
            .unwrap();

        assert!(record.is_empty());
        // The directory was never asked: no resolved name existed
        assert!(directory.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_persistent_provider_failure_surfaces_after_budget() {
        let registry = FakeProvider::new(vec![
            Err(provider_error()),
            Err(provider_error()),
            Err(provider_error()),
        ]);
        let directory = FakeProvider::always_empty();
        let enricher = Enricher::new(registry, directory).with_policy(fast_policy());

        let result = enricher.enrich(&CompanyQuery::new("123456789", None)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transient_failure_recovered_by_retry() {
        let registry = FakeProvider::new(vec![
            Err(provider_error()),
            Ok(vec![registry_candidate()]),
        ]);
        let directory = FakeProvider::new(vec![Ok(vec![directory_listing()])]);
        let enricher = Enricher::new(registry, directory).with_policy(fast_policy());

        let record = enricher
            .enrich(&CompanyQuery::new("123456789", None))
            .await
            .unwrap();
        assert_eq!(record.entreprise_name.as_deref(), Some("ACME SAS"));
    }
}
