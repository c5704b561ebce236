//! Company provider trait definition

use async_trait::async_trait;

use crate::{CompanyQuery, ProviderError, ProviderRecord};

/// Unified provider contract.
///
/// Each data source implements one `search`; the orchestration core never
/// branches on provider identity beyond choosing which providers to invoke.
#[async_trait]
pub trait CompanyProvider: Send + Sync {
    /// Resolve a query to zero-or-more provider-native records.
    ///
    /// An empty list means the provider has no match, which is not an
    /// error. Transport and extraction failures are `ProviderError`.
    async fn search(&self, query: &CompanyQuery) -> Result<Vec<ProviderRecord>, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
