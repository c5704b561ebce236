//! Error types for provider operations

/// Errors raised by provider adapters. Adapters never retry; the retry
/// executor owns recovery policy.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Registry error: {0}")]
    Pappers(#[from] pappers::PappersError),

    #[error("Directory error: {0}")]
    Gplaces(#[from] gplaces::GplacesError),
}
