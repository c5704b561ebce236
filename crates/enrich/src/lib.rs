//! Company enrichment engine.
//!
//! This crate turns a partial identification of a business (a name, a SIREN,
//! a SIRET, an address fragment) into one canonical record by querying
//! independent data providers, retrying semantically empty answers, and
//! merging what arrived under an explicit field-precedence policy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             CompanyProvider trait            │
//! │  search(&CompanyQuery) -> Vec<ProviderRecord>│
//! └──────────────────────────────────────────────┘
//!              △                      △
//!              │                      │
//!    ┌─────────┴────────┐   ┌─────────┴────────┐
//!    │ PappersProvider  │   │ GplacesProvider  │
//!    │   (registry)     │   │   (directory)    │
//!    └──────────────────┘   └──────────────────┘
//! ```
//!
//! The [`Enricher`] drives one classify → fetch → reconcile cycle per
//! attempt, wrapped by the [`RetryPolicy`]. Callers project the resulting
//! [`CanonicalRecord`] onto a validated column subset with [`project`].

mod adapters;
mod error;
mod models;
mod pipeline;
mod project;
mod provider;
mod reconcile;
mod retry;

pub use adapters::{GplacesProvider, PappersProvider};
pub use error::ProviderError;
pub use models::{
    CanonicalRecord, CompanyQuery, ProviderRecord, ProviderSource, QueryKind, RegisteredAddress,
};
pub use pipeline::Enricher;
pub use project::{project, validate_columns, ProjectionError};
pub use provider::CompanyProvider;
pub use reconcile::reconcile;
pub use retry::{NoopObserver, RetryObserver, RetryPolicy, MAX_RETRIES, RETRY_DELAY};
