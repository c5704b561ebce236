mod client;
mod error;
pub mod models;
mod places;

pub use client::GplacesClient;
pub use error::GplacesError;
pub use models::{Place, PlaceDetails, PlaceDetailsResponse, TextSearchResponse};

pub type Result<T> = std::result::Result<T, GplacesError>;
