mod client;
mod error;
pub mod models;
mod search;

pub use client::PappersClient;
pub use error::PappersError;
pub use models::{Dirigeant, Entreprise, RechercheResponse, Siege};

pub type Result<T> = std::result::Result<T, PappersError>;
