//! Provider adapter implementations

mod gplaces_adapter;
mod pappers_adapter;

pub use gplaces_adapter::GplacesProvider;
pub use pappers_adapter::PappersProvider;

/// Normalize an optional provider string: trimmed, and never empty.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
