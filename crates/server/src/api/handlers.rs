mod enrich;
mod jobs;

// Re-export all handlers
pub use self::enrich::{enrich, enrich_file};
pub use self::jobs::{fail_job, get_job, job_events, list_jobs};
