mod job;

pub use job::JobRepository;
