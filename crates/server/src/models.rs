mod enrich;
mod job;

pub use self::enrich::*;
pub use self::job::*;
