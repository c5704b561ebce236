mod tabular;

pub use tabular::{parse_rows, write_records, QueryRow, TabularError};
