pub mod csv;

pub use self::csv::{WrittenFile, read_records, write_records};
