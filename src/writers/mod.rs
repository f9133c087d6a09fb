pub mod csv_writer;
pub mod sqlite_writer;

pub use csv_writer::CsvWriter;
pub use sqlite_writer::{SqliteWriter, UnifiedDbInfo};
