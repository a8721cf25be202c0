//! Output writers: size-bounded `INSERT` batches and CSV side files.

pub mod csv;
pub mod sql;

pub use csv::{write_load, CsvConfig};
pub use sql::{write_insert, BufferPool};
