//! Abstractions between the live database and the serialization engine.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{Column, Row};

/// A stream of raw rows from one table.
///
/// The live implementation wraps the driver's text-protocol cursor
/// ([`crate::driver::rows::LiveRows`]); tests use an in-memory vector.
/// Each row is produced on demand and consumed exactly once by the encoder.
#[async_trait]
pub trait RowSource: Send {
    /// Columns of the result set, with type tags resolved once up front.
    fn columns(&self) -> &[Column];

    /// Pull the next row, or `None` when the table is exhausted.
    async fn next_row(&mut self) -> Result<Option<Row>>;
}

/// In-memory row source for tests and for replaying captured data.
pub struct VecRowSource {
    columns: Vec<Column>,
    rows: std::vec::IntoIter<Row>,
}

impl VecRowSource {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }
}

#[async_trait]
impl RowSource for VecRowSource {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.next())
    }
}
