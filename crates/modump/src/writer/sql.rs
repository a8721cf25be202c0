//! SQL-mode batch writer.
//!
//! Packs encoded rows into `INSERT INTO t VALUES (..),(..);` statements whose
//! byte length stays within the configured net-buffer budget. A row that is
//! encoded but does not fit in the current statement is carried over in the
//! pending buffer and opens the next statement; a row whose encoding alone
//! exceeds the budget is emitted alone.

use std::io::Write;

use tracing::debug;

use crate::core::RowSource;
use crate::encode::sql_literal;
use crate::error::Result;

/// Reusable batch + pending-row buffer pair.
///
/// Recycled across tables to avoid reallocation; values are reset before
/// each table so there is no cross-table aliasing.
pub struct BufferPool {
    batch: Vec<u8>,
    pending: Vec<u8>,
}

impl BufferPool {
    /// Pre-size the batch buffer to the statement budget.
    pub fn new(net_buffer_length: usize) -> Self {
        Self {
            batch: Vec::with_capacity(net_buffer_length),
            pending: Vec::new(),
        }
    }
}

/// Stream every row of one table as size-bounded `INSERT` statements,
/// followed by a blank separator block. Returns the number of rows written.
///
/// Zero-row tables produce no `INSERT` at all. Each completed statement is
/// flushed immediately so partial output survives later failures.
pub async fn write_insert<S, W>(
    source: &mut S,
    out: &mut W,
    table: &str,
    pool: &mut BufferPool,
    net_buffer_length: usize,
) -> Result<u64>
where
    S: RowSource,
    W: Write,
{
    let batch = &mut pool.batch;
    let pending = &mut pool.pending;
    batch.clear();
    pending.clear();

    let prefix = format!("INSERT INTO `{}` VALUES ", table);
    let columns = source.columns().to_vec();
    let mut rows_written: u64 = 0;
    let mut exhausted = false;

    loop {
        batch.extend_from_slice(prefix.as_bytes());
        let pre_len = batch.len();
        let mut first = true;

        // A carried-over row opens the statement; strip its leading
        // separator.
        if !pending.is_empty() {
            let carried = if pending[0] == b',' {
                &pending[1..]
            } else {
                &pending[..]
            };
            batch.extend_from_slice(carried);
            pending.clear();
            first = false;
            rows_written += 1;
        }

        while !exhausted {
            let Some(row) = source.next_row().await? else {
                exhausted = true;
                break;
            };
            pending.extend_from_slice(if first { b"(" } else { b",(" });
            first = false;
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    pending.push(b',');
                }
                let tag = columns[i].tag;
                sql_literal(pending, tag, value.as_deref());
            }
            pending.push(b')');

            if batch.len() + pending.len() >= net_buffer_length {
                // Leave the row pending for the next statement. If it would
                // be the only row of this statement it exceeds the budget on
                // its own; it is still carried and emitted alone.
                break;
            }
            batch.extend_from_slice(pending);
            pending.clear();
            rows_written += 1;
        }

        if batch.len() > pre_len {
            batch.extend_from_slice(b";\n");
            out.write_all(batch)?;
            out.flush()?;
            batch.clear();
            continue;
        }
        if !pending.is_empty() {
            batch.clear();
            continue;
        }
        batch.clear();
        break;
    }

    debug!("wrote {} rows for table `{}`", rows_written, table);

    out.write_all(b"\n\n\n")?;
    out.flush()?;
    Ok(rows_written)
}
