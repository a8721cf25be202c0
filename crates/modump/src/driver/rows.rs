//! Live row cursor over the driver's text-protocol result stream.

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, QueryResult, TextProtocol, Value};

use crate::core::{Column, Row, RowSource, TypeTag};
use crate::error::Result;

/// Streaming rows of one table, borrowed from the live connection.
pub struct LiveRows<'a> {
    columns: Vec<Column>,
    inner: QueryResult<'a, 'static, TextProtocol>,
}

/// Start streaming `select * from <db>.<table>`, optionally restricted by a
/// raw WHERE predicate. Column tags are resolved once from the result-set
/// metadata.
pub async fn query_rows<'a>(
    conn: &'a mut Conn,
    db: &str,
    table: &str,
    where_clause: Option<&str>,
) -> Result<LiveRows<'a>> {
    let mut sql = format!("select * from `{}`.`{}`", db, table);
    if let Some(predicate) = where_clause {
        sql.push_str(" where ");
        sql.push_str(predicate);
    }

    let inner = conn.query_iter(sql).await?;
    let columns = inner
        .columns()
        .map(|cols| {
            cols.iter()
                .map(|c| Column {
                    name: c.name_str().into_owned(),
                    tag: TypeTag::from_column(c),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(LiveRows { columns, inner })
}

#[async_trait]
impl RowSource for LiveRows<'_> {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Row>> {
        match self.inner.next().await? {
            None => Ok(None),
            Some(row) => Ok(Some(
                row.unwrap().into_iter().map(value_to_raw).collect(),
            )),
        }
    }
}

/// Convert one protocol value to its raw textual bytes.
///
/// The text protocol delivers column data as bytes or NULL; the remaining
/// variants only appear with prepared statements and are rendered in the
/// server's textual form for completeness.
fn value_to_raw(value: Value) -> Option<Vec<u8>> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(bytes),
        Value::Int(v) => Some(v.to_string().into_bytes()),
        Value::UInt(v) => Some(v.to_string().into_bytes()),
        Value::Float(v) => Some(v.to_string().into_bytes()),
        Value::Double(v) => Some(v.to_string().into_bytes()),
        Value::Date(y, m, d, 0, 0, 0, 0) => {
            Some(format!("{:04}-{:02}-{:02}", y, m, d).into_bytes())
        }
        Value::Date(y, m, d, h, i, s, 0) => Some(
            format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", y, m, d, h, i, s).into_bytes(),
        ),
        Value::Date(y, m, d, h, i, s, us) => Some(
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
                y, m, d, h, i, s, us
            )
            .into_bytes(),
        ),
        Value::Time(neg, d, h, i, s, 0) => {
            let sign = if neg { "-" } else { "" };
            Some(format!("{}{:02}:{:02}:{:02}", sign, u32::from(h) + d * 24, i, s).into_bytes())
        }
        Value::Time(neg, d, h, i, s, us) => {
            let sign = if neg { "-" } else { "" };
            Some(
                format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign,
                    u32::from(h) + d * 24,
                    i,
                    s,
                    us
                )
                .into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_raw_basics() {
        assert_eq!(value_to_raw(Value::NULL), None);
        assert_eq!(
            value_to_raw(Value::Bytes(b"abc".to_vec())),
            Some(b"abc".to_vec())
        );
        assert_eq!(value_to_raw(Value::Int(-7)), Some(b"-7".to_vec()));
        assert_eq!(value_to_raw(Value::UInt(7)), Some(b"7".to_vec()));
    }

    #[test]
    fn test_value_to_raw_temporal() {
        assert_eq!(
            value_to_raw(Value::Date(2024, 1, 2, 0, 0, 0, 0)),
            Some(b"2024-01-02".to_vec())
        );
        assert_eq!(
            value_to_raw(Value::Date(2024, 1, 2, 3, 4, 5, 0)),
            Some(b"2024-01-02 03:04:05".to_vec())
        );
        assert_eq!(
            value_to_raw(Value::Time(true, 1, 2, 3, 4, 0)),
            Some(b"-26:03:04".to_vec())
        );
    }
}
