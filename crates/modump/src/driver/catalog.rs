//! Catalog introspection against the live handle.
//!
//! Queries `mo_catalog` for database and table descriptors and fetches
//! creation statements via `show create`.

use std::collections::HashMap;

use mysql_async::prelude::Queryable;
use mysql_async::Conn;
use tracing::debug;

use crate::core::{Database, Table, TableKind};
use crate::error::{DumpError, Result};

/// List every database visible to the connection (for `-db all`).
pub async fn databases(conn: &mut Conn) -> Result<Vec<String>> {
    let dbs: Vec<String> = conn.query("show databases").await?;
    debug!("found {} databases", dbs.len());
    Ok(dbs)
}

/// Look up one database descriptor. Exactly one catalog row is expected.
pub async fn database_type(conn: &mut Conn, db: &str, sys_account: bool) -> Result<Database> {
    let mut sql = format!(
        "select datname, dat_type from mo_catalog.mo_database where datname = '{}'",
        db
    );
    if sys_account {
        sql.push_str(" and account_id = 0");
    }

    let mut rows: Vec<(String, String)> = conn.query(sql).await?;
    match (rows.pop(), rows.is_empty()) {
        (Some((name, db_type)), true) => Ok(Database { name, db_type }),
        _ => Err(DumpError::invalid_input(format!(
            "database {} not exists",
            db
        ))),
    }
}

/// List the tables of one database, restricted to `requested` when
/// non-empty. Internal catalog helper tables are skipped. Every requested
/// table must exist.
pub async fn tables(
    conn: &mut Conn,
    db: &str,
    requested: &[String],
    sys_account: bool,
) -> Result<Vec<Table>> {
    let mut sql = format!(
        "select relname, relkind from mo_catalog.mo_tables where reldatabase = '{}'",
        db
    );
    if sys_account {
        sql.push_str(" and account_id = 0");
    }

    let mut seen: HashMap<String, bool> = HashMap::with_capacity(requested.len());
    if !requested.is_empty() {
        sql.push_str(" and relname in (");
        for (i, name) in requested.iter().enumerate() {
            if i != 0 {
                sql.push(',');
            }
            sql.push('\'');
            sql.push_str(name);
            sql.push('\'');
            seen.insert(name.clone(), false);
        }
        sql.push(')');
    }

    let rows: Vec<(String, String)> = conn.query(sql).await?;
    let mut out = Vec::with_capacity(rows.len());
    for (name, kind) in rows {
        if name.starts_with("__mo_") || name.starts_with("%!%") {
            continue;
        }
        let kind = TableKind::parse(&name, &kind)?;
        seen.insert(name.clone(), true);
        out.push(Table { name, kind });
    }

    for (name, found) in &seen {
        if !found {
            return Err(DumpError::invalid_input(format!(
                "table {} not exists",
                name
            )));
        }
    }

    debug!("found {} tables in `{}`", out.len(), db);
    Ok(out)
}

/// List the tables of a subscription database via `SHOW TABLES` on a
/// connection bound to it. All tables are treated as ordinary.
pub async fn subscription_tables(conn: &mut Conn, requested: &[String]) -> Result<Vec<Table>> {
    let mut seen: HashMap<String, bool> =
        requested.iter().map(|t| (t.clone(), false)).collect();

    let names: Vec<String> = conn.query("SHOW TABLES").await?;
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if !requested.is_empty() && !seen.contains_key(&name) {
            continue;
        }
        seen.insert(name.clone(), true);
        out.push(Table {
            name,
            kind: TableKind::Ordinary,
        });
    }

    for (name, found) in &seen {
        if !found {
            return Err(DumpError::invalid_input(format!(
                "table {} not exists",
                name
            )));
        }
    }

    Ok(out)
}

/// Fetch the creation statement of a database.
pub async fn create_database(conn: &mut Conn, db: &str) -> Result<String> {
    let row: Option<(String, String)> = conn
        .query_first(format!("show create database `{}`", db))
        .await?;
    row.map(|(_, create)| create)
        .ok_or_else(|| DumpError::invalid_input(format!("database {} not exists", db)))
}

/// Fetch the creation statement of a table.
pub async fn create_table(conn: &mut Conn, db: &str, table: &str) -> Result<String> {
    let row: Option<(String, String)> = conn
        .query_first(format!("show create table `{}`.`{}`", db, table))
        .await?;
    row.map(|(_, create)| create)
        .ok_or_else(|| DumpError::invalid_input(format!("table {} not exists", table)))
}

/// Fetch the creation statement of a view. The result row carries two extra
/// character-set columns that are ignored.
pub async fn create_view(conn: &mut Conn, db: &str, table: &str) -> Result<String> {
    let row: Option<(String, String, String, String)> = conn
        .query_first(format!("show create table `{}`.`{}`", db, table))
        .await?;
    row.map(|(_, create, _, _)| create)
        .ok_or_else(|| DumpError::invalid_input(format!("table {} not exists", table)))
}
