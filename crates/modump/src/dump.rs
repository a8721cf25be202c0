//! Dump orchestration.
//!
//! Drives one run end to end: resolve target databases, emit the preamble,
//! dump each database's creation statements (in dependency order) and data,
//! then emit the trailer. Databases and tables are processed strictly
//! sequentially; the first error aborts the run and already-flushed output
//! stays in place.

use std::io::Write;

use mysql_async::Conn;
use tracing::info;

use crate::config::DumpOptions;
use crate::driver::{catalog, connect, rows};
use crate::error::Result;
use crate::views::{resolve_order, CreateEntry, SubstringDetector};
use crate::writer::{csv::CsvConfig, sql::BufferPool, write_insert, write_load};
use crate::TableKind;

/// Run a complete dump with the given options, writing the SQL stream to
/// `out`. CSV mode additionally writes one side file per table into the
/// current working directory.
pub async fn dump<W: Write>(opts: &DumpOptions, out: &mut W) -> Result<()> {
    let mut opts = opts.clone();
    opts.validate()?;
    opts.clamp_net_buffer_length();

    let csv_conf = opts.to_csv.then(|| {
        CsvConfig::new(opts.csv_field_delimiter, opts.local_infile, opts.enable_escape)
    });

    // `-db all` needs a catalog-wide connection before the database list is
    // known; otherwise connect straight to the first requested database.
    let (mut conn, dbs) = if opts.database == "all" {
        let mut conn = connect::open(&opts, "").await?;
        let dbs = catalog::databases(&mut conn).await?;
        (conn, dbs)
    } else {
        let dbs = opts.databases()?;
        let conn = connect::open(&opts, &dbs[0]).await?;
        (conn, dbs)
    };

    writeln!(out, "SET foreign_key_checks = 0;")?;
    writeln!(out)?;

    let mut pool = BufferPool::new(opts.net_buffer_length);
    for db in &dbs {
        dump_database(&mut conn, &opts, db, out, &mut pool, csv_conf.as_ref()).await?;
    }

    writeln!(out, "SET foreign_key_checks = 1;")?;
    out.flush()?;

    conn.disconnect().await?;
    Ok(())
}

async fn dump_database<W: Write>(
    conn: &mut Conn,
    opts: &DumpOptions,
    db: &str,
    out: &mut W,
    pool: &mut BufferPool,
    csv_conf: Option<&CsvConfig>,
) -> Result<()> {
    let database = catalog::database_type(conn, db, opts.sys_account).await?;

    // The database header is only emitted for a full dump; a table subset
    // is assumed to land in an existing database.
    if opts.tables.is_empty() {
        let create_db = if database.is_subscription() {
            format!("CREATE DATABASE IF NOT EXISTS `{}`", db)
        } else {
            catalog::create_database(conn, db).await?
        };
        writeln!(out, "DROP DATABASE IF EXISTS `{}`;", db)?;
        writeln!(out, "{} ;", create_db)?;
        writeln!(out, "USE `{}`;\n\n", db)?;
    }

    let tables = if database.is_subscription() {
        // Subscription tables are only visible through a connection bound
        // to the database itself.
        let old = std::mem::replace(conn, connect::open(opts, db).await?);
        old.disconnect().await.ok();
        catalog::subscription_tables(conn, &opts.tables).await?
    } else {
        catalog::tables(conn, db, &opts.tables, opts.sys_account).await?
    };

    let mut entries = Vec::with_capacity(tables.len());
    for table in tables {
        let create_sql = match table.kind {
            TableKind::Ordinary | TableKind::External => {
                catalog::create_table(conn, db, &table.name).await?
            }
            TableKind::View => catalog::create_view(conn, db, &table.name).await?,
        };
        entries.push(CreateEntry { table, create_sql });
    }
    resolve_order(&mut entries, &SubstringDetector);

    for entry in &entries {
        let name = &entry.table.name;
        match entry.table.kind {
            TableKind::Ordinary => {
                writeln!(out, "DROP TABLE IF EXISTS `{}`;", name)?;
                write_create(out, &entry.create_sql, false)?;
                if !opts.no_data {
                    let mut source =
                        rows::query_rows(conn, db, name, opts.where_clause.as_deref()).await?;
                    match csv_conf {
                        None => {
                            write_insert(&mut source, out, name, pool, opts.net_buffer_length)
                                .await?;
                        }
                        Some(conf) => {
                            write_load(&mut source, out, db, name, conf).await?;
                        }
                    }
                }
            }
            TableKind::External => {
                writeln!(out, "/*!EXTERNAL TABLE `{}`*/", name)?;
                writeln!(out, "DROP TABLE IF EXISTS `{}`;", name)?;
                write_create(out, &entry.create_sql, true)?;
            }
            TableKind::View => {
                writeln!(out, "DROP VIEW IF EXISTS `{}`;", name)?;
                write_create(out, &entry.create_sql, true)?;
            }
        }
    }

    info!("dumped database `{}` ({} objects)", db, entries.len());
    Ok(())
}

/// Emit a creation statement, appending `;` when missing and an optional
/// blank separator block.
fn write_create<W: Write>(out: &mut W, create_sql: &str, with_separator: bool) -> Result<()> {
    let mut suffix = String::new();
    if !create_sql.ends_with(';') {
        suffix.push(';');
    }
    if with_separator {
        suffix.push_str("\n\n");
    }
    writeln!(out, "{}{}", create_sql, suffix)?;
    Ok(())
}
