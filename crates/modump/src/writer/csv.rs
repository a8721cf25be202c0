//! CSV-mode writer.
//!
//! Streams every row of a table into a side file named
//! `<db>_<table>.csv` in the current working directory, then emits a single
//! `LOAD DATA` statement referencing it. The file path is resolved at dump
//! time and embedded literally, so the file must stay alongside the load
//! statement's execution context.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::core::RowSource;
use crate::encode::{csv_field, CsvEscaper};
use crate::error::{DumpError, Result};

/// CSV output settings, fixed for one dump run.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Field delimiter, a single single-byte character.
    pub field_delimiter: char,
    /// Emit `LOAD DATA LOCAL INFILE` instead of `LOAD DATA INFILE`.
    pub local_infile: bool,
    /// Escape set, compiled once and reused for every field. `None`
    /// disables the escape pass.
    pub escaper: Option<CsvEscaper>,
}

impl CsvConfig {
    pub fn new(field_delimiter: char, local_infile: bool, enable_escape: bool) -> Self {
        Self {
            field_delimiter,
            local_infile,
            escaper: enable_escape.then(CsvEscaper::default),
        }
    }

    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.field_delimiter).map_err(|_| {
            DumpError::invalid_input("csv field delimiter must be a single-byte character")
        })
    }
}

/// Write one table's rows to its CSV side file and emit the `LOAD DATA`
/// statement on `out`. Returns the number of rows written.
pub async fn write_load<S, W>(
    source: &mut S,
    out: &mut W,
    db: &str,
    table: &str,
    conf: &CsvConfig,
) -> Result<u64>
where
    S: RowSource,
    W: Write,
{
    let fname = format!("{}_{}.csv", db, table);
    let file = std::fs::File::create(&fname)?;
    let rows = stream_csv(source, file, conf).await?;
    debug!("wrote {} rows to {}", rows, fname);

    let cwd = std::env::current_dir()?;
    write_load_statement(out, &cwd, &fname, table, conf)?;
    Ok(rows)
}

/// Stream every row from `source` into `sink` using the configured
/// delimiter, quoting fields as needed.
pub(crate) async fn stream_csv<S, W>(source: &mut S, sink: W, conf: &CsvConfig) -> Result<u64>
where
    S: RowSource,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(conf.delimiter_byte()?)
        .from_writer(sink);

    let columns = source.columns().to_vec();
    let mut rows: u64 = 0;
    while let Some(row) = source.next_row().await? {
        let record: Vec<Vec<u8>> = row
            .iter()
            .zip(&columns)
            .map(|(value, col)| csv_field(col.tag, value.as_deref(), conf.escaper.as_ref()))
            .collect();
        writer.write_record(&record)?;
        writer.flush()?;
        rows += 1;
    }
    Ok(rows)
}

fn write_load_statement<W: Write>(
    out: &mut W,
    cwd: &Path,
    fname: &str,
    table: &str,
    conf: &CsvConfig,
) -> Result<()> {
    let local = if conf.local_infile { " LOCAL" } else { "" };
    writeln!(
        out,
        "LOAD DATA{} INFILE '{}/{}' INTO TABLE `{}` FIELDS TERMINATED BY '{}' ENCLOSED BY '\"' LINES TERMINATED BY '\\n' PARALLEL 'FALSE';",
        local,
        cwd.display(),
        fname,
        table,
        conf.field_delimiter
    )?;
    out.flush()?;
    Ok(())
}
