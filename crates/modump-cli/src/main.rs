//! modump CLI - Export databases as replayable SQL or CSV dumps.

use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser};
use modump::{dump, DumpError, DumpOptions, DEFAULT_NET_BUFFER_LENGTH};
use tracing::Level;

#[derive(Parser)]
#[command(name = "modump")]
#[command(about = "Export databases as replayable SQL or CSV dumps")]
#[command(version)]
struct Cli {
    /// Username for the connection
    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    /// Password for the connection
    #[arg(short = 'p', long, default_value = "111")]
    password: String,

    /// Server hostname or IP address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'P', long, default_value_t = 6001)]
    port: u16,

    /// Databases to dump, comma-separated, or "all"
    #[arg(long = "db")]
    database: Option<String>,

    /// Tables to dump, comma-separated (default: all tables of the database)
    #[arg(long = "tbl")]
    tables: Option<String>,

    /// Upper bound in bytes for one INSERT statement
    #[arg(long, default_value_t = DEFAULT_NET_BUFFER_LENGTH)]
    net_buffer_length: usize,

    /// Export data as CSV side files with LOAD DATA statements
    #[arg(long)]
    csv: bool,

    /// Field delimiter for CSV files (one character)
    #[arg(long, default_value = ",")]
    csv_field_delimiter: String,

    /// Escape control and quote characters in CSV string fields
    #[arg(long)]
    enable_escape: bool,

    /// Emit LOAD DATA LOCAL INFILE statements
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    local_infile: bool,

    /// Dump table structure only, without row data
    #[arg(long)]
    no_data: bool,

    /// Raw predicate appended to every row query
    #[arg(long = "where")]
    where_clause: Option<String>,

    /// Restrict catalog queries to the sys account
    #[arg(long = "sys")]
    sys_account: bool,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let start = Instant::now();

    match run().await {
        Ok(to_csv) => {
            // The bare invocation only prints help; no success banner then.
            if std::env::args().len() > 1 {
                let stdout = std::io::stdout();
                let _ = write_success_trailer(&mut stdout.lock(), to_csv, start.elapsed());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("modump error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, DumpError> {
    let cli = Cli::parse();
    setup_logging(&cli.verbosity);

    let opts = DumpOptions {
        user: cli.user,
        password: cli.password,
        host: cli.host,
        port: cli.port,
        database: cli.database.unwrap_or_default(),
        tables: split_list(cli.tables.as_deref()),
        net_buffer_length: cli.net_buffer_length,
        to_csv: cli.csv,
        csv_field_delimiter: modump::config::parse_field_delimiter(&cli.csv_field_delimiter)?,
        enable_escape: cli.enable_escape,
        local_infile: cli.local_infile,
        no_data: cli.no_data,
        where_clause: cli.where_clause,
        sys_account: cli.sys_account,
    };

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    dump(&opts, &mut out).await?;
    out.flush()?;

    Ok(opts.to_csv)
}

/// Success banner, followed in CSV mode by the side-file reminder.
fn write_success_trailer<W: Write>(
    out: &mut W,
    to_csv: bool,
    elapsed: std::time::Duration,
) -> std::io::Result<()> {
    writeln!(out, "/* MODUMP SUCCESS, COST {:?} */", elapsed)?;
    if to_csv {
        writeln!(out, "/* !!!MUST KEEP FILE IN CURRENT DIRECTORY, OR YOU SHOULD CHANGE THE PATH IN LOAD DATA STMT!!! */ ")?;
    }
    Ok(())
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn setup_logging(verbosity: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Diagnostics go to stderr; stdout carries the dump stream only.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
