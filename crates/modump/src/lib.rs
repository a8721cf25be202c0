//! # modump
//!
//! Library behind the `modump` CLI: exports a live database's schema and
//! data into a replayable textual form that can reconstruct the database
//! elsewhere.
//!
//! Two output formats are supported:
//!
//! - **SQL mode**: `CREATE`/`INSERT` statements streamed to stdout, with
//!   every `INSERT` bounded by a configurable byte budget
//! - **CSV mode**: one CSV side file per table plus a `LOAD DATA` statement
//!   referencing it
//!
//! View creation statements are reordered so that every view is emitted
//! after the tables and views it references.
//!
//! ## Example
//!
//! ```rust,no_run
//! use modump::{dump, DumpOptions};
//!
//! #[tokio::main]
//! async fn main() -> modump::Result<()> {
//!     let mut opts = DumpOptions::default();
//!     opts.database = "mydb".to_string();
//!     let mut stdout = std::io::stdout().lock();
//!     dump(&opts, &mut stdout).await
//! }
//! ```

pub mod config;
pub mod core;
pub mod driver;
pub mod dump;
pub mod encode;
pub mod error;
pub mod views;
pub mod writer;

// Re-exports for convenient access
pub use config::{DumpOptions, DEFAULT_NET_BUFFER_LENGTH, MAX_NET_BUFFER_LENGTH, MIN_NET_BUFFER_LENGTH};
pub use core::{Column, Database, Row, RowSource, Table, TableKind, TypeTag};
pub use dump::dump;
pub use error::{DumpError, Result};
