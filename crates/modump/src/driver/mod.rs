//! Live-database access: connection, catalog introspection, row cursor.
//!
//! The connection handle is passed explicitly to every call; there is no
//! process-wide shared connection state.

pub mod catalog;
pub mod connect;
pub mod rows;

pub use connect::open;
pub use rows::{query_rows, LiveRows};
