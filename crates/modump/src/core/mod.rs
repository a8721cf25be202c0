//! Core data model shared by the encoder, writers, and orchestrator.

pub mod traits;
pub mod types;

pub use traits::{RowSource, VecRowSource};
pub use types::{Column, Database, Row, Table, TableKind, TypeTag};
