//! Catalog descriptors and the canonical column type classification.

use mysql_async::consts::ColumnType;

use crate::error::{DumpError, Result};

/// Catalog `relkind` value for ordinary tables.
const ORDINARY_REL: &str = "r";
/// Catalog `relkind` value for external tables.
const EXTERNAL_REL: &str = "e";
/// Catalog `relkind` value for views.
const VIEW_REL: &str = "v";

/// Database type string marking a subscription database.
pub const SUBSCRIPTION_DB_TYPE: &str = "subscription";

/// Canonical column type classification.
///
/// Resolved once per query result set from the declared type name (or the
/// wire-level column metadata) and used thereafter by direct branch lookup,
/// instead of re-comparing lower-cased type strings per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Integer family, signed and unsigned.
    Integer,
    /// 32-bit float. Needs special handling for `NaN`/`Inf` tokens.
    Float,
    /// 64-bit float.
    Double,
    Bool,
    Blob,
    Bit,
    Json,
    Text,
    Char,
    Varchar,
    /// Vector types (`vecf32`, `vecf64`); already in literal form.
    Vector,
    /// Empty declared type. The driver cannot always identify BOOL and UUID
    /// columns, so values are classified by inspection.
    Empty,
    /// Anything else; treated as a string.
    Other,
}

impl TypeTag {
    /// Resolve a tag from a declared type name, case-insensitively.
    pub fn from_name(name: &str) -> TypeTag {
        match name.to_ascii_lowercase().as_str() {
            "" => TypeTag::Empty,
            "int" | "tinyint" | "smallint" | "bigint" | "unsigned bigint" | "unsigned int"
            | "unsigned tinyint" | "unsigned smallint" => TypeTag::Integer,
            "float" => TypeTag::Float,
            "double" => TypeTag::Double,
            "bool" | "boolean" => TypeTag::Bool,
            "blob" => TypeTag::Blob,
            "bit" => TypeTag::Bit,
            "json" => TypeTag::Json,
            "text" => TypeTag::Text,
            "char" => TypeTag::Char,
            "varchar" => TypeTag::Varchar,
            "vecf32" | "vecf64" => TypeTag::Vector,
            _ => TypeTag::Other,
        }
    }

    /// Resolve a tag from wire-level column metadata.
    pub fn from_column(col: &mysql_async::Column) -> TypeTag {
        // The binary character set distinguishes blobs from text columns,
        // which share the BLOB wire types.
        const BINARY_CHARSET: u16 = 63;
        match col.column_type() {
            ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG => TypeTag::Integer,
            ColumnType::MYSQL_TYPE_FLOAT => TypeTag::Float,
            ColumnType::MYSQL_TYPE_DOUBLE => TypeTag::Double,
            ColumnType::MYSQL_TYPE_BIT => TypeTag::Bit,
            ColumnType::MYSQL_TYPE_JSON => TypeTag::Json,
            ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB => {
                if col.character_set() == BINARY_CHARSET {
                    TypeTag::Blob
                } else {
                    TypeTag::Text
                }
            }
            ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING => TypeTag::Varchar,
            ColumnType::MYSQL_TYPE_STRING => TypeTag::Char,
            ColumnType::MYSQL_TYPE_NULL => TypeTag::Empty,
            _ => TypeTag::Other,
        }
    }

    /// Whether CSV escaping applies to this tag.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            TypeTag::Text | TypeTag::Char | TypeTag::Varchar | TypeTag::Json
        )
    }
}

/// One column of a query result set: name plus resolved type tag.
///
/// Declared once per result set; immutable for the query's lifetime.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub tag: TypeTag,
}

/// One row of raw value slots. `None` marks SQL NULL.
pub type Row = Vec<Option<Vec<u8>>>;

/// Table object kind, driving the creation statement template and whether
/// data is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Ordinary,
    External,
    View,
}

impl TableKind {
    /// Parse a catalog `relkind` value.
    pub fn parse(table: &str, kind: &str) -> Result<TableKind> {
        match kind {
            ORDINARY_REL => Ok(TableKind::Ordinary),
            EXTERNAL_REL => Ok(TableKind::External),
            VIEW_REL => Ok(TableKind::View),
            other => Err(DumpError::not_supported(format!(
                "table: {} table type: {}",
                table, other
            ))),
        }
    }
}

/// Table descriptor from the catalog.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub kind: TableKind,
}

/// Database descriptor from the catalog.
#[derive(Debug, Clone)]
pub struct Database {
    pub name: String,
    pub db_type: String,
}

impl Database {
    /// Whether this is a subscription database, which is listed and dumped
    /// through `SHOW TABLES` on a dedicated connection.
    pub fn is_subscription(&self) -> bool {
        self.db_type == SUBSCRIPTION_DB_TYPE
    }
}
