//! Error types for parsing archives and binding them onto records.

use crate::types::ScalarType;

/// Parsing an archive failed. The first failing table aborts the parse.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not load table {table}: {source}")]
    Table {
        table: String,
        #[source]
        source: TableError,
    },
}

/// A single table's header or rows could not be decoded.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column name {name:?} is not capitalized")]
    InvalidColumnName { name: String },

    #[error("column name {name:?} appears more than once in the header")]
    DuplicateColumn { name: String },

    #[error("{ty:?} is not a valid column type")]
    UnknownType { ty: String },

    #[error("could not load row {row}: row has {found} cells but must have {expected}")]
    RowShape {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("could not load row {row}, column {column}: {source}")]
    Coerce {
        row: usize,
        column: String,
        #[source]
        source: CoerceError,
    },
}

/// A cell's text is not a valid literal of its column's type.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{value:?} could not be decoded as type {ty}")]
pub struct CoerceError {
    pub value: String,
    pub ty: ScalarType,
}

/// The destination record does not match the archive.
///
/// These are not input noise: the record declarations and the archive
/// disagree, and the caller has to fix one of them.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("table {table} is not in archive")]
    MissingTable { table: String },

    #[error("table {table} has no rows")]
    EmptyTable { table: String },

    #[error("table {table} has no column {field}")]
    MissingField { table: String, field: String },

    #[error("column {field} of table {table} holds {found} values, which cannot be stored as {expected}")]
    TypeMismatch {
        table: String,
        field: String,
        expected: &'static str,
        found: ScalarType,
    },
}

/// Generated code would not compile.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("{first:?} and {second:?} in {scope} both become the identifier {ident}")]
    Collision {
        scope: String,
        ident: String,
        first: String,
        second: String,
    },
}

/// Error from the one-shot parse-then-bind entry points.
#[derive(thiserror::Error, Debug)]
pub enum UnmarshalError {
    #[error("could not parse archive: {0}")]
    Parse(#[from] Error),

    #[error("could not bind archive: {0}")]
    Bind(#[from] BindError),
}

pub type Result<T> = std::result::Result<T, Error>;
