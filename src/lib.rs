//! **scsv** - structured CSV archives.
//!
//! An archive packs several named, typed CSV tables into one text file:
//!
//! ```text
//! Free-text comment before the first table.
//!
//! -- People --
//! Name,Age(int)
//! Alice,30
//! Bob,25
//! ```
//!
//! Each table starts with a `-- Name --` banner line. Its first CSV record is
//! the header, where every cell is `Column` or `Column(type)`; the types are
//! listed in [`ScalarType`] and default to `string`. Column names start with an
//! uppercase letter.
//!
//! [`Archive::parse`] decodes the text into tables of typed [`Value`]s, and
//! [`bind`] maps an archive onto records implementing [`Bindable`], which
//! [`codegen`] can generate from an example archive.

pub mod archive;
mod bind;
pub mod codegen;
pub mod error;
pub mod table;
pub mod types;

pub use archive::{parse, parse_file, parse_reader, Archive};
pub use bind::{bind, bind_rows, Bindable, FromValue, Scope};
pub use error::{
    BindError, CoerceError, Error, GenerateError, Result, TableError, UnmarshalError,
};
pub use table::{Column, Row, Table};
pub use types::{ScalarType, Value};

use std::{io::Read, path::Path};

/// Parse `r` and bind it onto `T` in one step.
pub fn from_reader<T: Bindable, R: Read>(r: R) -> std::result::Result<T, UnmarshalError> {
    let archive = Archive::from_reader(r)?;
    Ok(bind(&archive)?)
}

/// Parse `b` and bind it onto `T` in one step.
pub fn from_slice<T: Bindable>(b: &[u8]) -> std::result::Result<T, UnmarshalError> {
    let archive = Archive::parse(b)?;
    Ok(bind(&archive)?)
}

/// Parse the file at `path` and bind it onto `T` in one step.
pub fn from_file<T: Bindable, P: AsRef<Path>>(path: P) -> std::result::Result<T, UnmarshalError> {
    let archive = Archive::from_file(path)?;
    Ok(bind(&archive)?)
}
