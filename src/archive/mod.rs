// src/archive/mod.rs

mod banner;

use serde::Serialize;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::table::Table;

/// A decoded archive: the free-text comment before the first banner and every
/// table in the order its banner appears.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Archive {
    comment: String,
    tables: Vec<Table>,
}

impl Archive {
    /// Read all of `r` and decode it.
    pub fn from_reader<R: Read>(mut r: R) -> Result<Archive> {
        let mut b = Vec::new();
        r.read_to_end(&mut b)?;
        Archive::parse(&b)
    }

    /// Open and decode the archive at `path`.
    #[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Archive> {
        let file = File::open(&path)?;
        Archive::from_reader(file)
    }

    /// Decode an in-memory archive.
    ///
    /// The first table that fails to load aborts the whole parse.
    #[instrument(level = "debug", skip(b), fields(len = b.len()))]
    pub fn parse(b: &[u8]) -> Result<Archive> {
        let mut this = banner::locate(b);
        let mut archive = Archive {
            comment: String::from_utf8_lossy(&b[..this.start]).trim().to_string(),
            tables: Vec::new(),
        };

        let mut b = b;
        while !this.is_empty() {
            let name = banner::table_name(&b[this.clone()]);

            // this table's rows run up to the next banner, or the end of input
            let rest = &b[this.end..];
            let next = banner::locate(rest);

            let table = Table::load(name.clone(), &rest[..next.start])
                .map_err(|source| Error::Table { table: name, source })?;
            if archive.table(table.name()).is_some() {
                warn!(table = %table.name(), "duplicate table name; lookups return the first");
            }
            archive.tables.push(table);

            b = rest;
            this = next;
        }

        debug!(tables = archive.tables.len(), "parsed archive");
        Ok(archive)
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Tables in source order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The first table called `name`.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Decode an in-memory archive.
pub fn parse(b: &[u8]) -> Result<Archive> {
    Archive::parse(b)
}

/// Read all of `r` and decode it.
pub fn parse_reader<R: Read>(r: R) -> Result<Archive> {
    Archive::from_reader(r)
}

/// Open and decode the archive at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Archive> {
    Archive::from_file(path)
}
