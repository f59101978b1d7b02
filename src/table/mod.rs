// src/table/mod.rs

pub mod column;

use csv::{ReaderBuilder, StringRecord};
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use crate::error::TableError;
use crate::types::Value;

pub use column::Column;

/// A named table: a fixed column list and the rows decoded against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

/// One decoded record, keyed by column name in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// The value stored under `column`, if the row has that column.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// `(column name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Look up a column of the schema by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Decode a table body: a header record followed by data records.
    ///
    /// An empty body gives a table with no columns and no rows.
    pub(crate) fn load(name: String, body: &[u8]) -> Result<Table, TableError> {
        let mut table = Table {
            name,
            columns: Vec::new(),
            rows: Vec::new(),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // row width is checked against the header below
            .from_reader(body);
        let mut records = rdr.records();

        let headers = match records.next() {
            Some(record) => record?,
            None => {
                debug!(table = %table.name, "table has no header");
                return Ok(table);
            }
        };
        for header in headers.iter() {
            let col = Column::decode(header)?;
            // a row is a mapping, so each column name may appear once
            if table.column(col.name()).is_some() {
                return Err(TableError::DuplicateColumn {
                    name: col.name().to_string(),
                });
            }
            table.columns.push(col);
        }

        for record in records {
            let record = record?;
            table.push_row(&record)?;
        }

        debug!(
            table = %table.name,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "loaded table"
        );
        Ok(table)
    }

    fn push_row(&mut self, cells: &StringRecord) -> Result<(), TableError> {
        let row = self.rows.len() + 1;
        if cells.len() != self.columns.len() {
            return Err(TableError::RowShape {
                row,
                found: cells.len(),
                expected: self.columns.len(),
            });
        }

        let mut decoded = Vec::with_capacity(self.columns.len());
        for (col, cell) in self.columns.iter().zip(cells.iter()) {
            let value = col
                .ty()
                .coerce(cell.trim())
                .map_err(|source| TableError::Coerce {
                    row,
                    column: col.name().to_string(),
                    source,
                })?;
            decoded.push((col.name().to_string(), value));
        }

        self.rows.push(Row { cells: decoded });
        Ok(())
    }
}
