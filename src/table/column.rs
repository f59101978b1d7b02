// src/table/column.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::TableError;
use crate::types::ScalarType;

/// `ColName(ColType)`
static TYPED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*)\((?P<ty>.*)\)$").expect("header pattern compiles")
});

/// A column of a table's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    name: String,
    #[serde(rename = "type")]
    ty: ScalarType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ScalarType {
        self.ty
    }

    /// Decode one header cell, either `Name` or `Name(Type)`.
    ///
    /// A missing annotation means `string`. The name must start with an
    /// uppercase letter so it lines up with record field names.
    pub fn decode(header: &str) -> Result<Column, TableError> {
        let header = header.trim();

        let (name, ty) = match TYPED_HEADER.captures(header) {
            Some(caps) => (
                caps.name("name").map_or("", |m| m.as_str()).trim(),
                caps.name("ty").map_or("", |m| m.as_str()),
            ),
            None => (header, ScalarType::String.as_str()),
        };

        if !name.chars().next().is_some_and(char::is_uppercase) {
            return Err(TableError::InvalidColumnName {
                name: name.to_string(),
            });
        }

        let ty: String = ty.chars().filter(|c| !c.is_whitespace()).collect();
        let ty = ty
            .parse::<ScalarType>()
            .map_err(|_| TableError::UnknownType { ty })?;

        Ok(Column::new(name, ty))
    }
}
