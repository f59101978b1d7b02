// src/bind/mod.rs

//! Binding an [`Archive`] onto statically declared records.
//!
//! A record type implements [`Bindable`]: it names the table it is read from
//! and builds itself from a [`Scope`], asking for scalar fields by column name
//! and for list fields by element type. Tables are matched to record types and
//! columns to fields purely by name.
//!
//! ```
//! use scsv::{bindable, Archive};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Staff {
//!     people: Vec<Person>,
//! }
//!
//! bindable! {
//!     impl Bindable for Person as "People" {
//!         name: "Name",
//!         age: "Age",
//!     }
//! }
//!
//! bindable! {
//!     impl Bindable for Staff as "Staff" {
//!         people: [Person],
//!     }
//! }
//!
//! let archive = Archive::parse(b"-- People --\nName,Age(int)\nAlice,30\n")?;
//! let staff: Staff = scsv::bind(&archive)?;
//! assert_eq!(staff.people, [Person { name: "Alice".into(), age: 30 }]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod value;

pub use value::FromValue;

use tracing::instrument;

use crate::archive::Archive;
use crate::error::BindError;
use crate::table::Row;

/// A record shape that can be populated from an archive.
pub trait Bindable: Sized {
    /// Name of the table this record's rows come from.
    const TABLE: &'static str;

    /// Build the record from `scope`.
    fn bind(scope: &Scope<'_>) -> Result<Self, BindError>;
}

/// Where a record's scalar fields are read from.
///
/// A top-level scope reads the first row of the record's own table; a row
/// scope reads one row of it.
pub struct Scope<'a> {
    archive: &'a Archive,
    table: &'static str,
    row: Option<&'a Row>,
}

impl<'a> Scope<'a> {
    fn top(archive: &'a Archive, table: &'static str) -> Self {
        Self {
            archive,
            table,
            row: None,
        }
    }

    fn row(archive: &'a Archive, table: &'static str, row: &'a Row) -> Self {
        Self {
            archive,
            table,
            row: Some(row),
        }
    }

    pub fn archive(&self) -> &'a Archive {
        self.archive
    }

    /// Table the scalar fields are read from.
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// A scalar field, read from the column called `name`.
    pub fn field<V: FromValue>(&self, name: &str) -> Result<V, BindError> {
        let row = match self.row {
            Some(row) => row,
            None => self.first_row()?,
        };

        let value = row.value(name).ok_or_else(|| BindError::MissingField {
            table: self.table.to_string(),
            field: name.to_string(),
        })?;

        V::from_value(value).ok_or_else(|| BindError::TypeMismatch {
            table: self.table.to_string(),
            field: name.to_string(),
            expected: V::EXPECTED,
            found: value.ty(),
        })
    }

    /// A list field: one `T` per row of table `T::TABLE`.
    pub fn list<T: Bindable>(&self) -> Result<Vec<T>, BindError> {
        bind_rows(self.archive)
    }

    fn first_row(&self) -> Result<&'a Row, BindError> {
        let table = self
            .archive
            .table(self.table)
            .ok_or_else(|| BindError::MissingTable {
                table: self.table.to_string(),
            })?;
        table.rows().first().ok_or_else(|| BindError::EmptyTable {
            table: self.table.to_string(),
        })
    }
}

/// Populate a top-level record from `archive`.
///
/// Scalar fields come from the first row of the table named `T::TABLE`; list
/// fields bind whole tables, recursing into nested lists.
#[instrument(level = "debug", skip(archive), fields(table = T::TABLE))]
pub fn bind<T: Bindable>(archive: &Archive) -> Result<T, BindError> {
    T::bind(&Scope::top(archive, T::TABLE))
}

/// Bind every row of table `T::TABLE`, in source order.
pub fn bind_rows<T: Bindable>(archive: &Archive) -> Result<Vec<T>, BindError> {
    let table = archive
        .table(T::TABLE)
        .ok_or_else(|| BindError::MissingTable {
            table: T::TABLE.to_string(),
        })?;

    table
        .rows()
        .iter()
        .map(|row| T::bind(&Scope::row(archive, T::TABLE, row)))
        .collect()
}

/// Implement [`Bindable`] for a struct by listing where each field comes from.
///
/// `field: "Column"` reads a scalar column; `field: [Elem]` binds the table
/// of the `Elem` record as a list.
#[macro_export]
macro_rules! bindable {
    (impl Bindable for $ty:ty as $table:literal { $($field:ident : $source:tt),* $(,)? }) => {
        impl $crate::Bindable for $ty {
            const TABLE: &'static str = $table;

            fn bind(
                scope: &$crate::Scope<'_>,
            ) -> ::std::result::Result<Self, $crate::BindError> {
                Ok(Self {
                    $($field: $crate::__bind_field!(scope, $source)),*
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bind_field {
    ($scope:ident, [$elem:ty]) => {
        $scope.list::<$elem>()?
    };
    ($scope:ident, $column:literal) => {
        $scope.field($column)?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScalarType, Value};
    use anyhow::Result;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Person {
        name: String,
        age: i64,
    }

    bindable! {
        impl Bindable for Person as "People" {
            name: "Name",
            age: "Age",
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Staff {
        people: Vec<Person>,
    }

    bindable! {
        impl Bindable for Staff as "Staff" {
            people: [Person],
        }
    }

    const PEOPLE: &[u8] = b"-- People --\nName,Age(int)\nAlice,30\nBob,25\n";

    #[test]
    fn list_field_binds_rows_in_order() -> Result<()> {
        let archive = Archive::parse(PEOPLE)?;
        let staff: Staff = bind(&archive)?;
        assert_eq!(
            staff.people,
            [
                Person {
                    name: "Alice".into(),
                    age: 30
                },
                Person {
                    name: "Bob".into(),
                    age: 25
                }
            ]
        );
        Ok(())
    }

    #[test]
    fn top_level_scalars_read_first_row() -> Result<()> {
        let archive = Archive::parse(PEOPLE)?;
        let first: Person = bind(&archive)?;
        assert_eq!(first.name, "Alice");
        assert_eq!(first.age, 30);
        Ok(())
    }

    #[derive(Debug, Default, PartialEq)]
    struct Toy {
        label: String,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Pet {
        name: String,
        legs: u8,
        toys: Vec<Toy>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Owner {
        name: String,
        weight: f64,
        pets: Vec<Pet>,
    }

    bindable! {
        impl Bindable for Toy as "Toy" { label: "Label" }
    }

    bindable! {
        impl Bindable for Pet as "Pet" {
            name: "Name",
            legs: "Legs",
            toys: [Toy],
        }
    }

    bindable! {
        impl Bindable for Owner as "Owner" {
            name: "Name",
            weight: "Weight",
            pets: [Pet],
        }
    }

    const HOUSEHOLD: &[u8] = b"\
-- Owner --
Name,Weight(float64)
Carol,61.5
-- Pet --
Name,Legs(uint8)
Rex,4
Tweety,2
-- Toy --
Label
ball
bell
";

    #[test]
    fn nested_lists_recurse() -> Result<()> {
        let archive = Archive::parse(HOUSEHOLD)?;
        let owner: Owner = bind(&archive)?;

        assert_eq!(owner.name, "Carol");
        assert_eq!(owner.weight, 61.5);
        assert_eq!(owner.pets.len(), 2);
        assert_eq!(owner.pets[1].name, "Tweety");
        assert_eq!(owner.pets[1].legs, 2);
        // every pet gets the whole Toy table
        for pet in &owner.pets {
            let labels: Vec<&str> = pet.toys.iter().map(|t| t.label.as_str()).collect();
            assert_eq!(labels, ["ball", "bell"]);
        }
        Ok(())
    }

    #[test]
    fn missing_nested_table_is_named() -> Result<()> {
        let archive = Archive::parse(b"-- Owner --\nName,Weight(float64)\nCarol,1\n-- Pet --\nName,Legs(uint8)\nRex,4\n")?;
        let err = bind::<Owner>(&archive).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingTable {
                table: "Toy".into()
            }
        );
        assert_eq!(err.to_string(), "table Toy is not in archive");
        Ok(())
    }

    #[test]
    fn missing_top_level_table() -> Result<()> {
        let archive = Archive::parse(b"-- Pet --\nName,Legs(uint8)\n")?;
        assert_eq!(
            bind::<Person>(&archive).unwrap_err(),
            BindError::MissingTable {
                table: "People".into()
            }
        );
        Ok(())
    }

    #[test]
    fn top_level_scalars_need_a_row() -> Result<()> {
        let archive = Archive::parse(b"-- People --\nName,Age(int)\n")?;
        assert_eq!(
            bind::<Person>(&archive).unwrap_err(),
            BindError::EmptyTable {
                table: "People".into()
            }
        );
        // a list over the same table is simply empty
        let staff: Staff = bind(&archive)?;
        assert!(staff.people.is_empty());
        Ok(())
    }

    #[test]
    fn missing_column_is_reported() -> Result<()> {
        let archive = Archive::parse(b"-- People --\nName\nAlice\n")?;
        assert_eq!(
            bind_rows::<Person>(&archive).unwrap_err(),
            BindError::MissingField {
                table: "People".into(),
                field: "Age".into()
            }
        );
        Ok(())
    }

    #[test]
    fn column_type_must_match_field_type() -> Result<()> {
        let archive = Archive::parse(b"-- People --\nName,Age(int32)\nAlice,30\n")?;
        assert_eq!(
            bind_rows::<Person>(&archive).unwrap_err(),
            BindError::TypeMismatch {
                table: "People".into(),
                field: "Age".into(),
                expected: "i64",
                found: ScalarType::Int32,
            }
        );
        Ok(())
    }

    struct Raw {
        values: Vec<Value>,
    }

    impl Bindable for Raw {
        const TABLE: &'static str = "People";

        fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {
            assert_eq!(scope.table(), "People");
            Ok(Raw {
                values: vec![scope.field("Name")?, scope.field("Age")?],
            })
        }
    }

    #[test]
    fn hand_written_impls_can_take_raw_values() -> Result<()> {
        let archive = Archive::parse(PEOPLE)?;
        let raw = bind_rows::<Raw>(&archive)?;
        assert_eq!(
            raw[1].values,
            [Value::String("Bob".into()), Value::Int(25)]
        );
        Ok(())
    }
}
