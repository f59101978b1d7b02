// Code generated by scsv. DO NOT EDIT.
//!
//! People and their pets.
//! Ages are in years, weights in kilograms.

use scsv::{BindError, Bindable, Scope};

/// A row of table `People`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct People {
    pub name: String,
    pub age: i64,
    pub weight: f64,
}

impl Bindable for People {
    const TABLE: &'static str = "People";

    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {
        Ok(Self {
            name: scope.field("Name")?,
            age: scope.field("Age")?,
            weight: scope.field("Weight")?,
        })
    }
}

/// A row of table `Pet`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pet {
    pub name: String,
    pub species: String,
    pub legs: u8,
}

impl Bindable for Pet {
    const TABLE: &'static str = "Pet";

    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {
        Ok(Self {
            name: scope.field("Name")?,
            species: scope.field("Species")?,
            legs: scope.field("Legs")?,
        })
    }
}

/// Every table of the archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleArchive {
    pub people: Vec<People>,
    pub pet: Vec<Pet>,
}

impl Bindable for PeopleArchive {
    const TABLE: &'static str = "PeopleArchive";

    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {
        Ok(Self {
            people: scope.list()?,
            pet: scope.list()?,
        })
    }
}
