//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical person record persisted by the store.
//! - Own input validation shared by all write paths.
//!
//! # Invariants
//! - `name` is the primary key and must contain at least one
//!   non-whitespace character.
//! - `age` must be a positive integer.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canonical person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Primary key. Unique across the collection.
    pub name: String,
    /// Age in whole years. Always positive for valid records.
    pub age: u32,
}

/// Validation failure for user-supplied person fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Age is zero.
    AgeNotPositive,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::AgeNotPositive => write!(f, "age must be a positive integer"),
        }
    }
}

impl Error for PersonValidationError {}

impl Person {
    /// Creates a person record from raw field values.
    ///
    /// The record is not validated here; repository write paths call
    /// [`Person::validate`] before any SQL mutation.
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Checks the record against domain invariants.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if self.age == 0 {
            return Err(PersonValidationError::AgeNotPositive);
        }
        Ok(())
    }
}
