//! Person use-case service.
//!
//! # Responsibility
//! - Provide the add/update/remove/list command handlers over an injected
//!   repository.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Each handler issues exactly one conditional store operation; there is
//!   no separate existence check before the write.

use crate::model::person::Person;
use crate::repo::person_repo::{PersonRepository, RepoResult};

/// Command-handler service for person records.
///
/// Constructed over an explicit repository instance; the caller owns the
/// connection lifecycle.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new person.
    ///
    /// Returns `Conflict` when a record with the same name already exists;
    /// the existing record is left untouched.
    pub fn add_person(&self, name: impl Into<String>, age: u32) -> RepoResult<Person> {
        let person = Person::new(name, age);
        self.repo.add_person(&person)?;
        Ok(person)
    }

    /// Overwrites the age of an existing person.
    ///
    /// Returns `NotFound` when no record with the name exists; nothing is
    /// written in that case.
    pub fn update_person(&self, name: impl Into<String>, age: u32) -> RepoResult<Person> {
        let person = Person::new(name, age);
        self.repo.update_person(&person)?;
        Ok(person)
    }

    /// Removes a person by name.
    ///
    /// Returns `NotFound` when no record with the name exists.
    pub fn remove_person(&self, name: &str) -> RepoResult<()> {
        self.repo.delete_person(name)
    }

    /// Gets one person by name.
    pub fn get_person(&self, name: &str) -> RepoResult<Option<Person>> {
        self.repo.get_person(name)
    }

    /// Lists all persons ordered by name.
    pub fn list_persons(&self) -> RepoResult<Vec<Person>> {
        self.repo.list_persons()
    }
}
