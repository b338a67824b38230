//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `pessoas` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Person::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Conditional writes are single statements: existence checks are never
//!   issued as a separate step before the mutation.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{Person, PersonValidationError};
use log::info;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_TABLE: &str = "pessoas";
const PERSON_COLUMNS: &[&str] = &["name", "age"];
const PERSON_SELECT_SQL: &str = "SELECT name, age FROM pessoas";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for person persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    /// No record exists for the given name.
    NotFound(String),
    /// A record already exists for the given name.
    Conflict(String),
    InvalidData(String),
    /// Connection has no applied schema (`PRAGMA user_version` is zero).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(name) => write!(f, "person not found: {name}"),
            Self::Conflict(name) => write!(f, "person already exists: {name}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version is {actual_version}, expected {expected_version}; \
                 open the database through `open_db` first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for person CRUD operations.
pub trait PersonRepository {
    /// Gets one person by name.
    fn get_person(&self, name: &str) -> RepoResult<Option<Person>>;
    /// Inserts or replaces a person (upsert semantics).
    fn put_person(&self, person: &Person) -> RepoResult<()>;
    /// Inserts a new person; fails with `Conflict` when the name exists.
    fn add_person(&self, person: &Person) -> RepoResult<()>;
    /// Overwrites an existing person; fails with `NotFound` when absent.
    fn update_person(&self, person: &Person) -> RepoResult<()>;
    /// Deletes a person by name; fails with `NotFound` when absent.
    fn delete_person(&self, name: &str) -> RepoResult<()>;
    /// Lists all persons ordered by name.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when no migration has been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        info!("event=repo_ready module=repo status=ok table={PERSON_TABLE}");
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn get_person(&self, name: &str) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE name = ?1;"))?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn put_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        self.conn.execute(
            "INSERT INTO pessoas (name, age) VALUES (?1, ?2)
             ON CONFLICT (name) DO UPDATE SET age = excluded.age;",
            params![person.name.as_str(), person.age],
        )?;

        Ok(())
    }

    fn add_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        // Insert-if-absent in one statement; the primary-key constraint is
        // the existence check.
        let inserted = self.conn.execute(
            "INSERT INTO pessoas (name, age) VALUES (?1, ?2);",
            params![person.name.as_str(), person.age],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::Conflict(person.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE pessoas SET age = ?2 WHERE name = ?1;",
            params![person.name.as_str(), person.age],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.name.clone()));
        }

        Ok(())
    }

    fn delete_person(&self, name: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM pessoas WHERE name = ?1;", [name])?;

        if changed == 0 {
            return Err(RepoError::NotFound(name.to_string()));
        }

        Ok(())
    }

    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY name ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PERSON_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(PERSON_TABLE));
    }

    for column in PERSON_COLUMNS {
        let column_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM pragma_table_info(?1)
                WHERE name = ?2
            );",
            [PERSON_TABLE, column],
            |row| row.get(0),
        )?;
        if column_exists == 0 {
            return Err(RepoError::MissingRequiredColumn {
                table: PERSON_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let name: String = row.get("name")?;

    let age_raw: i64 = row.get("age")?;
    let age = u32::try_from(age_raw).map_err(|_| {
        RepoError::InvalidData(format!("invalid age value `{age_raw}` in pessoas.age"))
    })?;

    let person = Person { name, age };
    person.validate()?;
    Ok(person)
}
