use roster_core::db::migrations::latest_version;
use roster_core::db::open_db_in_memory;
use roster_core::{Person, PersonRepository, PersonService, RepoError, SqlitePersonRepository};
use rusqlite::Connection;

#[test]
fn add_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let person = Person::new("Ana", 30);
    repo.add_person(&person).unwrap();

    let loaded = repo.get_person("Ana").unwrap().unwrap();
    assert_eq!(loaded.name, "Ana");
    assert_eq!(loaded.age, 30);
}

#[test]
fn add_existing_name_reports_conflict_and_keeps_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.add_person(&Person::new("Ana", 30)).unwrap();

    let err = repo.add_person(&Person::new("Ana", 40)).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(name) if name == "Ana"));

    let unchanged = repo.get_person("Ana").unwrap().unwrap();
    assert_eq!(unchanged.age, 30);
}

#[test]
fn update_existing_person_overwrites_age() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.add_person(&Person::new("Ana", 30)).unwrap();
    repo.update_person(&Person::new("Ana", 40)).unwrap();

    let loaded = repo.get_person("Ana").unwrap().unwrap();
    assert_eq!(loaded.age, 40);
}

#[test]
fn update_missing_person_reports_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let err = repo.update_person(&Person::new("Ana", 40)).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(name) if name == "Ana"));
    assert!(repo.get_person("Ana").unwrap().is_none());
    assert!(repo.list_persons().unwrap().is_empty());
}

#[test]
fn delete_existing_person_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.add_person(&Person::new("Ana", 30)).unwrap();
    repo.delete_person("Ana").unwrap();

    assert!(repo.get_person("Ana").unwrap().is_none());
}

#[test]
fn delete_missing_person_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let err = repo.delete_person("Ana").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(name) if name == "Ana"));
}

#[test]
fn list_is_empty_on_fresh_database_and_complete_after_adds() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    assert!(repo.list_persons().unwrap().is_empty());

    repo.add_person(&Person::new("Carla", 41)).unwrap();
    repo.add_person(&Person::new("Ana", 30)).unwrap();
    repo.add_person(&Person::new("Bruno", 25)).unwrap();

    let persons = repo.list_persons().unwrap();
    assert_eq!(persons.len(), 3);
    assert_eq!(persons[0], Person::new("Ana", 30));
    assert_eq!(persons[1], Person::new("Bruno", 25));
    assert_eq!(persons[2], Person::new("Carla", 41));
}

#[test]
fn put_inserts_when_absent_and_replaces_when_present() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.put_person(&Person::new("Ana", 30)).unwrap();
    assert_eq!(repo.get_person("Ana").unwrap().unwrap().age, 30);

    repo.put_person(&Person::new("Ana", 40)).unwrap();
    assert_eq!(repo.get_person("Ana").unwrap().unwrap().age, 40);
    assert_eq!(repo.list_persons().unwrap().len(), 1);
}

#[test]
fn record_lifecycle_add_conflict_update_remove() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    repo.add_person(&Person::new("Ana", 30)).unwrap();
    assert_eq!(repo.get_person("Ana").unwrap().unwrap(), Person::new("Ana", 30));

    let err = repo.add_person(&Person::new("Ana", 40)).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(repo.get_person("Ana").unwrap().unwrap(), Person::new("Ana", 30));

    repo.update_person(&Person::new("Ana", 40)).unwrap();
    assert_eq!(repo.get_person("Ana").unwrap().unwrap(), Person::new("Ana", 40));

    repo.delete_person("Ana").unwrap();
    assert!(repo.get_person("Ana").unwrap().is_none());
}

#[test]
fn validation_failure_blocks_all_write_paths() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let blank_name = Person::new("   ", 30);
    let zero_age = Person::new("Ana", 0);

    assert!(matches!(
        repo.add_person(&blank_name).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        repo.put_person(&zero_age).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        repo.update_person(&blank_name).unwrap_err(),
        RepoError::Validation(_)
    ));

    assert!(repo.list_persons().unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let service = PersonService::new(repo);

    let added = service.add_person("Ana", 30).unwrap();
    assert_eq!(added, Person::new("Ana", 30));

    let updated = service.update_person("Ana", 40).unwrap();
    assert_eq!(updated.age, 40);

    let listed = service.list_persons().unwrap();
    assert_eq!(listed, vec![Person::new("Ana", 40)]);

    service.remove_person("Ana").unwrap();
    assert!(service.get_person("Ana").unwrap().is_none());

    let err = service.remove_person("Ana").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqlitePersonRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePersonRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("pessoas"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE pessoas (name TEXT PRIMARY KEY NOT NULL);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePersonRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "pessoas",
            column: "age"
        })
    ));
}

#[test]
fn get_rejects_invalid_persisted_age() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO pessoas (name, age) VALUES ('Ana', -1);", [])
        .unwrap();

    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let err = repo.get_person("Ana").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
