use crate::errors::storage_error::StorageError;
use crate::models::contact::{Contact, ContactChanges, NewContact};
use crate::schema::contacts::{dsl::contacts, email, first_name, id, last_name};
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::{
    ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper,
    SqliteConnection, dsl::insert_into, sql_query,
};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// SQLite allows one writer at a time. Without a busy timeout a write that
/// overlaps another writer's transaction fails immediately with "database is
/// locked"; with it, the blocked writer waits its turn.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        sql_query("PRAGMA busy_timeout = 5000")
            .execute(connection)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .test_on_check_out(true)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
}

/// Creates the contacts table if it doesn't exist yet. Never drops or
/// alters existing data. AUTOINCREMENT keeps ids monotonic, so a deleted
/// contact's id is never handed out again.
pub fn ensure_schema(connection: &mut SqliteConnection) -> Result<(), StorageError> {
    sql_query(
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name VARCHAR(80) NOT NULL,
            last_name VARCHAR(80) NOT NULL,
            email VARCHAR(120) NOT NULL UNIQUE
        )",
    )
    .execute(connection)?;

    Ok(())
}

/// All contacts in insertion order.
pub fn list_all(connection: &mut SqliteConnection) -> Result<Vec<Contact>, StorageError> {
    let records = contacts
        .order(id.asc())
        .select(Contact::as_select())
        .load(connection)?;

    Ok(records)
}

pub fn insert(
    connection: &mut SqliteConnection,
    new_contact: NewContact,
) -> Result<Contact, StorageError> {
    let record = insert_into(contacts)
        .values(&new_contact)
        .returning(Contact::as_returning())
        .get_result(connection)?;

    Ok(record)
}

pub fn get_by_id(
    connection: &mut SqliteConnection,
    contact_id: i32,
) -> Result<Option<Contact>, StorageError> {
    let record = contacts
        .find(contact_id)
        .select(Contact::as_select())
        .first(connection)
        .optional()?;

    Ok(record)
}

/// Applies the provided fields over the stored record; omitted fields keep
/// their current value.
pub fn update(
    connection: &mut SqliteConnection,
    contact_id: i32,
    changes: ContactChanges,
) -> Result<Contact, StorageError> {
    let existing = contacts
        .find(contact_id)
        .select(Contact::as_select())
        .first::<Contact>(connection)?;

    let record = diesel::update(contacts.find(contact_id))
        .set((
            first_name.eq(changes.first_name.unwrap_or(existing.first_name)),
            last_name.eq(changes.last_name.unwrap_or(existing.last_name)),
            email.eq(changes.email.unwrap_or(existing.email)),
        ))
        .returning(Contact::as_returning())
        .get_result(connection)?;

    Ok(record)
}

pub fn delete(connection: &mut SqliteConnection, contact_id: i32) -> Result<(), StorageError> {
    let deleted = diesel::delete(contacts.find(contact_id)).execute(connection)?;

    if deleted == 0 {
        return Err(StorageError::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::Connection;

    fn connection() -> SqliteConnection {
        let mut connection = SqliteConnection::establish(":memory:").unwrap();
        ensure_schema(&mut connection).unwrap();
        connection
    }

    fn ann<'a>() -> NewContact<'a> {
        NewContact {
            first_name: "Ann",
            last_name: "Lee",
            email: "a@b.com",
        }
    }

    #[test]
    fn insert_assigns_fresh_ids_and_list_preserves_insertion_order() {
        let connection = &mut connection();

        let first = insert(connection, ann()).unwrap();
        let second = insert(
            connection,
            NewContact {
                first_name: "Bob",
                last_name: "Kim",
                email: "b@c.com",
            },
        )
        .unwrap();

        assert_ne!(first.id, second.id);

        let all = list_all(connection).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all[1], second);
    }

    #[test]
    fn duplicate_email_is_a_constraint_violation_and_first_record_survives() {
        let connection = &mut connection();

        let first = insert(connection, ann()).unwrap();

        let result = insert(
            connection,
            NewContact {
                first_name: "Other",
                last_name: "Person",
                email: "a@b.com",
            },
        );
        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));

        let all = list_all(connection).unwrap();
        assert_eq!(all, vec![first]);
    }

    #[test]
    fn get_by_id_returns_none_for_missing_id() {
        let connection = &mut connection();

        assert_eq!(get_by_id(connection, 42).unwrap(), None);

        let stored = insert(connection, ann()).unwrap();
        let fetched = get_by_id(connection, stored.id).unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[test]
    fn update_changes_only_provided_fields() {
        let connection = &mut connection();
        let stored = insert(connection, ann()).unwrap();

        let updated = update(
            connection,
            stored.id,
            ContactChanges {
                last_name: Some(String::from("Wong")),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.first_name, "Ann");
        assert_eq!(updated.last_name, "Wong");
        assert_eq!(updated.email, "a@b.com");
    }

    #[test]
    fn update_of_missing_id_is_not_found() {
        let connection = &mut connection();

        let result = update(
            connection,
            7,
            ContactChanges {
                email: Some(String::from("new@x.com")),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert!(list_all(connection).unwrap().is_empty());
    }

    #[test]
    fn update_to_an_email_held_by_another_contact_fails() {
        let connection = &mut connection();
        insert(connection, ann()).unwrap();
        let second = insert(
            connection,
            NewContact {
                first_name: "Bob",
                last_name: "Kim",
                email: "b@c.com",
            },
        )
        .unwrap();

        let result = update(
            connection,
            second.id,
            ContactChanges {
                email: Some(String::from("a@b.com")),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
    }

    #[test]
    fn delete_removes_the_record_and_a_second_delete_is_not_found() {
        let connection = &mut connection();
        let stored = insert(connection, ann()).unwrap();

        delete(connection, stored.id).unwrap();
        assert!(list_all(connection).unwrap().is_empty());

        let result = delete(connection, stored.id);
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let connection = &mut connection();
        let first = insert(connection, ann()).unwrap();
        delete(connection, first.id).unwrap();

        let second = insert(
            connection,
            NewContact {
                first_name: "Bob",
                last_name: "Kim",
                email: "b@c.com",
            },
        )
        .unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn overlapping_writers_on_pooled_connections_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let database_url = dir.path().join("database.db");
        let pool = build_pool(database_url.to_str().unwrap()).unwrap();

        {
            let connection = &mut pool.get().unwrap();
            ensure_schema(connection).unwrap();
        }

        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));
        let mut handles = Vec::new();
        for worker in 0..2 {
            let pool = pool.clone();
            let barrier = barrier.clone();
            handles.push(std::thread::spawn(move || {
                let connection = &mut pool.get().unwrap();
                barrier.wait();
                for n in 0..20 {
                    let address = format!("worker{worker}.{n}@x.com");
                    insert(
                        connection,
                        NewContact {
                            first_name: "Ann",
                            last_name: "Lee",
                            email: &address,
                        },
                    )
                    .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let connection = &mut pool.get().unwrap();
        assert_eq!(list_all(connection).unwrap().len(), 40);
    }

    #[test]
    fn ensure_schema_is_idempotent_and_keeps_data() {
        let connection = &mut connection();
        let stored = insert(connection, ann()).unwrap();

        ensure_schema(connection).unwrap();

        assert_eq!(list_all(connection).unwrap(), vec![stored]);
    }
}
