use diesel::prelude::*;
use serde::Serialize;

/// A stored contact. Field names are snake_case in the database and
/// camelCase on the wire.
#[derive(Queryable, Identifiable, Selectable, Serialize, Debug, PartialEq, Eq)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct NewContact<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

/// Partial update: `None` fields keep their stored value.
#[derive(Default)]
pub struct ContactChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
