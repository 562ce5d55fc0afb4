use crate::http::storage_error_response;
use crate::storage::{self, DbPool};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use log::trace;
use serde_json::{Value, json};

pub(crate) async fn delete_contact(
    State(pool): State<DbPool>,
    Path(contact_id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let connection = &mut pool
        .get()
        .map_err(|error| storage_error_response(error.into()))?;

    storage::delete(connection, contact_id).map_err(storage_error_response)?;

    trace!("contact {contact_id} deleted");

    Ok(Json(json!({ "message": "User deleted successfully!" })))
}
