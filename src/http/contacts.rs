use crate::http::storage_error_response;
use crate::storage::{self, DbPool};
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

pub(crate) async fn contacts(
    State(pool): State<DbPool>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let connection = &mut pool
        .get()
        .map_err(|error| storage_error_response(error.into()))?;

    let records = storage::list_all(connection).map_err(storage_error_response)?;

    Ok(Json(json!({ "contacts": records })))
}
