use crate::http::storage_error_response;
use crate::models::contact::ContactChanges;
use crate::storage::{self, DbPool};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use log::trace;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateContact {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

pub(crate) async fn update_contact(
    State(pool): State<DbPool>,
    Path(contact_id): Path<i32>,
    Json(payload): Json<UpdateContact>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let connection = &mut pool
        .get()
        .map_err(|error| storage_error_response(error.into()))?;

    storage::update(
        connection,
        contact_id,
        ContactChanges {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
        },
    )
    .map_err(storage_error_response)?;

    trace!("contact {contact_id} updated");

    Ok(Json(json!({ "message": "User updated successfully!" })))
}
