use crate::http::storage_error_response;
use crate::models::contact::NewContact;
use crate::storage::{self, DbPool};
use axum::{Json, extract::State, http::StatusCode};
use log::trace;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateContact {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

pub(crate) async fn create_contact(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateContact>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let (Some(first_name), Some(last_name), Some(email)) = (
        payload.first_name.filter(|field| !field.is_empty()),
        payload.last_name.filter(|field| !field.is_empty()),
        payload.email.filter(|field| !field.is_empty()),
    ) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "You must include a first name, last name, and email."
            })),
        ));
    };

    let connection = &mut pool
        .get()
        .map_err(|error| storage_error_response(error.into()))?;

    let stored = storage::insert(
        connection,
        NewContact {
            first_name: &first_name,
            last_name: &last_name,
            email: &email,
        },
    )
    .map_err(storage_error_response)?;

    trace!("contact {} created for {}", stored.id, stored.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully!" })),
    ))
}
