use crate::errors::storage_error::StorageError;
use crate::storage::DbPool;
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use log::info;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

mod contacts;
mod create_contact;
mod delete_contact;
mod update_contact;

pub fn app(pool: DbPool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/contacts", get(contacts::contacts))
        .route("/create_contact", post(create_contact::create_contact))
        .route("/update_contact/{id}", patch(update_contact::update_contact))
        .route("/delete_contact/{id}", delete(delete_contact::delete_contact))
        .layer(cors)
        .with_state(pool)
}

/// Starts the HTTP server on the default port.
pub async fn listen(pool: DbPool) {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:5000")
        .await
        .expect("Could not bind HTTP server");

    info!("HTTP server listening on port 5000");

    axum::serve(listener, app(pool))
        .await
        .expect("Could not serve HTTP");
}

/// Converts a storage failure into the response for that request. Missing
/// records are 404; everything else surfaces as 500 with the error text.
pub(crate) fn storage_error_response(error: StorageError) -> (StatusCode, Json<Value>) {
    match error {
        StorageError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "User not found" })),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": other.to_string() })),
        ),
    }
}
