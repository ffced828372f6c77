use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::storage::{Todo, TodoStore, TITLE_MAX_CHARS};

#[derive(Deserialize)]
struct CreateTodo {
    title: Option<String>,
}

pub async fn root_handler() -> &'static str {
    "Backend is running"
}

pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

pub async fn list_todos(State(store): State<TodoStore>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(store.list().await?))
}

pub async fn create_todo(
    State(store): State<TodoStore>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map_err(body_error)?;
    let input = parse_create(&headers, &body).ok_or(AppError::TitleRequired)?;
    let title = validate_title(input.title.as_deref())?;

    let id = store.insert(title).await?;
    info!(id, "todo added");

    Ok((StatusCode::CREATED, Json(json!({ "message": "Todo added" }))))
}

/// A body over the extractor's size limit can only hold an oversized title.
fn body_error(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::TitleTooLong
    } else {
        AppError::TitleRequired
    }
}

/// Decode the request body, treating a non-JSON content type or any decode
/// failure as an absent body.
fn parse_create(headers: &HeaderMap, body: &[u8]) -> Option<CreateTodo> {
    if !is_json(headers) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn validate_title(title: Option<&str>) -> Result<&str, AppError> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(AppError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::TitleTooLong);
    }
    Ok(title)
}
