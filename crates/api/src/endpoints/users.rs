//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use teamlunch_common::AppResult;
use teamlunch_core::UserInput;
use teamlunch_db::entities::user;

use crate::middleware::AppState;

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<user::Model>>> {
    Ok(Json(state.user_service.list().await?))
}

async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<user::Model>> {
    Ok(Json(state.user_service.get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> AppResult<(StatusCode, Json<user::Model>)> {
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UserInput>,
) -> AppResult<Json<user::Model>> {
    Ok(Json(state.user_service.update(id, input).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
}
