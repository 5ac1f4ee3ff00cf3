//! Restaurant endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use teamlunch_common::AppResult;
use teamlunch_core::RestaurantInput;
use teamlunch_db::entities::restaurant;

use crate::middleware::AppState;

/// List all restaurants.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<restaurant::Model>>> {
    Ok(Json(state.restaurant_service.list().await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<restaurant::Model>> {
    Ok(Json(state.restaurant_service.get(id).await?))
}

/// Add a restaurant to the list of lunch options.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<RestaurantInput>,
) -> AppResult<(StatusCode, Json<restaurant::Model>)> {
    let restaurant = state.restaurant_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<RestaurantInput>,
) -> AppResult<Json<restaurant::Model>> {
    Ok(Json(state.restaurant_service.update(id, input).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.restaurant_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
}
