//! Weekly winner endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use teamlunch_common::{AppError, AppResult};
use teamlunch_core::{
    ManualWinnerInput, SelectionOutcome, UpdateWinnerInput, WeekReport, WinnerWithRestaurant,
};

use crate::middleware::AppState;

/// All winners, newest week first.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<WinnerWithRestaurant>>> {
    Ok(Json(state.weekly_winner_service.list_winners().await?))
}

/// Record a winner by hand.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<ManualWinnerInput>,
) -> AppResult<(StatusCode, Json<WinnerWithRestaurant>)> {
    let winner = state.weekly_winner_service.create_winner(input).await?;
    Ok((StatusCode::CREATED, Json(winner)))
}

async fn current(State(state): State<AppState>) -> AppResult<Json<WinnerWithRestaurant>> {
    state
        .weekly_winner_service
        .current_week_winner()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No winner for the current week".to_string()))
}

async fn by_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<WinnerWithRestaurant>> {
    state
        .weekly_winner_service
        .winner_for_date(date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No winner for the week of {date}")))
}

async fn status(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<WeekReport>> {
    Ok(Json(state.weekly_winner_service.week_status(date).await?))
}

/// Run the selection for the current week now.
async fn select(State(state): State<AppState>) -> AppResult<Json<SelectionOutcome>> {
    let outcome = state.weekly_winner_service.select_current_week().await?;
    tracing::info!(?outcome, "Selection triggered through the API");
    Ok(Json(outcome))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<WinnerWithRestaurant>> {
    Ok(Json(state.weekly_winner_service.get_winner(id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateWinnerInput>,
) -> AppResult<Json<WinnerWithRestaurant>> {
    Ok(Json(state.weekly_winner_service.update_winner(id, input).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.weekly_winner_service.delete_winner(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/current", get(current))
        .route("/byDate/{date}", get(by_date))
        .route("/status/{date}", get(status))
        .route("/select", post(select))
        .route("/{id}", get(show).put(update).delete(delete))
}
