//! Vote endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use teamlunch_common::AppResult;
use teamlunch_core::{CreateVoteInput, TodaysWinner, VoteDetails};
use teamlunch_db::entities::{restaurant, vote};

use crate::middleware::AppState;

// ==================== Response Types ====================

/// Today's provisional result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaysWinnerResponse {
    pub can_show: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<restaurant::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    /// Restaurants sharing the lead when there is no single leader.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tied_restaurant_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_at: Option<NaiveDate>,
}

impl TodaysWinnerResponse {
    fn message(can_show: bool, message: &str) -> Self {
        Self {
            can_show,
            message: message.to_string(),
            winner: None,
            vote_count: None,
            tied_restaurant_ids: None,
            available_at: None,
        }
    }
}

impl From<TodaysWinner> for TodaysWinnerResponse {
    fn from(result: TodaysWinner) -> Self {
        match result {
            TodaysWinner::Hidden { available_on } => Self {
                available_at: Some(available_on),
                ..Self::message(false, "The daily result can only be viewed before noon.")
            },
            TodaysWinner::NoVotes => Self::message(true, "There are no votes for today yet."),
            TodaysWinner::NoSingleLeader {
                restaurant_ids,
                vote_count,
            } => Self {
                vote_count: Some(vote_count),
                tied_restaurant_ids: Some(restaurant_ids),
                ..Self::message(true, "There is no single leader today.")
            },
            TodaysWinner::Leader {
                restaurant,
                vote_count,
            } => Self {
                winner: Some(restaurant),
                vote_count: Some(vote_count),
                ..Self::message(true, "Today's leader:")
            },
        }
    }
}

// ==================== Handlers ====================

/// Cast a vote.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateVoteInput>,
) -> AppResult<(StatusCode, Json<vote::Model>)> {
    let vote = state.vote_service.create_vote(input).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<vote::Model>> {
    Ok(Json(state.vote_service.get_vote(id).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.vote_service.delete_vote(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Votes of the date with their users and restaurants.
async fn by_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<Vec<VoteDetails>>> {
    Ok(Json(state.vote_service.votes_by_date(date).await?))
}

async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<vote::Model>>> {
    Ok(Json(state.vote_service.votes_by_user(user_id).await?))
}

/// Votes of the week containing the date.
async fn by_week(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<Vec<vote::Model>>> {
    Ok(Json(state.vote_service.votes_by_week(date).await?))
}

async fn has_voted_today(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.vote_service.has_voted_today(user_id).await?))
}

async fn can_show_winner(State(state): State<AppState>) -> Json<bool> {
    Json(state.vote_service.can_show_winner())
}

async fn todays_winner(State(state): State<AppState>) -> AppResult<Json<TodaysWinnerResponse>> {
    let result = state.vote_service.todays_leader().await?;
    Ok(Json(result.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(show).delete(delete))
        .route("/byDate/{date}", get(by_date))
        .route("/byUser/{user_id}", get(by_user))
        .route("/byWeek/{date}", get(by_week))
        .route("/hasVotedToday/{user_id}", get(has_voted_today))
        .route("/canShowWinner", get(can_show_winner))
        .route("/todaysWinner", get(todays_winner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_result_carries_next_date() {
        let response = TodaysWinnerResponse::from(TodaysWinner::Hidden {
            available_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default(),
        });
        assert!(!response.can_show);
        assert!(response.winner.is_none());
        assert_eq!(
            response.available_at,
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
    }

    #[test]
    fn test_tie_lists_leaders() {
        let response = TodaysWinnerResponse::from(TodaysWinner::NoSingleLeader {
            restaurant_ids: vec![1, 4],
            vote_count: 2,
        });
        assert!(response.can_show);
        assert_eq!(response.tied_restaurant_ids, Some(vec![1, 4]));
        assert_eq!(response.vote_count, Some(2));
    }
}
