//! Weekly winner service.
//!
//! Resolves each Monday-to-Sunday week to at most one winning restaurant.
//! The automatic path abstains on ties and empty weeks and is idempotent: a
//! week that already has a winner is left untouched, and a concurrent insert
//! that loses the race on the unique week index counts as already resolved.

use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use teamlunch_common::{AppError, AppResult, SharedClock};
use teamlunch_db::{
    entities::{restaurant, weekly_winner},
    repositories::{RestaurantRepository, VoteRepository, WeeklyWinnerRepository, WinnerRow},
};
use validator::Validate;

use crate::{
    aggregation::{AggregationResult, aggregate},
    schedule::Schedule,
};

/// Reason given when a manual winner targets an already resolved week.
pub const WINNER_ALREADY_EXISTS: &str = "A winner already exists for this week";

/// Result of one selection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SelectionOutcome {
    /// A new winner was recorded.
    Created { winner: weekly_winner::Model },
    /// The week already had a winner. `winner_id` is unknown when the
    /// attempt lost an insert race.
    #[serde(rename_all = "camelCase")]
    AlreadyResolved {
        week_start: NaiveDate,
        winner_id: Option<i32>,
    },
    #[serde(rename_all = "camelCase")]
    NoVotes { week_start: NaiveDate },
    #[serde(rename_all = "camelCase")]
    Tie {
        week_start: NaiveDate,
        vote_count: u32,
        restaurant_ids: Vec<i32>,
    },
}

/// A stored winner with its restaurant loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerWithRestaurant {
    #[serde(flatten)]
    pub winner: weekly_winner::Model,
    pub restaurant: Option<restaurant::Model>,
}

impl From<WinnerRow> for WinnerWithRestaurant {
    fn from((winner, restaurant): WinnerRow) -> Self {
        Self { winner, restaurant }
    }
}

/// State of a week, recomputed from votes when no winner is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WeekStatus {
    Resolved { winner: WinnerWithRestaurant },
    NoVotes,
    #[serde(rename_all = "camelCase")]
    Tie {
        vote_count: u32,
        restaurant_ids: Vec<i32>,
    },
    /// A strict leader exists but nothing was stored yet.
    #[serde(rename_all = "camelCase")]
    Unresolved {
        restaurant_id: i32,
        vote_count: u32,
    },
}

/// A week and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    #[serde(flatten)]
    pub status: WeekStatus,
}

/// Input for recording a winner by hand.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManualWinnerInput {
    #[validate(range(min = 1))]
    pub restaurant_id: i32,

    /// Defaults to the restaurant's votes in that week.
    #[validate(range(min = 0))]
    pub vote_count: Option<i32>,

    /// Marks a tied week resolved by hand.
    pub is_draw: Option<bool>,

    /// Any date of the target week; defaults to the current week.
    pub week_start_date: Option<NaiveDate>,
}

/// Input for updating a stored winner.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWinnerInput {
    #[validate(range(min = 1))]
    pub restaurant_id: Option<i32>,

    #[validate(range(min = 0))]
    pub vote_count: Option<i32>,

    pub is_draw: Option<bool>,
}

/// Weekly winner service for business logic.
#[derive(Clone)]
pub struct WeeklyWinnerService {
    winner_repo: WeeklyWinnerRepository,
    vote_repo: VoteRepository,
    restaurant_repo: RestaurantRepository,
    schedule: Schedule,
    clock: SharedClock,
}

impl WeeklyWinnerService {
    /// Create a new weekly winner service.
    #[must_use]
    pub const fn new(
        winner_repo: WeeklyWinnerRepository,
        vote_repo: VoteRepository,
        restaurant_repo: RestaurantRepository,
        schedule: Schedule,
        clock: SharedClock,
    ) -> Self {
        Self {
            winner_repo,
            vote_repo,
            restaurant_repo,
            schedule,
            clock,
        }
    }

    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn today(&self) -> NaiveDate {
        self.schedule.local_date(self.clock.now())
    }

    // ==================== Selection ====================

    /// Try to resolve the week containing `today`.
    ///
    /// Store failures are returned as errors. Nothing is retried here and
    /// nothing is written unless a single winner exists.
    pub async fn select_weekly_winner(&self, today: NaiveDate) -> AppResult<SelectionOutcome> {
        let (week_start, week_end_exclusive) = Schedule::week_bounds(today);

        if let Some(existing) = self.winner_repo.find_by_week_start(week_start).await? {
            tracing::info!(
                %week_start,
                winner_id = existing.id,
                restaurant_id = existing.restaurant_id,
                "Week already has a winner"
            );
            return Ok(SelectionOutcome::AlreadyResolved {
                week_start,
                winner_id: Some(existing.id),
            });
        }

        let votes = self
            .vote_repo
            .find_in_range(week_start, week_end_exclusive)
            .await?;

        match aggregate(votes.iter().map(|v| v.restaurant_id)) {
            AggregationResult::NoVotes => {
                tracing::info!(%week_start, "No votes this week, no winner selected");
                Ok(SelectionOutcome::NoVotes { week_start })
            }
            AggregationResult::Tie {
                vote_count,
                restaurant_ids,
            } => {
                tracing::info!(
                    %week_start,
                    vote_count,
                    ?restaurant_ids,
                    "Tie at the top, no winner selected"
                );
                Ok(SelectionOutcome::Tie {
                    week_start,
                    vote_count,
                    restaurant_ids,
                })
            }
            AggregationResult::Winner {
                restaurant_id,
                vote_count,
            } => {
                let model = weekly_winner::ActiveModel {
                    restaurant_id: Set(restaurant_id),
                    week_start_date: Set(week_start),
                    week_end_date: Set(Schedule::week_end(week_start)),
                    vote_count: Set(to_db_count(vote_count)?),
                    is_draw: Set(false),
                    ..Default::default()
                };
                let inserted = self.winner_repo.create(model).await;
                let outcome = created_or_resolved(inserted, week_start)?;
                if let SelectionOutcome::Created { winner } = &outcome {
                    tracing::info!(
                        %week_start,
                        winner_id = winner.id,
                        restaurant_id,
                        vote_count,
                        "Weekly winner selected"
                    );
                }
                Ok(outcome)
            }
        }
    }

    /// Try to resolve the current local week.
    pub async fn select_current_week(&self) -> AppResult<SelectionOutcome> {
        self.select_weekly_winner(self.today()).await
    }

    // ==================== Queries ====================

    /// All winners, newest week first.
    pub async fn list_winners(&self) -> AppResult<Vec<WinnerWithRestaurant>> {
        let rows = self.winner_repo.find_all_with_restaurant().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn current_week_winner(&self) -> AppResult<Option<WinnerWithRestaurant>> {
        let row = self
            .winner_repo
            .find_by_week_start_with_restaurant(Schedule::week_start(self.today()))
            .await?;
        Ok(row.map(Into::into))
    }

    /// Winner of the week containing `date`.
    pub async fn winner_for_date(
        &self,
        date: NaiveDate,
    ) -> AppResult<Option<WinnerWithRestaurant>> {
        let row = self.winner_repo.find_containing_with_restaurant(date).await?;
        Ok(row.map(Into::into))
    }

    pub async fn get_winner(&self, id: i32) -> AppResult<WinnerWithRestaurant> {
        self.winner_repo
            .find_by_id_with_restaurant(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found(id))
    }

    /// Status of the week containing `date`.
    pub async fn week_status(&self, date: NaiveDate) -> AppResult<WeekReport> {
        let (week_start, week_end_exclusive) = Schedule::week_bounds(date);
        let week_end = Schedule::week_end(week_start);

        let stored = self
            .winner_repo
            .find_by_week_start_with_restaurant(week_start)
            .await?;
        let status = match stored {
            Some(row) => WeekStatus::Resolved { winner: row.into() },
            None => {
                let votes = self
                    .vote_repo
                    .find_in_range(week_start, week_end_exclusive)
                    .await?;
                match aggregate(votes.iter().map(|v| v.restaurant_id)) {
                    AggregationResult::NoVotes => WeekStatus::NoVotes,
                    AggregationResult::Tie {
                        vote_count,
                        restaurant_ids,
                    } => WeekStatus::Tie {
                        vote_count,
                        restaurant_ids,
                    },
                    AggregationResult::Winner {
                        restaurant_id,
                        vote_count,
                    } => WeekStatus::Unresolved {
                        restaurant_id,
                        vote_count,
                    },
                }
            }
        };

        Ok(WeekReport {
            week_start,
            week_end,
            status,
        })
    }

    // ==================== Manual administration ====================

    /// Record a winner by hand.
    pub async fn create_winner(&self, input: ManualWinnerInput) -> AppResult<WinnerWithRestaurant> {
        input.validate()?;

        let target = input.week_start_date.unwrap_or_else(|| self.today());
        let week_start = Schedule::week_start(target);
        let restaurant = self.restaurant_repo.get_by_id(input.restaurant_id).await?;

        if self.winner_repo.find_by_week_start(week_start).await?.is_some() {
            return Err(AppError::RuleViolation(WINNER_ALREADY_EXISTS.to_string()));
        }

        let vote_count = match input.vote_count {
            Some(count) => count,
            None => {
                let (start, end) = Schedule::week_bounds(week_start);
                let votes = self.vote_repo.find_in_range(start, end).await?;
                let received = votes
                    .iter()
                    .filter(|v| v.restaurant_id == restaurant.id)
                    .count();
                i32::try_from(received)
                    .map_err(|_| AppError::Internal("vote count out of range".to_string()))?
            }
        };

        let model = weekly_winner::ActiveModel {
            restaurant_id: Set(restaurant.id),
            week_start_date: Set(week_start),
            week_end_date: Set(Schedule::week_end(week_start)),
            vote_count: Set(vote_count),
            is_draw: Set(input.is_draw.unwrap_or(false)),
            ..Default::default()
        };

        let created = match self.winner_repo.create(model).await {
            Err(AppError::Conflict(_)) => {
                return Err(AppError::RuleViolation(WINNER_ALREADY_EXISTS.to_string()));
            }
            other => other?,
        };

        tracing::info!(
            %week_start,
            winner_id = created.id,
            restaurant_id = created.restaurant_id,
            is_draw = created.is_draw,
            "Weekly winner recorded manually"
        );
        Ok(WinnerWithRestaurant {
            winner: created,
            restaurant: Some(restaurant),
        })
    }

    pub async fn update_winner(
        &self,
        id: i32,
        input: UpdateWinnerInput,
    ) -> AppResult<WinnerWithRestaurant> {
        input.validate()?;

        let existing = self
            .winner_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        let mut model: weekly_winner::ActiveModel = existing.into();

        let replacement = match input.restaurant_id {
            Some(restaurant_id) => {
                let restaurant = self.restaurant_repo.get_by_id(restaurant_id).await?;
                model.restaurant_id = Set(restaurant.id);
                Some(restaurant)
            }
            None => None,
        };
        if let Some(vote_count) = input.vote_count {
            model.vote_count = Set(vote_count);
        }
        if let Some(is_draw) = input.is_draw {
            model.is_draw = Set(is_draw);
        }

        let winner = self.winner_repo.update(model).await?;
        let restaurant = match replacement {
            Some(restaurant) => Some(restaurant),
            None => self.restaurant_repo.find_by_id(winner.restaurant_id).await?,
        };
        Ok(WinnerWithRestaurant { winner, restaurant })
    }

    pub async fn delete_winner(&self, id: i32) -> AppResult<()> {
        let deleted = self.winner_repo.delete(id).await?;
        if deleted == 0 {
            return Err(not_found(id));
        }
        tracing::info!(winner_id = id, "Deleted weekly winner");
        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Weekly winner {id} not found"))
}

fn to_db_count(count: u32) -> AppResult<i32> {
    i32::try_from(count).map_err(|_| AppError::Internal("vote count out of range".to_string()))
}

/// Map the result of the automatic insert. Losing the race on the unique
/// week index means another attempt already resolved the week.
fn created_or_resolved(
    result: AppResult<weekly_winner::Model>,
    week_start: NaiveDate,
) -> AppResult<SelectionOutcome> {
    match result {
        Ok(winner) => Ok(SelectionOutcome::Created { winner }),
        Err(AppError::Conflict(detail)) => {
            tracing::info!(%week_start, %detail, "Week resolved concurrently");
            Ok(SelectionOutcome::AlreadyResolved {
                week_start,
                winner_id: None,
            })
        }
        Err(e) => Err(e),
    }
}
