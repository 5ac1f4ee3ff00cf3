//! Vote service: eligibility rules, vote operations and the daily leader.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use teamlunch_common::{AppError, AppResult, SharedClock};
use teamlunch_db::{
    entities::{restaurant, user, vote},
    repositories::{RestaurantRepository, UserRepository, VoteRepository, WeeklyWinnerRepository},
};
use validator::Validate;

use crate::{
    aggregation::{AggregationResult, aggregate},
    schedule::Schedule,
};

/// Reason given when a user already has a vote for the date.
pub const ALREADY_VOTED_TODAY: &str = "You already voted today";

/// Reason given when the restaurant already won the vote's week.
pub const RESTAURANT_ALREADY_WON: &str = "This restaurant already won this week";

/// Input for casting a vote.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoteInput {
    #[validate(range(min = 1))]
    pub user_id: i32,

    #[validate(range(min = 1))]
    pub restaurant_id: i32,

    /// Defaults to today's local date.
    #[serde(default)]
    pub vote_date: Option<NaiveDate>,
}

/// A vote with its voter and restaurant loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteDetails {
    #[serde(flatten)]
    pub vote: vote::Model,
    pub user: Option<user::Model>,
    pub restaurant: Option<restaurant::Model>,
}

/// Today's provisional leader. Computed on read and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodaysWinner {
    /// Past the disclosure cutoff.
    Hidden { available_on: NaiveDate },
    NoVotes,
    NoSingleLeader {
        restaurant_ids: Vec<i32>,
        vote_count: u32,
    },
    Leader {
        restaurant: restaurant::Model,
        vote_count: u32,
    },
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    user_repo: UserRepository,
    restaurant_repo: RestaurantRepository,
    winner_repo: WeeklyWinnerRepository,
    schedule: Schedule,
    clock: SharedClock,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(
        vote_repo: VoteRepository,
        user_repo: UserRepository,
        restaurant_repo: RestaurantRepository,
        winner_repo: WeeklyWinnerRepository,
        schedule: Schedule,
        clock: SharedClock,
    ) -> Self {
        Self {
            vote_repo,
            user_repo,
            restaurant_repo,
            winner_repo,
            schedule,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.schedule.local_date(self.clock.now())
    }

    // ==================== Eligibility ====================

    /// Whether the user has a vote dated exactly `date`.
    pub async fn has_voted_on_date(&self, user_id: i32, date: NaiveDate) -> AppResult<bool> {
        self.vote_repo.has_voted_on_date(user_id, date).await
    }

    /// Whether the user has a vote for today's local date.
    pub async fn has_voted_today(&self, user_id: i32) -> AppResult<bool> {
        self.has_voted_on_date(user_id, self.today()).await
    }

    /// Whether the restaurant won the week starting at `week_start`.
    pub async fn restaurant_won_week(
        &self,
        restaurant_id: i32,
        week_start: NaiveDate,
    ) -> AppResult<bool> {
        self.winner_repo.has_won_week(restaurant_id, week_start).await
    }

    // ==================== Votes ====================

    /// Cast a vote.
    ///
    /// Rules are checked against the vote's own date: one vote per user and
    /// date, and no votes for a restaurant that already won that date's week.
    pub async fn create_vote(&self, input: CreateVoteInput) -> AppResult<vote::Model> {
        input.validate()?;

        let vote_date = input.vote_date.unwrap_or_else(|| self.today());

        if !self.user_repo.exists(input.user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", input.user_id)));
        }
        if !self.restaurant_repo.exists(input.restaurant_id).await? {
            return Err(AppError::NotFound(format!(
                "Restaurant {} not found",
                input.restaurant_id
            )));
        }

        if self.has_voted_on_date(input.user_id, vote_date).await? {
            tracing::debug!(user_id = input.user_id, %vote_date, "Vote rejected: already voted");
            return Err(AppError::RuleViolation(ALREADY_VOTED_TODAY.to_string()));
        }

        let week_start = Schedule::week_start(vote_date);
        if self
            .restaurant_won_week(input.restaurant_id, week_start)
            .await?
        {
            tracing::debug!(
                restaurant_id = input.restaurant_id,
                %week_start,
                "Vote rejected: restaurant already won"
            );
            return Err(AppError::RuleViolation(RESTAURANT_ALREADY_WON.to_string()));
        }

        let model = vote::ActiveModel {
            user_id: Set(input.user_id),
            restaurant_id: Set(input.restaurant_id),
            vote_date: Set(vote_date),
            ..Default::default()
        };
        let created = duplicate_vote_as_rule_violation(self.vote_repo.create(model).await)?;

        tracing::info!(
            vote_id = created.id,
            user_id = created.user_id,
            restaurant_id = created.restaurant_id,
            vote_date = %created.vote_date,
            "Vote cast"
        );
        Ok(created)
    }

    pub async fn get_vote(&self, id: i32) -> AppResult<vote::Model> {
        self.vote_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vote {id} not found")))
    }

    /// Votes cast for `date`, each with its user and restaurant.
    pub async fn votes_by_date(&self, date: NaiveDate) -> AppResult<Vec<VoteDetails>> {
        let votes = self.vote_repo.find_by_date(date).await?;
        if votes.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<i32> = votes.iter().map(|v| v.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let mut restaurant_ids: Vec<i32> = votes.iter().map(|v| v.restaurant_id).collect();
        restaurant_ids.sort_unstable();
        restaurant_ids.dedup();

        let users: HashMap<i32, user::Model> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let restaurants: HashMap<i32, restaurant::Model> = self
            .restaurant_repo
            .find_by_ids(&restaurant_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(votes
            .into_iter()
            .map(|vote| VoteDetails {
                user: users.get(&vote.user_id).cloned(),
                restaurant: restaurants.get(&vote.restaurant_id).cloned(),
                vote,
            })
            .collect())
    }

    /// A user's votes, newest first.
    pub async fn votes_by_user(&self, user_id: i32) -> AppResult<Vec<vote::Model>> {
        self.vote_repo.find_by_user(user_id).await
    }

    /// Votes of the week containing `date`.
    pub async fn votes_by_week(&self, date: NaiveDate) -> AppResult<Vec<vote::Model>> {
        let (start, end) = Schedule::week_bounds(date);
        self.vote_repo.find_in_range(start, end).await
    }

    pub async fn delete_vote(&self, id: i32) -> AppResult<()> {
        let deleted = self.vote_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Vote {id} not found")));
        }
        tracing::info!(vote_id = id, "Deleted vote");
        Ok(())
    }

    // ==================== Daily leader ====================

    #[must_use]
    pub fn can_show_winner(&self) -> bool {
        self.schedule.can_show_winner(self.clock.now())
    }

    /// Today's leader, subject to the disclosure cutoff.
    pub async fn todays_leader(&self) -> AppResult<TodaysWinner> {
        let now = self.clock.now();
        if !self.schedule.can_show_winner(now) {
            return Ok(TodaysWinner::Hidden {
                available_on: self.schedule.next_disclosure_date(now),
            });
        }

        let today = self.schedule.local_date(now);
        let votes = self.vote_repo.find_by_date(today).await?;

        match aggregate(votes.iter().map(|v| v.restaurant_id)) {
            AggregationResult::NoVotes => Ok(TodaysWinner::NoVotes),
            AggregationResult::Tie {
                vote_count,
                restaurant_ids,
            } => Ok(TodaysWinner::NoSingleLeader {
                restaurant_ids,
                vote_count,
            }),
            AggregationResult::Winner {
                restaurant_id,
                vote_count,
            } => {
                let restaurant = self.restaurant_repo.get_by_id(restaurant_id).await?;
                Ok(TodaysWinner::Leader {
                    restaurant,
                    vote_count,
                })
            }
        }
    }
}

/// A unique-index conflict on insert means a concurrent vote for the same
/// user and date won the race.
fn duplicate_vote_as_rule_violation(result: AppResult<vote::Model>) -> AppResult<vote::Model> {
    match result {
        Err(AppError::Conflict(_)) => Err(AppError::RuleViolation(ALREADY_VOTED_TODAY.to_string())),
        other => other,
    }
}
