//! Vote repository.

use std::sync::Arc;

use crate::entities::{Vote, vote};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use teamlunch_common::{AppError, AppResult};

use super::map_write_err;

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<vote::Model>> {
        Vote::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all votes cast for a date.
    pub async fn find_by_date(&self, date: NaiveDate) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::VoteDate.eq(date))
            .order_by_asc(vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's votes, newest first.
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .order_by_desc(vote::Column::VoteDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find votes dated in `[start, end)`.
    pub async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::VoteDate.gte(start))
            .filter(vote::Column::VoteDate.lt(end))
            .order_by_asc(vote::Column::VoteDate)
            .order_by_asc(vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has a vote for an exact date.
    pub async fn has_voted_on_date(&self, user_id: i32, date: NaiveDate) -> AppResult<bool> {
        let count = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::VoteDate.eq(date))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new vote.
    ///
    /// A second vote for the same user and date fails with
    /// [`AppError::Conflict`].
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Vote"))
    }

    /// Delete a vote. Returns the number of deleted rows.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = Vote::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
