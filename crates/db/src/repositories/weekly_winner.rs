//! Weekly winner repository.

use std::sync::Arc;

use crate::entities::{Restaurant, WeeklyWinner, restaurant, weekly_winner};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use teamlunch_common::{AppError, AppResult};

use super::map_write_err;

/// A winner joined with its restaurant.
pub type WinnerRow = (weekly_winner::Model, Option<restaurant::Model>);

/// Weekly winner repository for database operations.
#[derive(Clone)]
pub struct WeeklyWinnerRepository {
    db: Arc<DatabaseConnection>,
}

impl WeeklyWinnerRepository {
    /// Create a new weekly winner repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List all winners with their restaurants, most recent week first.
    pub async fn find_all_with_restaurant(&self) -> AppResult<Vec<WinnerRow>> {
        WeeklyWinner::find()
            .find_also_related(Restaurant)
            .order_by_desc(weekly_winner::Column::WeekStartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a winner by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<weekly_winner::Model>> {
        WeeklyWinner::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a winner by ID together with its restaurant.
    pub async fn find_by_id_with_restaurant(&self, id: i32) -> AppResult<Option<WinnerRow>> {
        WeeklyWinner::find_by_id(id)
            .find_also_related(Restaurant)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the winner recorded for an exact week start.
    pub async fn find_by_week_start(
        &self,
        week_start: NaiveDate,
    ) -> AppResult<Option<weekly_winner::Model>> {
        WeeklyWinner::find()
            .filter(weekly_winner::Column::WeekStartDate.eq(week_start))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Same lookup as [`Self::find_by_week_start`], joined with the restaurant.
    pub async fn find_by_week_start_with_restaurant(
        &self,
        week_start: NaiveDate,
    ) -> AppResult<Option<WinnerRow>> {
        WeeklyWinner::find()
            .filter(weekly_winner::Column::WeekStartDate.eq(week_start))
            .find_also_related(Restaurant)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the winner whose week contains `date`, with its restaurant.
    pub async fn find_containing_with_restaurant(
        &self,
        date: NaiveDate,
    ) -> AppResult<Option<WinnerRow>> {
        WeeklyWinner::find()
            .find_also_related(Restaurant)
            .filter(weekly_winner::Column::WeekStartDate.lte(date))
            .filter(weekly_winner::Column::WeekEndDate.gte(date))
            .order_by_desc(weekly_winner::Column::WeekStartDate)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a restaurant won the week starting at `week_start`.
    pub async fn has_won_week(&self, restaurant_id: i32, week_start: NaiveDate) -> AppResult<bool> {
        let count = WeeklyWinner::find()
            .filter(weekly_winner::Column::RestaurantId.eq(restaurant_id))
            .filter(weekly_winner::Column::WeekStartDate.eq(week_start))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new winner.
    ///
    /// A second winner for the same week fails with [`AppError::Conflict`].
    pub async fn create(
        &self,
        model: weekly_winner::ActiveModel,
    ) -> AppResult<weekly_winner::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Weekly winner"))
    }

    /// Update a winner.
    pub async fn update(
        &self,
        model: weekly_winner::ActiveModel,
    ) -> AppResult<weekly_winner::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Weekly winner"))
    }

    /// Delete a winner. Returns the number of deleted rows.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = WeeklyWinner::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr, Set};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_winner(
        id: i32,
        restaurant_id: i32,
        week_start: NaiveDate,
    ) -> weekly_winner::Model {
        weekly_winner::Model {
            id,
            restaurant_id,
            week_start_date: week_start,
            week_end_date: week_start + chrono::Duration::days(6),
            vote_count: 4,
            is_draw: false,
        }
    }

    #[tokio::test]
    async fn test_find_by_week_start_found() {
        let winner = create_test_winner(1, 3, date(2024, 1, 8));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[winner.clone()]])
                .into_connection(),
        );

        let repo = WeeklyWinnerRepository::new(db);
        let found = repo.find_by_week_start(date(2024, 1, 8)).await.unwrap();

        assert_eq!(found, Some(winner));
    }

    #[tokio::test]
    async fn test_find_containing_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<weekly_winner::Model>::new()])
                .into_connection(),
        );

        let repo = WeeklyWinnerRepository::new(db);
        assert!(
            repo.find_containing_with_restaurant(date(2024, 1, 10))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_containing_loads_restaurant() {
        let winner = create_test_winner(1, 3, date(2024, 1, 8));
        let cantina = restaurant::Model {
            id: 3,
            name: "Cantina".to_string(),
            address: Some("Rua das Flores, 10".to_string()),
            phone: None,
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[(winner.clone(), cantina.clone())]])
                .into_connection(),
        );

        let repo = WeeklyWinnerRepository::new(Arc::clone(&db));
        let found = repo
            .find_containing_with_restaurant(date(2024, 1, 11))
            .await
            .unwrap();
        assert_eq!(found, Some((winner, Some(cantina))));

        drop(repo);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("LEFT JOIN \"restaurant\""));
    }

    #[tokio::test]
    async fn test_has_won_week() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = WeeklyWinnerRepository::new(db);
        assert!(repo.has_won_week(3, date(2024, 1, 8)).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_maps_generic_failure_to_database_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "connection reset".to_string(),
                ))])
                .into_connection(),
        );

        let repo = WeeklyWinnerRepository::new(db);
        let model = weekly_winner::ActiveModel {
            restaurant_id: Set(3),
            week_start_date: Set(date(2024, 1, 8)),
            week_end_date: Set(date(2024, 1, 14)),
            vote_count: Set(4),
            is_draw: Set(false),
            ..Default::default()
        };

        let result = repo.create(model).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
