//! Database repositories.

mod restaurant;
mod user;
mod vote;
mod weekly_winner;

pub use restaurant::RestaurantRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
pub use weekly_winner::{WeeklyWinnerRepository, WinnerRow};

use sea_orm::{DbErr, SqlErr};
use teamlunch_common::AppError;

/// Map a failed insert or update, keeping unique-index violations apart so
/// callers can treat them as "already exists".
pub(crate) fn map_write_err(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            AppError::Conflict(format!("{what} already exists: {detail}"))
        }
        _ => AppError::Database(err.to_string()),
    }
}
