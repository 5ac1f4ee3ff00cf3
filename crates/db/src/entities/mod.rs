//! Database entities.

#![allow(missing_docs)]

pub mod restaurant;
pub mod user;
pub mod vote;
pub mod weekly_winner;

pub use restaurant::Entity as Restaurant;
pub use user::Entity as User;
pub use vote::Entity as Vote;
pub use weekly_winner::Entity as WeeklyWinner;
