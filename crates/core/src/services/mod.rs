//! Business logic services.

#![allow(missing_docs)]

pub mod restaurant;
pub mod user;
pub mod vote;
pub mod weekly_winner;

pub use restaurant::{RestaurantInput, RestaurantService};
pub use user::{UserInput, UserService};
pub use vote::{
    ALREADY_VOTED_TODAY, CreateVoteInput, RESTAURANT_ALREADY_WON, TodaysWinner, VoteDetails,
    VoteService,
};
pub use weekly_winner::{
    ManualWinnerInput, SelectionOutcome, UpdateWinnerInput, WINNER_ALREADY_EXISTS, WeekReport,
    WeekStatus, WeeklyWinnerService, WinnerWithRestaurant,
};
