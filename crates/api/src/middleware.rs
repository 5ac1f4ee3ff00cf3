//! Shared application state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use teamlunch_common::SharedClock;
use teamlunch_core::{RestaurantService, Schedule, UserService, VoteService, WeeklyWinnerService};
use teamlunch_db::repositories::{
    RestaurantRepository, UserRepository, VoteRepository, WeeklyWinnerRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub restaurant_service: RestaurantService,
    pub vote_service: VoteService,
    pub weekly_winner_service: WeeklyWinnerService,
}

impl AppState {
    /// Wire repositories and services over one connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, schedule: Schedule, clock: SharedClock) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(Arc::clone(&db));
        let winner_repo = WeeklyWinnerRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone()),
            restaurant_service: RestaurantService::new(restaurant_repo.clone()),
            vote_service: VoteService::new(
                vote_repo.clone(),
                user_repo,
                restaurant_repo.clone(),
                winner_repo.clone(),
                schedule.clone(),
                Arc::clone(&clock),
            ),
            weekly_winner_service: WeeklyWinnerService::new(
                winner_repo,
                vote_repo,
                restaurant_repo,
                schedule,
                clock,
            ),
        }
    }
}
