//! API endpoints.

mod restaurants;
mod users;
mod votes;
mod weekly_winners;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/restaurants", restaurants::router())
        .nest("/votes", votes::router())
        .nest("/weeklyWinners", weekly_winners::router())
}
