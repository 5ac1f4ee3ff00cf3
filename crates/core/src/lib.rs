//! Core business logic for teamlunch.
//!
//! - [`aggregation`]: vote counting and winner-or-tie decisions
//! - [`schedule`]: business-day calendar, week boundaries, disclosure gate
//! - [`services`]: users, restaurants, votes and weekly winners

pub mod aggregation;
pub mod schedule;
pub mod services;

pub use aggregation::{AggregationResult, RestaurantTally, aggregate, tally};
pub use schedule::Schedule;
pub use services::*;
