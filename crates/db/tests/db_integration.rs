//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `teamlunch_test`)
//!   `TEST_DB_PASSWORD` (default: `teamlunch_test`)
//!   `TEST_DB_NAME` (default: `teamlunch_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::Set;
use teamlunch_common::AppError;
use teamlunch_db::entities::{restaurant, user, vote, weekly_winner};
use teamlunch_db::repositories::{
    RestaurantRepository, UserRepository, VoteRepository, WeeklyWinnerRepository,
};
use teamlunch_db::test_utils::{TestDatabase, TestDbConfig};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed(db: &TestDatabase) -> (user::Model, restaurant::Model, restaurant::Model) {
    let conn = db.connection();
    let users = UserRepository::new(Arc::clone(&conn));
    let restaurants = RestaurantRepository::new(conn);

    let ana = users
        .create(user::ActiveModel {
            name: Set("Ana".to_string()),
            email: Set("ana@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let cantina = restaurants
        .create(restaurant::ActiveModel {
            name: Set("Cantina".to_string()),
            address: Set(None),
            phone: Set(None),
            ..Default::default()
        })
        .await
        .unwrap();
    let bistro = restaurants
        .create(restaurant::ActiveModel {
            name: Set("Bistro".to_string()),
            address: Set(None),
            phone: Set(None),
            ..Default::default()
        })
        .await
        .unwrap();

    (ana, cantina, bistro)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_second_vote_same_day_is_a_conflict() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    let (ana, cantina, bistro) = seed(&db).await;
    let votes = VoteRepository::new(db.connection());

    votes
        .create(vote::ActiveModel {
            user_id: Set(ana.id),
            restaurant_id: Set(cantina.id),
            vote_date: Set(date(2024, 1, 8)),
            ..Default::default()
        })
        .await
        .unwrap();

    let duplicate = votes
        .create(vote::ActiveModel {
            user_id: Set(ana.id),
            restaurant_id: Set(bistro.id),
            vote_date: Set(date(2024, 1, 8)),
            ..Default::default()
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let next_day = votes
        .create(vote::ActiveModel {
            user_id: Set(ana.id),
            restaurant_id: Set(bistro.id),
            vote_date: Set(date(2024, 1, 9)),
            ..Default::default()
        })
        .await;
    assert!(next_day.is_ok());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_second_winner_same_week_is_a_conflict() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    let (_, cantina, bistro) = seed(&db).await;
    let winners = WeeklyWinnerRepository::new(db.connection());

    let winner = |restaurant_id: i32| weekly_winner::ActiveModel {
        restaurant_id: Set(restaurant_id),
        week_start_date: Set(date(2024, 1, 8)),
        week_end_date: Set(date(2024, 1, 14)),
        vote_count: Set(4),
        is_draw: Set(false),
        ..Default::default()
    };

    winners.create(winner(cantina.id)).await.unwrap();
    let second = winners.create(winner(bistro.id)).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    assert!(winners.has_won_week(cantina.id, date(2024, 1, 8)).await.unwrap());
    assert!(!winners.has_won_week(bistro.id, date(2024, 1, 8)).await.unwrap());
    let (stored, restaurant) = winners
        .find_containing_with_restaurant(date(2024, 1, 14))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.restaurant_id, cantina.id);
    assert_eq!(restaurant.map(|r| r.name), Some("Cantina".to_string()));
    assert!(
        winners
            .find_containing_with_restaurant(date(2024, 1, 15))
            .await
            .unwrap()
            .is_none()
    );

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_week_range_query_is_half_open() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    let (ana, cantina, _) = seed(&db).await;
    let votes = VoteRepository::new(db.connection());

    for day in [date(2024, 1, 7), date(2024, 1, 8), date(2024, 1, 14), date(2024, 1, 15)] {
        votes
            .create(vote::ActiveModel {
                user_id: Set(ana.id),
                restaurant_id: Set(cantina.id),
                vote_date: Set(day),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let week = votes
        .find_in_range(date(2024, 1, 8), date(2024, 1, 15))
        .await
        .unwrap();
    let days: Vec<_> = week.iter().map(|v| v.vote_date).collect();
    assert_eq!(days, vec![date(2024, 1, 8), date(2024, 1, 14)]);

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
