//! Restaurant service.

use sea_orm::Set;
use serde::Deserialize;
use teamlunch_common::{AppError, AppResult};
use teamlunch_db::{entities::restaurant, repositories::RestaurantRepository};
use validator::Validate;

/// Input for creating or replacing a restaurant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestaurantInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 200))]
    pub address: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl RestaurantInput {
    /// Trims every field. Blank optional fields become `None`.
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            address: Self::normalized(self.address),
            phone: Self::normalized(self.phone),
        }
    }

    fn normalized(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Restaurant service for business logic.
#[derive(Clone)]
pub struct RestaurantService {
    restaurant_repo: RestaurantRepository,
}

impl RestaurantService {
    /// Create a new restaurant service.
    #[must_use]
    pub const fn new(restaurant_repo: RestaurantRepository) -> Self {
        Self { restaurant_repo }
    }

    pub async fn list(&self) -> AppResult<Vec<restaurant::Model>> {
        self.restaurant_repo.find_all().await
    }

    pub async fn get(&self, id: i32) -> AppResult<restaurant::Model> {
        self.restaurant_repo.get_by_id(id).await
    }

    pub async fn create(&self, input: RestaurantInput) -> AppResult<restaurant::Model> {
        let input = input.trimmed();
        input.validate()?;

        let model = restaurant::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            ..Default::default()
        };
        let created = self.restaurant_repo.create(model).await?;
        tracing::info!(restaurant_id = created.id, name = %created.name, "Created restaurant");
        Ok(created)
    }

    /// Replace a restaurant's details.
    pub async fn update(&self, id: i32, input: RestaurantInput) -> AppResult<restaurant::Model> {
        let input = input.trimmed();
        input.validate()?;

        let existing = self.restaurant_repo.get_by_id(id).await?;
        let mut model: restaurant::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.address = Set(input.address);
        model.phone = Set(input.phone);
        self.restaurant_repo.update(model).await
    }

    /// Delete a restaurant with its votes and wins.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = self.restaurant_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Restaurant {id} not found")));
        }
        tracing::info!(restaurant_id = id, "Deleted restaurant");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_restaurant(id: i32, name: &str) -> restaurant::Model {
        restaurant::Model {
            id,
            name: name.to_string(),
            address: Some("Rua das Flores, 10".to_string()),
            phone: None,
        }
    }

    fn service(db: MockDatabase) -> RestaurantService {
        RestaurantService::new(RestaurantRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_list_restaurants() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                test_restaurant(1, "Cantina"),
                test_restaurant(2, "Sushi Bar"),
            ]]),
        );

        let restaurants = service.list().await.unwrap();
        assert_eq!(restaurants.len(), 2);
    }

    #[tokio::test]
    async fn test_create_restaurant() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_restaurant(4, "Cantina")]]),
        );

        let restaurant = service
            .create(RestaurantInput {
                name: "Cantina".to_string(),
                address: Some("Rua das Flores, 10".to_string()),
                phone: Some("   ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(restaurant.id, 4);
    }

    #[tokio::test]
    async fn test_create_restaurant_rejects_long_phone() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(RestaurantInput {
                name: "Cantina".to_string(),
                address: None,
                phone: Some("0".repeat(21)),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_restaurant_rejects_empty_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(RestaurantInput {
                name: String::new(),
                address: None,
                phone: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_restaurant_rejects_blank_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(RestaurantInput {
                name: "   ".to_string(),
                address: Some("Rua das Flores, 10".to_string()),
                phone: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_restaurant_rejects_blank_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .update(
                2,
                RestaurantInput {
                    name: "  ".to_string(),
                    address: None,
                    phone: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_restaurant() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<restaurant::Model>::new()]),
        );

        let result = service.get(77).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_restaurant() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        assert!(service.delete(2).await.is_ok());
    }
}
