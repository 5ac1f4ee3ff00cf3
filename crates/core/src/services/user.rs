//! User service.

use sea_orm::Set;
use serde::Deserialize;
use teamlunch_common::{AppError, AppResult};
use teamlunch_db::{entities::user, repositories::UserRepository};
use validator::Validate;

/// Input for creating or replacing a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,
}

impl UserInput {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    pub async fn get(&self, id: i32) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    pub async fn create(&self, input: UserInput) -> AppResult<user::Model> {
        let input = input.trimmed();
        input.validate()?;

        let model = user::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            ..Default::default()
        };
        let created = self.user_repo.create(model).await?;
        tracing::info!(user_id = created.id, "Created user");
        Ok(created)
    }

    /// Replace a user's name and email.
    pub async fn update(&self, id: i32, input: UserInput) -> AppResult<user::Model> {
        let input = input.trimmed();
        input.validate()?;

        let existing = self.user_repo.get_by_id(id).await?;
        let mut model: user::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.email = Set(input.email);
        self.user_repo.update(model).await
    }

    /// Delete a user together with their votes.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = self.user_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_user(id: i32, name: &str, email: &str) -> user::Model {
        user::Model {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn service(db: MockDatabase) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user(1, "Ana", "ana@example.com")]]),
        );

        let user = service
            .create(UserInput {
                name: "  Ana ".to_string(),
                email: "ana@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Ana");
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(UserInput {
                name: "Ana".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_blank_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(Arc::clone(&db)));

        let result = service
            .create(UserInput {
                name: "   ".to_string(),
                email: "ana@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        drop(service);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_update_user_rejects_blank_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .update(
                3,
                UserInput {
                    name: " \t ".to_string(),
                    email: "caio@example.com".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_long_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(UserInput {
                name: "x".repeat(101),
                email: "ana@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [test_user(3, "Caio", "caio@example.com")],
                    [test_user(3, "Caio Lima", "caio@lima.dev")],
                ]),
        );

        let user = service
            .update(
                3,
                UserInput {
                    name: "Caio Lima".to_string(),
                    email: "caio@lima.dev".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(user.name, "Caio Lima");
        assert_eq!(user.email, "caio@lima.dev");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = service
            .update(
                9,
                UserInput {
                    name: "Nobody".to_string(),
                    email: "nobody@example.com".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
        );

        let result = service.delete(5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        assert!(service.delete(5).await.is_ok());
    }
}
