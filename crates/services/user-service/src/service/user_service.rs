//! User service - Handles user-related use cases on top of the repository.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{CreatedUser, Role, User, UserCredentials};

use crate::infra::hasher::verify_password;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get user by ID, `NotFound` if absent
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Get user by username, `NotFound` if absent
    async fn get_user_by_username(&self, username: &str) -> AppResult<User>;

    /// Create a user and give it the default role atomically
    async fn register_user(&self, credentials: UserCredentials) -> AppResult<CreatedUser>;

    /// Create a user without any role
    async fn create_user(&self, credentials: UserCredentials) -> AppResult<CreatedUser>;

    /// Check a login attempt
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    /// Replace a user's password
    async fn change_password(&self, id: i32, new_password: &str) -> AppResult<()>;

    /// Overwrite username and password
    async fn admin_update_user(&self, id: i32, credentials: UserCredentials) -> AppResult<()>;

    /// Delete a user together with its role assignments
    async fn delete_user(&self, id: i32) -> AppResult<()>;

    /// Role names assigned to a user
    async fn get_user_roles(&self, id: i32) -> AppResult<Vec<String>>;

    /// Bind an existing user to the default role
    async fn assign_default_role(&self, id: i32) -> AppResult<()>;

    /// List the role reference data
    async fn list_roles(&self) -> AppResult<Vec<Role>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.find_all_users().await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo.find_user_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        self.repo
            .find_user_by_username(username)
            .await?
            .ok_or_not_found()
    }

    async fn register_user(&self, credentials: UserCredentials) -> AppResult<CreatedUser> {
        self.repo
            .create_user_with_default_role(&credentials.username, &credentials.password)
            .await
    }

    async fn create_user(&self, credentials: UserCredentials) -> AppResult<CreatedUser> {
        self.repo
            .create_user(&credentials.username, &credentials.password)
            .await
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.repo.find_user_by_username(username).await? else {
            tracing::warn!(username, "Login attempt for unknown user");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn change_password(&self, id: i32, new_password: &str) -> AppResult<()> {
        self.repo.change_password(id, new_password).await
    }

    async fn admin_update_user(&self, id: i32, credentials: UserCredentials) -> AppResult<()> {
        self.repo
            .admin_update_user(id, &credentials.username, &credentials.password)
            .await
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repo.delete_user(id).await
    }

    async fn get_user_roles(&self, id: i32) -> AppResult<Vec<String>> {
        self.repo.get_user_roles(id).await
    }

    async fn assign_default_role(&self, id: i32) -> AppResult<()> {
        self.repo.assign_default_role(id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repo.find_all_roles().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn create_test_user(id: i32, password: &str) -> User {
        User::new(id, "alice", domain::password::hash(password).unwrap())
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(User::new(id, "alice", "hash"))));

        let user = service(repo).get_user(7).await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_id().returning(|_| Ok(None));

        let result = service(repo).get_user(99).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_username()
            .withf(|username| username == "ghost")
            .returning(|_| Ok(None));

        let result = service(repo).get_user_by_username("ghost").await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_register_user_uses_default_role_path() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user_with_default_role()
            .withf(|username, password| username == "alice" && password == "secret")
            .times(1)
            .returning(|username, _| {
                Ok(CreatedUser {
                    id: 1,
                    username: username.to_string(),
                })
            });
        repo.expect_create_user().never();

        let created = service(repo)
            .register_user(UserCredentials::new("alice", "secret"))
            .await
            .unwrap();
        assert_eq!(created, CreatedUser { id: 1, username: "alice".to_string() });
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repo = MockUserRepository::new();
        let user = create_test_user(1, "secret");
        repo.expect_find_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repo).authenticate("alice", "secret").await;
        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut repo = MockUserRepository::new();
        let user = create_test_user(1, "secret");
        repo.expect_find_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(repo).authenticate("alice", "guess").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_username().returning(|_| Ok(None));

        let result = service(repo).authenticate("nobody", "secret").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_admin_update_passes_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_admin_update_user()
            .withf(|id, username, password| *id == 3 && username == "bob" && password == "pw")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = service(repo)
            .admin_update_user(3, UserCredentials::new("bob", "pw"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_propagates_store_errors() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_user()
            .returning(|_| Err(AppError::Database(sea_orm::DbErr::Custom("boom".into()))));

        let result = service(repo).delete_user(1).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_user_roles_empty() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_roles().returning(|_| Ok(vec![]));

        let roles = service(repo).get_user_roles(5).await.unwrap();
        assert!(roles.is_empty());
    }
}
