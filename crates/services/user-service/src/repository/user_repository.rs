//! User repository implementation.
//!
//! Every statement goes through SeaORM's typed query builders, so values are
//! always sent as bound parameters. Lookups return `None` for missing rows;
//! store failures propagate unchanged as `AppError::Database`.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::config::UserStoreConfig;
use crate::infra::hasher::hash_password;
use common::{AppError, AppResult};
use domain::{CreatedUser, Role, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user in store order
    async fn find_all_users(&self) -> AppResult<Vec<User>>;

    /// Hash the password and insert a new user. No role is assigned.
    async fn create_user(&self, username: &str, password: &str) -> AppResult<CreatedUser>;

    /// Insert a new user and bind it to the default role in one transaction
    async fn create_user_with_default_role(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<CreatedUser>;

    /// Find user by exact username
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_user_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Replace the stored hash. Missing ids are a no-op.
    async fn change_password(&self, user_id: i32, new_password: &str) -> AppResult<()>;

    /// Remove the user's role assignments and then the user, atomically
    async fn delete_user(&self, user_id: i32) -> AppResult<()>;

    /// Overwrite username and password. Missing ids are a no-op.
    async fn admin_update_user(&self, id: i32, username: &str, password: &str) -> AppResult<()>;

    /// Names of the roles assigned to the user
    async fn get_user_roles(&self, user_id: i32) -> AppResult<Vec<String>>;

    /// Bind the user to the configured default role
    async fn assign_default_role(&self, user_id: i32) -> AppResult<()>;

    /// List the role reference data
    async fn find_all_roles(&self) -> AppResult<Vec<Role>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
    config: UserStoreConfig,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection, config: UserStoreConfig) -> Self {
        Self { db, config }
    }

    /// Run `f` inside a transaction: commit on success, roll back on error.
    async fn in_transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>
            + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(AppError::from(e))
            }
        }
    }
}

async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password_hash: String,
) -> Result<CreatedUser, DbErr> {
    let model = user::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        password: Set(password_hash),
    }
    .insert(conn)
    .await?;

    Ok(CreatedUser {
        id: model.id,
        username: model.username,
    })
}

async fn insert_role_assignment<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    role_id: i32,
) -> Result<(), DbErr> {
    let assignment = user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    };

    UserRoleEntity::insert(assignment)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Association rows go first; the user row cannot be removed while they exist.
async fn delete_user_rows<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(u64, u64), DbErr> {
    let roles = UserRoleEntity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    let users = UserEntity::delete_by_id(user_id).exec(conn).await?;

    Ok((roles.rows_affected, users.rows_affected))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find().all(&self.db).await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, username: &str, password: &str) -> AppResult<CreatedUser> {
        let password_hash = hash_password(password).await?;
        let created = insert_user(&self.db, username, password_hash).await?;

        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    async fn create_user_with_default_role(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<CreatedUser> {
        let password_hash = hash_password(password).await?;
        let username = username.to_string();
        let role_id = self.config.default_role_id;

        let created = self
            .in_transaction(move |txn| {
                Box::pin(async move {
                    let created = insert_user(txn, &username, password_hash).await?;
                    insert_role_assignment(txn, created.id, role_id).await?;
                    Ok::<_, DbErr>(created)
                })
            })
            .await?;

        tracing::info!(user_id = created.id, role_id, "User created with default role");
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_user_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;

        Ok(result.map(User::from))
    }

    async fn change_password(&self, user_id: i32, new_password: &str) -> AppResult<()> {
        let password_hash = hash_password(new_password).await?;

        let result = UserEntity::update_many()
            .col_expr(user::Column::Password, Expr::value(password_hash))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        tracing::debug!(user_id, rows = result.rows_affected, "Password changed");
        Ok(())
    }

    async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        let (roles, users) = self
            .in_transaction(move |txn| Box::pin(delete_user_rows(txn, user_id)))
            .await?;

        tracing::info!(user_id, role_rows = roles, user_rows = users, "User deleted");
        Ok(())
    }

    async fn admin_update_user(&self, id: i32, username: &str, password: &str) -> AppResult<()> {
        let password_hash = hash_password(password).await?;

        let result = UserEntity::update_many()
            .col_expr(user::Column::Username, Expr::value(username))
            .col_expr(user::Column::Password, Expr::value(password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::debug!(user_id = id, rows = result.rows_affected, "User updated by admin");
        Ok(())
    }

    async fn get_user_roles(&self, user_id: i32) -> AppResult<Vec<String>> {
        let roles = RoleEntity::find()
            .select_only()
            .column(role::Column::Role)
            .inner_join(UserRoleEntity)
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(roles)
    }

    async fn assign_default_role(&self, user_id: i32) -> AppResult<()> {
        let role_id = self.config.default_role_id;
        insert_role_assignment(&self.db, user_id, role_id).await?;

        tracing::debug!(user_id, role_id, "Default role assigned");
        Ok(())
    }

    async fn find_all_roles(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }
}
