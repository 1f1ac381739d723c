//! Repository backed by SeaORM entities.
//!
//! Timestamps are written by the application, the way auto-timestamp ORMs
//! do it, instead of relying on column defaults.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlxSqliteConnector,
};
use sqlx::SqlitePool;

use common::{AppResult, OptionExt, StoreResultExt};
use domain::User;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::handle::StoreHandle;
use super::{RepositoryKind, UserRepository};

/// `UserRepository` built on SeaORM active models.
pub struct OrmUserStore {
    handle: StoreHandle,
    db: DatabaseConnection,
}

impl OrmUserStore {
    /// Create new repository instance sharing `pool` with the ORM connection
    pub fn new(pool: SqlitePool) -> Self {
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
        Self {
            handle: StoreHandle::new(pool, RepositoryKind::Orm),
            db,
        }
    }
}

#[async_trait]
impl UserRepository for OrmUserStore {
    fn kind(&self) -> RepositoryKind {
        RepositoryKind::Orm
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all(&self) -> AppResult<Vec<User>> {
        self.handle.ensure_open("get_all")?;
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .store_context("get_all")?;

        Ok(models.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.handle.ensure_open("get_by_id")?;
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .store_context("get_by_id")?;

        result.map(User::from).ok_or_not_found()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, name: String, email: String) -> AppResult<User> {
        self.handle.ensure_open("create")?;
        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(name),
            email: Set(email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // SeaORM inserts, then fetches the row by its new primary key.
        let model = active_model
            .insert(&self.db)
            .await
            .store_context("create")?;
        Ok(User::from(model))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, id: i64, name: String, email: String) -> AppResult<()> {
        self.handle.ensure_open("update")?;
        let result = UserEntity::update_many()
            .col_expr(user::Column::Name, Expr::value(name))
            .col_expr(user::Column::Email, Expr::value(email))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .store_context("update")?;

        tracing::debug!(rows_affected = result.rows_affected, "User updated");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> AppResult<()> {
        self.handle.ensure_open("delete")?;
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .store_context("delete")?;

        tracing::debug!(rows_affected = result.rows_affected, "User deleted");
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.handle.close().await
    }
}
