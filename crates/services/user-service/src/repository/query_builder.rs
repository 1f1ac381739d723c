//! Repository backed by SeaQuery statements.
//!
//! Statements are composed with the query builder and executed as raw
//! statements over a SeaORM connection; no entity types are involved.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Order, Query, SelectStatement};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, DeriveIden, FromQueryResult,
    SqlxSqliteConnector,
};
use sqlx::SqlitePool;

use common::{AppResult, OptionExt, StoreResultExt};
use domain::User;

use super::handle::StoreHandle;
use super::{RepositoryKind, UserRepository};

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, FromQueryResult)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            name: record.name,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn select_users() -> SelectStatement {
    Query::select()
        .columns([
            Users::Id,
            Users::Name,
            Users::Email,
            Users::CreatedAt,
            Users::UpdatedAt,
        ])
        .from(Users::Table)
        .to_owned()
}

/// `UserRepository` composing its SQL with SeaQuery.
pub struct QueryBuilderUserStore {
    handle: StoreHandle,
    db: DatabaseConnection,
}

impl QueryBuilderUserStore {
    /// Create new repository instance sharing `pool` with the SeaORM connection
    pub fn new(pool: SqlitePool) -> Self {
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
        Self {
            handle: StoreHandle::new(pool, RepositoryKind::QueryBuilder),
            db,
        }
    }

    async fn find(&self, id: i64) -> Result<Option<User>, DbErr> {
        let stmt = select_users()
            .and_where(Expr::col(Users::Id).eq(id))
            .to_owned();
        let backend = self.db.get_database_backend();

        let record = UserRecord::find_by_statement(backend.build(&stmt))
            .one(&self.db)
            .await?;
        Ok(record.map(User::from))
    }
}

#[async_trait]
impl UserRepository for QueryBuilderUserStore {
    fn kind(&self) -> RepositoryKind {
        RepositoryKind::QueryBuilder
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all(&self) -> AppResult<Vec<User>> {
        self.handle.ensure_open("get_all")?;
        let stmt = select_users().order_by(Users::Id, Order::Asc).to_owned();
        let backend = self.db.get_database_backend();

        let records = UserRecord::find_by_statement(backend.build(&stmt))
            .all(&self.db)
            .await
            .store_context("get_all")?;

        Ok(records.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.handle.ensure_open("get_by_id")?;
        self.find(id)
            .await
            .store_context("get_by_id")?
            .ok_or_not_found()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, name: String, email: String) -> AppResult<User> {
        self.handle.ensure_open("create")?;
        let now = Utc::now();
        let mut insert = Query::insert();
        insert.into_table(Users::Table).columns([
            Users::Name,
            Users::Email,
            Users::CreatedAt,
            Users::UpdatedAt,
        ]);
        insert
            .values([
                Expr::value(name),
                Expr::value(email),
                Expr::value(now),
                Expr::value(now),
            ])
            .map_err(|e| DbErr::Custom(e.to_string()))
            .store_context("create")?;

        let backend = self.db.get_database_backend();
        let result = self
            .db
            .execute(backend.build(&insert))
            .await
            .store_context("create")?;
        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| DbErr::Custom(format!("invalid row id: {}", e)))
            .store_context("create")?;

        // Separate read-back; a failure here is reported although the row exists.
        self.find(id)
            .await
            .and_then(|user| {
                user.ok_or_else(|| DbErr::RecordNotFound(format!("user {} after insert", id)))
            })
            .store_context("create")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, id: i64, name: String, email: String) -> AppResult<()> {
        self.handle.ensure_open("update")?;
        let stmt = Query::update()
            .table(Users::Table)
            .values([
                (Users::Name, Expr::value(name)),
                (Users::Email, Expr::value(email)),
                (Users::UpdatedAt, Expr::value(Utc::now())),
            ])
            .and_where(Expr::col(Users::Id).eq(id))
            .to_owned();
        let backend = self.db.get_database_backend();

        self.db
            .execute(backend.build(&stmt))
            .await
            .store_context("update")?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> AppResult<()> {
        self.handle.ensure_open("delete")?;
        let stmt = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
            .to_owned();
        let backend = self.db.get_database_backend();

        self.db
            .execute(backend.build(&stmt))
            .await
            .store_context("delete")?;
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.handle.close().await
    }
}
