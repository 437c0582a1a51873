//! Account repository

use super::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert an account; a username or email already used as either
    /// surfaces as `StoreError::UniqueViolation`
    async fn create(&self, account: NewAccount) -> StoreResult<AccountRecord>;

    /// Find an account whose username, or failing that email, equals `identifier`
    async fn find_by_login(&self, identifier: &str) -> StoreResult<Option<AccountRecord>>;

    async fn username_exists(&self, username: &str) -> StoreResult<bool>;

    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Check the datastore is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<AccountRecord> {
        // The UNIQUE constraints cover each column; the NOT EXISTS guard
        // also keeps a username from matching another account's email.
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (
                SELECT 1 FROM accounts
                WHERE username = $1 OR email = $1 OR username = $2 OR email = $2
            )
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = record {
            return Ok(record);
        }

        let username_taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1 OR email = $1)
            "#,
        )
        .bind(&account.username)
        .fetch_one(&self.pool)
        .await?;

        let constraint = if username_taken {
            "accounts_username_key"
        } else {
            "accounts_email_key"
        };
        Err(StoreError::UniqueViolation(constraint.to_string()))
    }

    async fn find_by_login(&self, identifier: &str) -> StoreResult<Option<AccountRecord>> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE username = $1 OR email = $1
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
