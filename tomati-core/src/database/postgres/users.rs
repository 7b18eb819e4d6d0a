use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::ports::users::UserRepository;
use crate::error::{MarketError, Result};
use tomati_model::user::{User, UserRole};

const USER_COLUMNS: &str =
    "id, email, display_name, role, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<User> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!("Failed to read user row: {e}"))
        };

        let role: String = row.try_get("role").map_err(read)?;
        let role: UserRole = role
            .parse()
            .map_err(|e: String| MarketError::Internal(e))?;

        Ok(User {
            id: row.try_get("id").map_err(read)?,
            email: row.try_get("email").map_err(read)?,
            display_name: row.try_get("display_name").map_err(read)?,
            role,
            created_at: row.try_get("created_at").map_err(read)?,
            updated_at: row.try_get("updated_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, display_name, role,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(MarketError::Conflict(
                    "User already exists".to_string(),
                ))
            }
            Err(e) => Err(MarketError::Internal(format!(
                "Failed to create user: {e}"
            ))),
        }
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to fetch user: {e}"))
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to fetch user by email: {e}"
            ))
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn get_password_hash(
        &self,
        user_id: Uuid,
    ) -> Result<Option<String>> {
        let hash: Option<String> = sqlx::query_scalar(
            "SELECT password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to fetch password hash: {e}"
            ))
        })?;

        Ok(hash)
    }

    async fn count_users(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                MarketError::Internal(format!("Failed to count users: {e}"))
            })
    }
}
