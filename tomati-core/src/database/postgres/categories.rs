use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::database::ports::categories::CategoryRepository;
use crate::error::{MarketError, Result};
use tomati_model::category::Category;

#[derive(Debug, Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Category> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!(
                "Failed to read category row: {e}"
            ))
        };

        Ok(Category {
            id: row.try_get("id").map_err(read)?,
            name: row.try_get("name").map_err(read)?,
            icon: row.try_get("icon").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, icon, created_at FROM categories ORDER BY name",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to list categories: {e}"))
        })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn create_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, name, icon, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.icon)
        .bind(category.created_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(MarketError::Conflict(
                    "Category already exists".to_string(),
                ))
            }
            Err(e) => Err(MarketError::Internal(format!(
                "Failed to create category: {e}"
            ))),
        }
    }
}
