use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::database::ports::products::ProductRepository;
use crate::error::{MarketError, Result};
use tomati_model::product::{Product, ProductFilter, ProductPatch};

const PRODUCT_COLUMNS: &str = "id, title, description, price, location, \
     image_url, category, like_count, view_count, is_reserved, is_free, \
     is_promoted, promoted_at, user_id, created_at, updated_at";

/// Hard cap on page size regardless of what the client asks for.
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Product> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!("Failed to read product row: {e}"))
        };

        Ok(Product {
            id: row.try_get("id").map_err(read)?,
            title: row.try_get("title").map_err(read)?,
            description: row.try_get("description").map_err(read)?,
            price: row.try_get("price").map_err(read)?,
            location: row.try_get("location").map_err(read)?,
            image_url: row.try_get("image_url").map_err(read)?,
            category: row.try_get("category").map_err(read)?,
            like_count: row.try_get("like_count").map_err(read)?,
            view_count: row.try_get("view_count").map_err(read)?,
            is_reserved: row.try_get("is_reserved").map_err(read)?,
            is_free: row.try_get("is_free").map_err(read)?,
            is_promoted: row.try_get("is_promoted").map_err(read)?,
            promoted_at: row.try_get("promoted_at").map_err(read)?,
            user_id: row.try_get("user_id").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
            updated_at: row.try_get("updated_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, price, location, image_url,
                category, like_count, view_count, is_reserved, is_free,
                is_promoted, promoted_at, user_id, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16
            )
            "#,
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.price)
        .bind(&product.location)
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.like_count)
        .bind(product.view_count)
        .bind(product.is_reserved)
        .bind(product.is_free)
        .bind(product.is_promoted)
        .bind(product.promoted_at)
        .bind(product.user_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to create product: {e}"))
        })?;

        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!("Failed to fetch product: {e}"))
        })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"),
        );

        if let Some(category) = &filter.category {
            builder.push(" AND category = ").push_bind(category);
        }

        if let Some(search) = &filter.search {
            let needle = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (LOWER(title) LIKE ")
                .push_bind(needle.clone())
                .push(" OR LOWER(COALESCE(description, '')) LIKE ")
                .push_bind(needle.clone())
                .push(" OR LOWER(category) LIKE ")
                .push_bind(needle.clone())
                .push(" OR LOWER(location) LIKE ")
                .push_bind(needle)
                .push(")");
        }

        let limit = filter.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = filter.offset.max(0);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to list products: {e}"
                ))
            })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_promoted(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_promoted ORDER BY promoted_at"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to list promoted products: {e}"
            ))
        })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to list seller products: {e}"
            ))
        })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update_product(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE products SET updated_at = NOW()");

        if let Some(title) = &patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = &patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(price) = &patch.price {
            builder.push(", price = ").push_bind(price);
        }
        if let Some(location) = &patch.location {
            builder.push(", location = ").push_bind(location);
        }
        if let Some(image_url) = &patch.image_url {
            builder.push(", image_url = ").push_bind(image_url);
        }
        if let Some(category) = &patch.category {
            builder.push(", category = ").push_bind(category);
        }
        if let Some(is_reserved) = patch.is_reserved {
            builder.push(", is_reserved = ").push_bind(is_reserved);
        }
        if let Some(is_free) = patch.is_free {
            builder.push(", is_free = ").push_bind(is_free);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {PRODUCT_COLUMNS}"));

        let row = builder
            .build()
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to update product: {e}"
                ))
            })?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                MarketError::Internal(format!(
                    "Failed to delete product: {e}"
                ))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE products SET view_count = view_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to increment view count: {e}"
            ))
        })?;

        Ok(())
    }
}
