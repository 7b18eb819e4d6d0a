use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use tomati_model::product::{Product, ProductFilter, ProductPatch};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: &Product) -> Result<()>;

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;

    /// Catalog listing, newest first, honoring category/search filters.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>>;

    /// Promoted listings ordered by promotion time.
    async fn list_promoted(&self) -> Result<Vec<Product>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>>;

    /// Apply a partial update; returns the updated row, `None` when the
    /// product does not exist.
    async fn update_product(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>>;

    /// Returns `false` when the product did not exist.
    async fn delete_product(&self, id: Uuid) -> Result<bool>;

    async fn increment_views(&self, id: Uuid) -> Result<()>;
}
