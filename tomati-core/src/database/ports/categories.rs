use async_trait::async_trait;

use crate::error::Result;
use tomati_model::category::Category;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Duplicate names surface as `Conflict`.
    async fn create_category(&self, category: &Category) -> Result<()>;
}
