use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use tomati_model::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. The password hash is stored alongside the
    /// row but never read back into [`User`]. Duplicate emails surface as
    /// `Conflict`.
    async fn create_user(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<()>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_password_hash(&self, user_id: Uuid)
    -> Result<Option<String>>;

    async fn count_users(&self) -> Result<i64>;
}
