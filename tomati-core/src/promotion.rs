//! Like-driven product promotion.
//!
//! A product accumulates at most one like per user; when the authoritative
//! like count first reaches [`PROMOTION_THRESHOLD`] the product is
//! promoted, permanently. The storage layer performs the accept / recount /
//! promote sequence atomically (see
//! [`crate::database::ports::likes::LikeRepository::record_like`]); this
//! engine layers the one-time owner notification on top and is the only
//! writer of a product's like and promotion fields.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::database::ports::likes::LikeRepository;
use crate::error::Result;
use crate::notifications::NotificationService;
use tomati_model::like::LikeOutcome;

#[derive(Clone)]
pub struct PromotionEngine {
    likes: Arc<dyn LikeRepository>,
    notifications: NotificationService,
}

impl std::fmt::Debug for PromotionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromotionEngine").finish_non_exhaustive()
    }
}

impl PromotionEngine {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            likes,
            notifications,
        }
    }

    /// Record a like from `liker_id` on `product_id`.
    ///
    /// Returns the authoritative like count and whether this call
    /// performed the promotion transition. All rejections (`NotFound`,
    /// `Forbidden` for self-likes, `Conflict` for duplicates) leave no
    /// state behind; an `Internal` failure is safe to retry because the
    /// like insert is idempotent under the storage unique constraint.
    pub async fn record_like(
        &self,
        product_id: Uuid,
        liker_id: Uuid,
    ) -> Result<LikeOutcome> {
        let grant = self.likes.record_like(product_id, liker_id).await?;

        if grant.outcome.was_promoted {
            info!(
                %product_id,
                like_count = grant.outcome.new_like_count,
                "product promoted after reaching like threshold"
            );

            // The like is already committed; a lost notification must
            // not undo it.
            if let Err(error) = self
                .notifications
                .notify_product_promoted(
                    grant.owner_id,
                    &grant.product_title,
                    product_id,
                )
                .await
            {
                warn!(
                    %product_id,
                    %error,
                    "failed to notify owner about promotion"
                );
            }
        }

        Ok(grant.outcome)
    }

    /// Whether `user_id` has already liked `product_id`. No side effects.
    pub async fn has_liked(
        &self,
        product_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        self.likes.has_liked(product_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;

    use super::*;
    use crate::database::ports::likes::LikeGrant;
    use crate::database::ports::notifications::NotificationRepository;
    use crate::error::MarketError;
    use tomati_model::like::PROMOTION_THRESHOLD;
    use tomati_model::notification::Notification;

    mock! {
        LikeStore {}

        #[async_trait]
        impl LikeRepository for LikeStore {
            async fn record_like(
                &self,
                product_id: Uuid,
                user_id: Uuid,
            ) -> Result<LikeGrant>;
            async fn has_liked(
                &self,
                product_id: Uuid,
                user_id: Uuid,
            ) -> Result<bool>;
        }
    }

    mock! {
        NotificationStore {}

        #[async_trait]
        impl NotificationRepository for NotificationStore {
            async fn create(&self, notification: &Notification) -> Result<()>;
            async fn list_for_user(
                &self,
                user_id: Uuid,
            ) -> Result<Vec<Notification>>;
            async fn unread_count(&self, user_id: Uuid) -> Result<i64>;
            async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
            async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;
            async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
        }
    }

    fn grant(count: i64, promoted: bool, owner: Uuid) -> LikeGrant {
        LikeGrant {
            outcome: LikeOutcome {
                new_like_count: count,
                was_promoted: promoted,
            },
            owner_id: owner,
            product_title: "Vélo de ville".to_string(),
        }
    }

    fn engine_with(
        likes: MockLikeStore,
        notifications: MockNotificationStore,
    ) -> PromotionEngine {
        PromotionEngine::new(
            Arc::new(likes),
            NotificationService::new(Arc::new(notifications)),
        )
    }

    #[tokio::test]
    async fn promoting_like_notifies_owner_once() {
        let product_id = Uuid::new_v4();
        let liker = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut likes = MockLikeStore::new();
        likes
            .expect_record_like()
            .with(eq(product_id), eq(liker))
            .times(1)
            .returning(move |_, _| Ok(grant(3, true, owner)));

        let mut notifications = MockNotificationStore::new();
        notifications
            .expect_create()
            .withf(move |n| {
                n.user_id == owner && n.related_id == Some(product_id)
            })
            .times(1)
            .returning(|_| Ok(()));

        let engine = engine_with(likes, notifications);
        let outcome = engine.record_like(product_id, liker).await.unwrap();
        assert_eq!(outcome.new_like_count, 3);
        assert!(outcome.was_promoted);
    }

    #[tokio::test]
    async fn ordinary_like_stays_quiet() {
        let owner = Uuid::new_v4();

        let mut likes = MockLikeStore::new();
        likes
            .expect_record_like()
            .returning(move |_, _| Ok(grant(1, false, owner)));

        let mut notifications = MockNotificationStore::new();
        notifications.expect_create().times(0);

        let engine = engine_with(likes, notifications);
        let outcome = engine
            .record_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(outcome.new_like_count, 1);
        assert!(!outcome.was_promoted);
    }

    #[tokio::test]
    async fn lost_notification_does_not_fail_the_like() {
        let owner = Uuid::new_v4();

        let mut likes = MockLikeStore::new();
        likes
            .expect_record_like()
            .returning(move |_, _| Ok(grant(3, true, owner)));

        let mut notifications = MockNotificationStore::new();
        notifications.expect_create().times(1).returning(|_| {
            Err(MarketError::Internal("notification store down".to_string()))
        });

        let engine = engine_with(likes, notifications);
        let outcome = engine
            .record_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(outcome.was_promoted);
    }

    #[tokio::test]
    async fn storage_rejections_pass_through() {
        let mut likes = MockLikeStore::new();
        likes.expect_record_like().returning(|_, _| {
            Err(MarketError::Conflict("already liked".to_string()))
        });

        let mut notifications = MockNotificationStore::new();
        notifications.expect_create().times(0);

        let engine = engine_with(likes, notifications);
        let error = engine
            .record_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::Conflict(_)));
    }

    // In-memory like store reproducing the storage contract, for
    // exercising the engine against full like/promote sequences.
    struct ProductState {
        owner_id: Uuid,
        likers: HashSet<Uuid>,
        promoted: bool,
    }

    struct InMemoryLikeStore {
        products: Mutex<HashMap<Uuid, ProductState>>,
    }

    impl InMemoryLikeStore {
        fn with_product(owner_id: Uuid) -> (Arc<Self>, Uuid) {
            let product_id = Uuid::new_v4();
            let mut products = HashMap::new();
            products.insert(
                product_id,
                ProductState {
                    owner_id,
                    likers: HashSet::new(),
                    promoted: false,
                },
            );
            (
                Arc::new(Self {
                    products: Mutex::new(products),
                }),
                product_id,
            )
        }
    }

    #[async_trait]
    impl LikeRepository for InMemoryLikeStore {
        async fn record_like(
            &self,
            product_id: Uuid,
            user_id: Uuid,
        ) -> Result<LikeGrant> {
            let mut products = self.products.lock().unwrap();
            let state = products.get_mut(&product_id).ok_or_else(|| {
                MarketError::NotFound("Product not found".to_string())
            })?;

            if state.owner_id == user_id {
                return Err(MarketError::Forbidden(
                    "cannot like your own product".to_string(),
                ));
            }
            if !state.likers.insert(user_id) {
                return Err(MarketError::Conflict(
                    "already liked".to_string(),
                ));
            }

            let new_count = state.likers.len() as i64;
            let promotes =
                !state.promoted && new_count >= PROMOTION_THRESHOLD;
            if promotes {
                state.promoted = true;
            }

            Ok(LikeGrant {
                outcome: LikeOutcome {
                    new_like_count: new_count,
                    was_promoted: promotes,
                },
                owner_id: state.owner_id,
                product_title: "Table en bois".to_string(),
            })
        }

        async fn has_liked(
            &self,
            product_id: Uuid,
            user_id: Uuid,
        ) -> Result<bool> {
            let products = self.products.lock().unwrap();
            Ok(products
                .get(&product_id)
                .map(|state| state.likers.contains(&user_id))
                .unwrap_or(false))
        }
    }

    fn engine_over(store: Arc<InMemoryLikeStore>) -> PromotionEngine {
        let mut notifications = MockNotificationStore::new();
        notifications.expect_create().returning(|_| Ok(()));
        PromotionEngine::new(
            store,
            NotificationService::new(Arc::new(notifications)),
        )
    }

    #[tokio::test]
    async fn promotion_fires_exactly_once_across_five_likes() {
        let owner = Uuid::new_v4();
        let (store, product_id) = InMemoryLikeStore::with_product(owner);
        let engine = engine_over(store);

        let mut transitions = Vec::new();
        for n in 1..=5_i64 {
            let liker = Uuid::new_v4();
            let outcome =
                engine.record_like(product_id, liker).await.unwrap();
            assert_eq!(outcome.new_like_count, n);
            transitions.push(outcome.was_promoted);
            assert!(engine.has_liked(product_id, liker).await.unwrap());
        }

        assert_eq!(transitions, vec![false, false, true, false, false]);
    }

    #[tokio::test]
    async fn duplicate_like_is_conflict_and_count_holds() {
        let owner = Uuid::new_v4();
        let (store, product_id) = InMemoryLikeStore::with_product(owner);
        let engine = engine_over(store);

        let liker = Uuid::new_v4();
        let first = engine.record_like(product_id, liker).await.unwrap();
        assert_eq!(first.new_like_count, 1);

        let error =
            engine.record_like(product_id, liker).await.unwrap_err();
        assert!(matches!(error, MarketError::Conflict(_)));

        // The next accepted like sees a count untouched by the rejection.
        let second = engine
            .record_like(product_id, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(second.new_like_count, 2);
    }

    #[tokio::test]
    async fn owner_cannot_like_their_own_product() {
        let owner = Uuid::new_v4();
        let (store, product_id) = InMemoryLikeStore::with_product(owner);
        let engine = engine_over(store);

        let error =
            engine.record_like(product_id, owner).await.unwrap_err();
        assert!(matches!(error, MarketError::Forbidden(_)));
        assert!(!engine.has_liked(product_id, owner).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (store, _) = InMemoryLikeStore::with_product(Uuid::new_v4());
        let engine = engine_over(store);

        let error = engine
            .record_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(error, MarketError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_likers_promote_exactly_once() {
        let owner = Uuid::new_v4();
        let (store, product_id) = InMemoryLikeStore::with_product(owner);
        let engine = engine_over(store);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.record_like(product_id, Uuid::new_v4()).await
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        let promotions =
            outcomes.iter().filter(|o| o.was_promoted).count();
        assert_eq!(promotions, 1);

        let final_count =
            outcomes.iter().map(|o| o.new_like_count).max().unwrap();
        assert_eq!(final_count, 8);

        // The promoting response is the one that observed the threshold.
        let promoting = outcomes.iter().find(|o| o.was_promoted).unwrap();
        assert_eq!(promoting.new_like_count, PROMOTION_THRESHOLD);
    }
}
