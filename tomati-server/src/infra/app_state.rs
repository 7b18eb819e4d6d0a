use std::{fmt, sync::Arc};

use tomati_core::database::PostgresDatabase;
use tomati_core::database::ports::{
    CategoryRepository, ProductRepository, StatsRepository, UserRepository,
};
use tomati_core::database::postgres::{
    PostgresCategoryRepository, PostgresConversationRepository,
    PostgresLikeRepository, PostgresNotificationRepository,
    PostgresProductRepository, PostgresStatsRepository,
    PostgresUserRepository,
};
use tomati_core::messaging::MessagingService;
use tomati_core::notifications::NotificationService;
use tomati_core::promotion::PromotionEngine;

use crate::infra::config::Config;

/// Everything a request handler can reach: configuration, the database
/// handle, and the wired domain services.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<PostgresDatabase>,
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub promotion_engine: Arc<PromotionEngine>,
    pub notifications: NotificationService,
    pub messaging: MessagingService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the Postgres repositories and services over one pool.
    pub fn new(config: Arc<Config>, db: Arc<PostgresDatabase>) -> Self {
        let pool = db.pool().clone();

        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(pool.clone()));
        let products: Arc<dyn ProductRepository> =
            Arc::new(PostgresProductRepository::new(pool.clone()));
        let categories: Arc<dyn CategoryRepository> =
            Arc::new(PostgresCategoryRepository::new(pool.clone()));
        let stats: Arc<dyn StatsRepository> =
            Arc::new(PostgresStatsRepository::new(pool.clone()));

        let notifications = NotificationService::new(Arc::new(
            PostgresNotificationRepository::new(pool.clone()),
        ));
        let promotion_engine = Arc::new(PromotionEngine::new(
            Arc::new(PostgresLikeRepository::new(pool.clone())),
            notifications.clone(),
        ));
        let messaging = MessagingService::new(
            Arc::new(PostgresConversationRepository::new(pool)),
            products.clone(),
            notifications.clone(),
        );

        Self {
            config,
            db,
            users,
            products,
            categories,
            stats,
            promotion_engine,
            notifications,
            messaging,
        }
    }
}
