use shared::models::Product;
use std::sync::Arc;

use super::Config;
use crate::accounts::AccountService;
use crate::catalog::CatalogService;
use crate::db::DbService;
use crate::marketing::{PromotionService, QuestService};
use crate::orders::OrderService;
use crate::services::{FileMetadata, FileStore, LocalFileStore};
use crate::utils::{AppError, AppResult};

/// Service state
///
/// Holds the database and one instance of every service, each built with
/// its collaborators passed in explicitly. Cloning is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub quests: QuestService,
    pub promotions: PromotionService,
    pub files: Arc<dyn FileStore>,
}

impl ServerState {
    /// Build every service over an already opened database
    pub fn new(config: Config, db: DbService, files: Arc<dyn FileStore>) -> Self {
        let pool = db.pool.clone();
        Self {
            accounts: AccountService::new(pool.clone()),
            catalog: CatalogService::new(pool.clone()),
            orders: OrderService::new(pool.clone()),
            quests: QuestService::new(pool.clone()),
            promotions: PromotionService::new(pool),
            config,
            db,
            files,
        }
    }

    /// Initialize state
    ///
    /// 1. Working directory structure
    /// 2. Database (`config.database_path`, migrations applied)
    /// 3. File store and services
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db = DbService::new(&config.database_path).await?;
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(
            &config.upload_dir,
            &config.public_base_url,
        ));

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db, files))
    }

    /// Upload an image through the configured file store and attach it to a product
    pub async fn upload_product_image(
        &self,
        product_id: i64,
        data: &[u8],
        metadata: &FileMetadata,
    ) -> AppResult<Product> {
        self.catalog
            .upload_product_image(product_id, data, metadata, self.files.as_ref())
            .await
    }
}
