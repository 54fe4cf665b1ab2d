//! Green Server - carbon-aware food ordering backend
//!
//! Merchants list products composed of ingredients with per-gram carbon
//! emission data; customers order them; quests and promotions add
//! incentives. Product emission and merchant carbon rating are derived
//! values kept in step with every composition change.
//!
//! # Module layout
//!
//! ```text
//! green-server/src/
//! ├── core/          # configuration, service state
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── catalog/       # emission aggregation, compositions, products
//! ├── orders/        # order lifecycle and totals
//! ├── marketing/     # quests and promotions
//! ├── accounts/      # customers and merchants
//! ├── services/      # file storage
//! └── utils/         # errors, logging, decimal helpers
//! ```

pub mod accounts;
pub mod catalog;
pub mod core;
pub mod db;
pub mod marketing;
pub mod orders;
pub mod services;
pub mod utils;

pub use accounts::AccountService;
pub use catalog::{CatalogService, CatalogStore, SqliteCatalogStore};
pub use core::{Config, ServerState};
pub use db::DbService;
pub use marketing::{PromotionService, QuestService};
pub use orders::OrderService;
pub use services::{FileMetadata, FileStore, LocalFileStore};
pub use utils::{AppError, AppResult, EntityKind};

// Re-export unified error types from shared
pub use shared::error::{ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Install the logger described by `config`
pub fn init_logging(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}
