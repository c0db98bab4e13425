//! Hospital inventory: emergency supply demands, usage against them, and the
//! stock accounting that ties the two together.
//!
//! ```text
//! incharge ──create_demand──▶ Demand (pending) ──admin──▶ approved | rejected
//!     │
//!     └──record_usage──▶ UsageRecord ──▶ remaining = max(0, requested − Σ used)
//! ```
//!
//! Both collections live in one [`hms_kv::KVStore`] as whole-collection JSON
//! snapshots under the `demands` and `usage_records` keys.

pub mod catalog;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use hms_core::ServiceConfig;
use hms_kv::{KVStore, RedbStore};

pub use catalog::Catalog;
pub use model::{
    CreateDemand, Demand, DemandStatus, InventoryStats, RecordUsage, StockLevel, UsageRecord,
};
pub use service::query::{DemandFilter, UsageFilter};
pub use service::{InventoryError, InventoryService};
pub use store::{CollectionStore, Record, Slot};

/// Open the durable store described by `config` and build a service over it.
pub fn open(config: &ServiceConfig, catalog: Catalog) -> Result<InventoryService, InventoryError> {
    let path = config.resolve_db_path();
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&path)?);
    tracing::debug!("inventory store at {}", path.display());
    Ok(InventoryService::with_catalog(kv, catalog))
}
