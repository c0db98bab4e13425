pub mod admin;
pub mod demand;
pub mod query;
pub mod stock;
pub mod usage;

use std::sync::{Arc, Mutex, MutexGuard};

use hms_kv::{KVError, KVStore};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::DemandStatus;
use crate::store::{CollectionStore, Record};

/// Inventory error type.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid transition: demand '{id}' is {from}, cannot become {to}")]
    InvalidTransition {
        id: String,
        from: DemandStatus,
        to: DemandStatus,
    },

    #[error(
        "capacity exceeded: demand '{demand_id}' has {remaining} remaining, {requested} requested"
    )]
    CapacityExceeded {
        demand_id: String,
        requested: u64,
        remaining: u64,
    },

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<KVError> for InventoryError {
    fn from(e: KVError) -> Self {
        InventoryError::Storage(e.to_string())
    }
}

impl From<InventoryError> for hms_core::ServiceError {
    fn from(e: InventoryError) -> Self {
        use hms_core::ServiceError;

        let message = e.to_string();
        match e {
            InventoryError::Validation(_) => ServiceError::Validation(message),
            InventoryError::NotFound(_) => ServiceError::NotFound(message),
            InventoryError::InvalidTransition { .. } => ServiceError::InvalidTransition(message),
            InventoryError::CapacityExceeded { .. } => ServiceError::CapacityExceeded(message),
            InventoryError::Storage(_) => ServiceError::Storage(message),
            InventoryError::Internal(_) => ServiceError::Internal(message),
        }
    }
}

/// Demand ledger, usage ledger and stock accounting over one store.
///
/// Every read-modify-write runs under `write_lock`, so two usage submissions
/// sharing a service cannot both pass the remaining-stock check before either
/// is saved. Reads take no lock; each store write is atomic on its own.
pub struct InventoryService {
    store: CollectionStore,
    catalog: Catalog,
    write_lock: Mutex<()>,
}

impl InventoryService {
    /// Service with the built-in catalog.
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self::with_catalog(kv, Catalog::default())
    }

    pub fn with_catalog(kv: Arc<dyn KVStore>, catalog: Catalog) -> Self {
        Self {
            store: CollectionStore::new(kv),
            catalog,
            write_lock: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, InventoryError> {
        self.write_lock
            .lock()
            .map_err(|_| InventoryError::Internal("inventory write lock poisoned".into()))
    }

    fn load<T: Record>(&self) -> Result<Vec<T>, InventoryError> {
        Ok(self.store.load::<T>()?)
    }

    fn save<T: Record>(&self, records: &[T]) -> Result<(), InventoryError> {
        Ok(self.store.save(records)?)
    }
}

/// Trimmed copy of a required text field, or a validation error naming it.
fn required(field: &str, value: &str) -> Result<String, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Quantity as stored, or a validation error when it is not positive.
fn positive_quantity(quantity: i64) -> Result<u32, InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }
    u32::try_from(quantity)
        .map_err(|_| InventoryError::Validation(format!("quantity {quantity} is too large")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use hms_kv::MemoryStore;

    use super::InventoryService;
    use crate::model::{CreateDemand, Demand, RecordUsage, UsageRecord};

    pub fn service() -> (InventoryService, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        (InventoryService::new(kv.clone()), kv)
    }

    pub fn bandages(quantity: i64) -> CreateDemand {
        CreateDemand {
            department: "Emergency".into(),
            item: "Bandages".into(),
            subcategory: "Gauze".into(),
            quantity,
            date: "2024-05-01".into(),
        }
    }

    pub fn demand(svc: &InventoryService, owner: &str, quantity: i64) -> Demand {
        svc.create_demand(bandages(quantity), owner).unwrap()
    }

    pub fn use_stock(
        svc: &InventoryService,
        demand_id: &str,
        owner: &str,
        quantity: i64,
    ) -> UsageRecord {
        svc.record_usage(
            RecordUsage {
                demand_id: demand_id.into(),
                patient_id: "P-100".into(),
                quantity,
            },
            owner,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("item", "  Stents ").unwrap(), "Stents");
        let err = required("item", "   ").unwrap_err();
        assert_eq!(err.to_string(), "validation: item is required");
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(positive_quantity(1).unwrap(), 1);
        assert!(positive_quantity(0).is_err());
        assert!(positive_quantity(-3).is_err());
        assert!(positive_quantity(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_converts_to_service_error_codes() {
        let err: hms_core::ServiceError = InventoryError::CapacityExceeded {
            demand_id: "d1".into(),
            requested: 5,
            remaining: 1,
        }
        .into();
        assert_eq!(err.error_code(), "CAPACITY_EXCEEDED");
        assert!(err.to_string().contains("1 remaining"));

        let err: hms_core::ServiceError = InventoryError::InvalidTransition {
            id: "d1".into(),
            from: DemandStatus::Approved,
            to: DemandStatus::Rejected,
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");

        let err: hms_core::ServiceError = InventoryError::from(KVError::Storage("disk".into())).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
