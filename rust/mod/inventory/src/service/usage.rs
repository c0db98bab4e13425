use hms_core::{new_id, now_millis};
use tracing::{info, warn};

use crate::model::{Demand, DemandStatus, RecordUsage, UsageRecord};
use crate::service::stock::used_for;
use crate::service::{positive_quantity, required, InventoryError, InventoryService};

impl InventoryService {
    /// Record consumption of a demand for a patient.
    ///
    /// The remaining-stock check and the append happen under the write lock
    /// against the same snapshot, so recorded usage never exceeds the
    /// demand's quantity.
    pub fn record_usage(
        &self,
        input: RecordUsage,
        owner_id: &str,
    ) -> Result<UsageRecord, InventoryError> {
        let demand_id = required("demand id", &input.demand_id)?;
        let patient_id = required("patient id", &input.patient_id)?;
        let owner_id = required("owner id", owner_id)?;
        let quantity = positive_quantity(input.quantity)?;

        let _guard = self.lock()?;
        let demands: Vec<Demand> = self.load()?;
        let demand = demands
            .iter()
            .find(|d| d.id == demand_id)
            .ok_or_else(|| InventoryError::NotFound(format!("demand '{demand_id}'")))?;
        if demand.status == DemandStatus::Rejected {
            return Err(InventoryError::Validation(format!(
                "demand '{demand_id}' was rejected"
            )));
        }

        let mut records: Vec<UsageRecord> = self.load()?;
        let remaining = u64::from(demand.quantity).saturating_sub(used_for(&records, &demand_id));
        if u64::from(quantity) > remaining {
            warn!(
                demand_id = %demand_id,
                requested = quantity,
                remaining,
                "usage exceeds remaining stock"
            );
            return Err(InventoryError::CapacityExceeded {
                demand_id,
                requested: u64::from(quantity),
                remaining,
            });
        }

        let record = UsageRecord {
            id: new_id(),
            demand_id,
            patient_id,
            item_used: demand.item_label(),
            quantity,
            timestamp: now_millis(),
            owner_id,
        };
        records.push(record.clone());
        self.save(&records)?;

        info!(
            usage_id = %record.id,
            demand_id = %record.demand_id,
            quantity = record.quantity,
            remaining = remaining - u64::from(quantity),
            "usage recorded"
        );
        Ok(record)
    }

    /// Every usage record in creation order.
    pub fn list_usage(&self) -> Result<Vec<UsageRecord>, InventoryError> {
        self.load()
    }

    pub fn list_usage_by_owner(&self, owner_id: &str) -> Result<Vec<UsageRecord>, InventoryError> {
        let mut records: Vec<UsageRecord> = self.load()?;
        records.retain(|r| r.owner_id == owner_id);
        Ok(records)
    }

    pub fn list_usage_by_demand(
        &self,
        demand_id: &str,
    ) -> Result<Vec<UsageRecord>, InventoryError> {
        let mut records: Vec<UsageRecord> = self.load()?;
        records.retain(|r| r.demand_id == demand_id);
        Ok(records)
    }

    /// Permanently delete every usage record owned by `owner_id`. Demands and
    /// other owners' records are untouched. Returns how many were removed.
    pub fn clear_usage_by_owner(&self, owner_id: &str) -> Result<usize, InventoryError> {
        let _guard = self.lock()?;
        let mut records: Vec<UsageRecord> = self.load()?;
        let before = records.len();
        records.retain(|r| r.owner_id != owner_id);
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }

        info!(owner = %owner_id, removed, "usage records cleared");
        Ok(removed)
    }
}
