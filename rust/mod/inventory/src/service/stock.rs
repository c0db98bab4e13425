//! Remaining-stock derivation.
//!
//! Nothing here is cached: every call reloads both collections, so a value is
//! always consistent with the last committed write.

use std::collections::HashMap;

use crate::model::{Demand, StockLevel, UsageRecord};
use crate::service::{InventoryError, InventoryService};

/// Total quantity recorded against `demand_id`.
pub(crate) fn used_for(records: &[UsageRecord], demand_id: &str) -> u64 {
    records
        .iter()
        .filter(|r| r.demand_id == demand_id)
        .map(|r| u64::from(r.quantity))
        .sum()
}

/// Used quantity per demand id, built in one pass.
fn used_by_demand(records: &[UsageRecord]) -> HashMap<&str, u64> {
    let mut used: HashMap<&str, u64> = HashMap::new();
    for r in records {
        *used.entry(r.demand_id.as_str()).or_default() += u64::from(r.quantity);
    }
    used
}

impl InventoryService {
    /// `max(0, requested − Σ used)` for the demand, or 0 if it does not exist.
    pub fn remaining(&self, demand_id: &str) -> Result<u64, InventoryError> {
        let demands: Vec<Demand> = self.load()?;
        let Some(demand) = demands.iter().find(|d| d.id == demand_id) else {
            return Ok(0);
        };
        let records: Vec<UsageRecord> = self.load()?;
        Ok(StockLevel::new(demand, used_for(&records, demand_id)).remaining)
    }

    /// Requested, used and remaining quantity for one demand.
    pub fn stock_level(&self, demand_id: &str) -> Result<StockLevel, InventoryError> {
        let demand = self.get_demand(demand_id)?;
        let records: Vec<UsageRecord> = self.load()?;
        Ok(StockLevel::new(&demand, used_for(&records, demand_id)))
    }

    /// Stock level of every demand, in demand storage order.
    pub fn stock_levels(&self) -> Result<Vec<StockLevel>, InventoryError> {
        let demands: Vec<Demand> = self.load()?;
        let records: Vec<UsageRecord> = self.load()?;
        let used = used_by_demand(&records);

        Ok(demands
            .iter()
            .map(|d| StockLevel::new(d, used.get(d.id.as_str()).copied().unwrap_or(0)))
            .collect())
    }
}
