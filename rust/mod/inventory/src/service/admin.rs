use tracing::info;

use crate::model::{Demand, DemandStatus, InventoryStats, UsageRecord};
use crate::service::{InventoryError, InventoryService};
use crate::store::Slot;

impl InventoryService {
    /// Delete every demand and usage record in one store transaction.
    /// There is no partial variant and no undo.
    pub fn reset_all(&self) -> Result<(), InventoryError> {
        let _guard = self.lock()?;
        self.store.clear_all(&Slot::ALL)?;
        info!("inventory reset: all demands and usage records cleared");
        Ok(())
    }

    /// Dashboard counters over both ledgers.
    pub fn stats(&self) -> Result<InventoryStats, InventoryError> {
        let demands: Vec<Demand> = self.load()?;
        let records: Vec<UsageRecord> = self.load()?;

        let mut stats = InventoryStats {
            total_demands: demands.len(),
            total_usage_records: records.len(),
            total_units_used: records.iter().map(|r| u64::from(r.quantity)).sum(),
            ..Default::default()
        };
        for d in &demands {
            match d.status {
                DemandStatus::Pending => stats.pending_demands += 1,
                DemandStatus::Approved => stats.approved_demands += 1,
                DemandStatus::Rejected => stats.rejected_demands += 1,
            }
            *stats.by_department.entry(d.department.clone()).or_default() += 1;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateDemand;
    use crate::service::test_support::{demand, service, use_stock};

    #[test]
    fn test_reset_clears_both_ledgers() {
        let (svc, kv) = service();
        let d = demand(&svc, "2", 5);
        use_stock(&svc, &d.id, "2", 1);

        svc.reset_all().unwrap();

        assert!(svc.list_demands().unwrap().is_empty());
        assert!(svc.list_usage().unwrap().is_empty());
        assert!(kv.is_empty());
        assert_eq!(svc.remaining(&d.id).unwrap(), 0);
    }

    #[test]
    fn test_reset_on_empty_store_is_ok() {
        let (svc, _) = service();
        svc.reset_all().unwrap();
        assert_eq!(svc.stats().unwrap(), InventoryStats::default());
    }

    #[test]
    fn test_stats_counts() {
        let (svc, _) = service();
        let a = demand(&svc, "2", 5);
        let b = demand(&svc, "2", 5);
        demand(&svc, "3", 5);
        svc.create_demand(
            CreateDemand {
                department: "Cardiology".into(),
                item: "Stents".into(),
                subcategory: "Coronary".into(),
                quantity: 2,
                date: "2024-06-01".into(),
            },
            "3",
        )
        .unwrap();
        svc.set_demand_status(&a.id, DemandStatus::Approved).unwrap();
        svc.set_demand_status(&b.id, DemandStatus::Rejected).unwrap();
        use_stock(&svc, &a.id, "2", 3);
        use_stock(&svc, &a.id, "2", 1);

        let stats = svc.stats().unwrap();
        assert_eq!(stats.total_demands, 4);
        assert_eq!(stats.pending_demands, 2);
        assert_eq!(stats.approved_demands, 1);
        assert_eq!(stats.rejected_demands, 1);
        assert_eq!(stats.total_usage_records, 2);
        assert_eq!(stats.total_units_used, 4);
        assert_eq!(stats.by_department.get("Emergency"), Some(&3));
        assert_eq!(stats.by_department.get("Cardiology"), Some(&1));
    }
}
