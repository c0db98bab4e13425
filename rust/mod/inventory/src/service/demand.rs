use hms_core::{new_id, now_millis, parse_date};
use tracing::info;

use crate::model::{CreateDemand, Demand, DemandStatus};
use crate::service::{positive_quantity, required, InventoryError, InventoryService};

impl InventoryService {
    /// Raise a new demand for `owner_id`. Starts `pending`.
    pub fn create_demand(
        &self,
        input: CreateDemand,
        owner_id: &str,
    ) -> Result<Demand, InventoryError> {
        let department = required("department", &input.department)?;
        let item = required("item", &input.item)?;
        let subcategory = required("subcategory", &input.subcategory)?;
        let date = required("date", &input.date)?;
        let owner_id = required("owner id", owner_id)?;
        let quantity = positive_quantity(input.quantity)?;

        let date = parse_date(&date)
            .ok_or_else(|| InventoryError::Validation(format!("date '{date}' is not YYYY-MM-DD")))?;
        self.catalog.validate(&department, &item, &subcategory)?;

        let demand = Demand {
            id: new_id(),
            department,
            item,
            subcategory,
            quantity,
            date: date.format("%Y-%m-%d").to_string(),
            timestamp: now_millis(),
            status: DemandStatus::Pending,
            owner_id,
        };

        let _guard = self.lock()?;
        let mut demands: Vec<Demand> = self.load()?;
        demands.push(demand.clone());
        self.save(&demands)?;

        info!(
            demand_id = %demand.id,
            owner = %demand.owner_id,
            item = %demand.item_label(),
            quantity = demand.quantity,
            "demand created"
        );
        Ok(demand)
    }

    /// Every demand in creation order.
    pub fn list_demands(&self) -> Result<Vec<Demand>, InventoryError> {
        self.load()
    }

    /// Demands raised by one incharge, in creation order.
    pub fn list_demands_by_owner(&self, owner_id: &str) -> Result<Vec<Demand>, InventoryError> {
        let mut demands: Vec<Demand> = self.load()?;
        demands.retain(|d| d.owner_id == owner_id);
        Ok(demands)
    }

    pub fn get_demand(&self, id: &str) -> Result<Demand, InventoryError> {
        self.load::<Demand>()?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| InventoryError::NotFound(format!("demand '{id}'")))
    }

    /// Review a pending demand. Only `approved` and `rejected` are valid
    /// targets, and only from `pending`. Nothing but `status` changes.
    pub fn set_demand_status(
        &self,
        id: &str,
        status: DemandStatus,
    ) -> Result<Demand, InventoryError> {
        if status == DemandStatus::Pending {
            return Err(InventoryError::Validation(
                "a demand can only be approved or rejected".into(),
            ));
        }

        let _guard = self.lock()?;
        let mut demands: Vec<Demand> = self.load()?;
        let demand = demands
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| InventoryError::NotFound(format!("demand '{id}'")))?;

        if demand.status.is_terminal() {
            return Err(InventoryError::InvalidTransition {
                id: id.to_string(),
                from: demand.status,
                to: status,
            });
        }
        demand.status = status;
        let updated = demand.clone();
        self.save(&demands)?;

        info!(demand_id = %id, status = %status, "demand reviewed");
        Ok(updated)
    }

    /// The owner's demands that usage may still be recorded against, i.e.
    /// everything not rejected.
    pub fn usable_demands(&self, owner_id: &str) -> Result<Vec<Demand>, InventoryError> {
        let mut demands = self.list_demands_by_owner(owner_id)?;
        demands.retain(|d| d.status != DemandStatus::Rejected);
        Ok(demands)
    }
}
