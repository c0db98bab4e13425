use std::collections::HashMap;

use crate::model::{Demand, DemandStatus, UsageRecord};
use crate::service::{InventoryError, InventoryService};

/// Filters for the demand table. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DemandFilter {
    pub status: Option<DemandStatus>,
    pub department: Option<String>,
    pub owner_id: Option<String>,
    /// Case-insensitive substring of department, item or subcategory.
    pub search: Option<String>,
}

impl DemandFilter {
    pub fn matches(&self, d: &Demand) -> bool {
        if self.status.is_some_and(|s| s != d.status) {
            return false;
        }
        if self.department.as_deref().is_some_and(|dep| dep != d.department) {
            return false;
        }
        if self.owner_id.as_deref().is_some_and(|o| o != d.owner_id) {
            return false;
        }
        match search_term(&self.search) {
            Some(term) => [&d.department, &d.item, &d.subcategory]
                .iter()
                .any(|field| field.to_lowercase().contains(&term)),
            None => true,
        }
    }
}

/// Filters for the usage table. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct UsageFilter {
    /// Department of the referenced demand.
    pub department: Option<String>,
    pub owner_id: Option<String>,
    pub demand_id: Option<String>,
    /// Case-insensitive substring of patient id or item used.
    pub search: Option<String>,
}

fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl InventoryService {
    pub fn find_demands(&self, filter: &DemandFilter) -> Result<Vec<Demand>, InventoryError> {
        let mut demands: Vec<Demand> = self.load()?;
        demands.retain(|d| filter.matches(d));
        Ok(demands)
    }

    /// Usage records matching `filter`. A department filter drops records
    /// whose demand no longer exists.
    pub fn find_usage(&self, filter: &UsageFilter) -> Result<Vec<UsageRecord>, InventoryError> {
        let mut records: Vec<UsageRecord> = self.load()?;

        let departments: HashMap<String, String> = if filter.department.is_some() {
            self.load::<Demand>()?
                .into_iter()
                .map(|d| (d.id, d.department))
                .collect()
        } else {
            HashMap::new()
        };
        let term = search_term(&filter.search);

        records.retain(|r| {
            if filter.owner_id.as_deref().is_some_and(|o| o != r.owner_id) {
                return false;
            }
            if filter.demand_id.as_deref().is_some_and(|id| id != r.demand_id) {
                return false;
            }
            if let Some(dep) = filter.department.as_deref() {
                if departments.get(&r.demand_id).map(String::as_str) != Some(dep) {
                    return false;
                }
            }
            match &term {
                Some(t) => {
                    r.patient_id.to_lowercase().contains(t) || r.item_used.to_lowercase().contains(t)
                }
                None => true,
            }
        });
        Ok(records)
    }
}
