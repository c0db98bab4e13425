//! Read-only reports: stock positions and the catalog.

use std::collections::HashMap;

use anyhow::Result;
use inventory::{Catalog, Demand, DemandFilter, StockLevel};

use super::format::clip;
use super::{print_json, Ctx, Output};

/// Stock levels visible to the caller, paired with their demands.
pub fn stock_rows(ctx: &Ctx) -> Result<Vec<(Demand, StockLevel)>> {
    let demands = ctx.service.find_demands(&DemandFilter {
        owner_id: ctx.scope(),
        ..Default::default()
    })?;
    let mut levels: HashMap<String, StockLevel> = ctx
        .service
        .stock_levels()?
        .into_iter()
        .map(|l| (l.demand_id.clone(), l))
        .collect();

    Ok(demands
        .into_iter()
        .filter_map(|d| levels.remove(&d.id).map(|l| (d, l)))
        .collect())
}

pub fn stock(ctx: &Ctx, demand_id: Option<&str>) -> Result<()> {
    let rows = match demand_id {
        Some(id) => {
            let demand = ctx.visible_demand(id)?;
            let level = ctx.service.stock_level(id)?;
            vec![(demand, level)]
        }
        None => stock_rows(ctx)?,
    };

    if ctx.json() {
        let levels: Vec<&StockLevel> = rows.iter().map(|(_, l)| l).collect();
        return print_json(&levels);
    }
    if rows.is_empty() {
        println!("No demands found.");
        return Ok(());
    }

    println!(
        "{:32} {:28} {:9} {:>9} {:>6} {:>9}",
        "DEMAND", "ITEM", "STATUS", "REQUESTED", "USED", "REMAINING"
    );
    for (d, l) in &rows {
        println!(
            "{:32} {:28} {:9} {:>9} {:>6} {:>9}",
            d.id,
            clip(&d.item_label(), 28),
            d.status,
            l.requested,
            l.used,
            l.remaining
        );
    }
    Ok(())
}

/// Print the department → item → subcategory taxonomy.
pub fn catalog(catalog: &Catalog, output: Output) -> Result<()> {
    if output == Output::Json {
        return print_json(catalog);
    }
    for dept in catalog.departments() {
        println!("{dept}");
        for item in catalog.items(dept) {
            println!("  {:24} {}", item, catalog.subcategories(item).join(", "));
        }
    }
    Ok(())
}
