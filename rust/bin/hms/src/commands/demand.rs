//! Demand commands: create, list, review, show, share.

use std::collections::HashMap;

use anyhow::Result;
use hms_core::Role;
use inventory::{CreateDemand, Demand, DemandFilter, DemandStatus};

use super::format::{clip, share_message, time_ago};
use super::{confirm, print_json, Ctx};

/// Raise a demand as the logged-in incharge.
pub fn create(ctx: &Ctx, input: CreateDemand) -> Result<Demand> {
    ctx.principal.require(Role::Incharge)?;
    let demand = ctx.service.create_demand(input, &ctx.principal.id)?;

    if ctx.json() {
        print_json(&demand)?;
    } else {
        println!("Demand {} created.", demand.id);
        println!(
            "  {} × {} for {}, needed {}",
            demand.quantity,
            demand.item_label(),
            demand.department,
            demand.date
        );
        println!("  Status: {}", demand.status);
    }
    Ok(demand)
}

pub fn list(ctx: &Ctx, mut filter: DemandFilter) -> Result<()> {
    filter.owner_id = ctx.scope();
    let demands = ctx.service.find_demands(&filter)?;

    if ctx.json() {
        return print_json(&demands);
    }
    if demands.is_empty() {
        println!("No demands found.");
        return Ok(());
    }

    let remaining: HashMap<String, u64> = ctx
        .service
        .stock_levels()?
        .into_iter()
        .map(|l| (l.demand_id, l.remaining))
        .collect();
    let now = hms_core::now_millis();

    println!(
        "{:32} {:12} {:28} {:>5} {:>5} {:10} {:9} {}",
        "ID", "DEPARTMENT", "ITEM", "QTY", "LEFT", "NEEDED", "STATUS", "CREATED"
    );
    for d in &demands {
        println!(
            "{:32} {:12} {:28} {:>5} {:>5} {:10} {:9} {}",
            d.id,
            clip(&d.department, 12),
            clip(&d.item_label(), 28),
            d.quantity,
            remaining.get(&d.id).copied().unwrap_or(0),
            d.date,
            d.status,
            time_ago(d.timestamp, now),
        );
    }
    Ok(())
}

/// Approve or reject a pending demand. Admin only.
pub fn review(ctx: &Ctx, id: &str, status: DemandStatus) -> Result<Demand> {
    ctx.principal.require(Role::Admin)?;
    let demand = ctx.service.set_demand_status(id, status)?;

    if ctx.json() {
        print_json(&demand)?;
    } else {
        println!("Demand {} {}.", demand.id, demand.status);
    }
    Ok(demand)
}

/// One demand with its stock position and usage history.
pub fn show(ctx: &Ctx, id: &str) -> Result<()> {
    let demand = ctx.visible_demand(id)?;
    let level = ctx.service.stock_level(id)?;
    let usage = ctx.service.list_usage_by_demand(id)?;

    if ctx.json() {
        return print_json(&serde_json::json!({
            "demand": demand,
            "stock": level,
            "usage": usage,
        }));
    }

    let now = hms_core::now_millis();
    println!("ID:          {}", demand.id);
    println!("Department:  {}", demand.department);
    println!("Item:        {}", demand.item);
    println!("Subcategory: {}", demand.subcategory);
    println!("Needed:      {}", demand.date);
    println!("Status:      {}", demand.status);
    println!("Owner:       {}", demand.owner_id);
    println!("Created:     {}", time_ago(demand.timestamp, now));
    println!(
        "Stock:       {} requested, {} used, {} remaining",
        level.requested, level.used, level.remaining
    );
    if !usage.is_empty() {
        println!();
        println!("{:12} {:>5} {}", "PATIENT", "QTY", "WHEN");
        for r in &usage {
            println!(
                "{:12} {:>5} {}",
                clip(&r.patient_id, 12),
                r.quantity,
                time_ago(r.timestamp, now)
            );
        }
    }
    Ok(())
}

/// Print the forwarding message for a demand.
pub fn share(ctx: &Ctx, id: &str) -> Result<String> {
    let demand = ctx.visible_demand(id)?;
    let requested_by = if demand.owner_id == ctx.principal.id {
        ctx.principal.name.as_str()
    } else {
        "Incharge"
    };
    let message = share_message(&demand, requested_by);

    if ctx.json() {
        print_json(&serde_json::json!({ "demandId": demand.id, "message": message }))?;
    } else {
        println!("{message}");
    }
    Ok(message)
}

/// Reviewing is irreversible, so ask unless `yes`.
pub fn confirm_review(id: &str, status: DemandStatus, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let verb = match status {
        DemandStatus::Rejected => "Reject",
        _ => "Approve",
    };
    confirm(&format!("{verb} demand {id}? This cannot be undone."))
}
