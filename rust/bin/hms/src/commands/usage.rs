//! Usage commands: record, list, clear.

use anyhow::Result;
use hms_core::Role;
use inventory::{Demand, RecordUsage, UsageFilter, UsageRecord};

use super::format::{clip, time_ago};
use super::{confirm, print_json, Ctx};

/// Record consumption against one of the caller's own demands.
pub fn record(ctx: &Ctx, input: RecordUsage) -> Result<UsageRecord> {
    ctx.principal.require(Role::Incharge)?;
    ctx.visible_demand(input.demand_id.trim())?;

    let record = ctx.service.record_usage(input, &ctx.principal.id)?;
    let remaining = ctx.service.remaining(&record.demand_id)?;

    if ctx.json() {
        print_json(&record)?;
    } else {
        println!(
            "Recorded {} × {} for patient {}.",
            record.quantity, record.item_used, record.patient_id
        );
        println!("  Remaining on demand {}: {}", record.demand_id, remaining);
    }
    Ok(record)
}

/// The caller's non-rejected demands with what is left on each.
pub fn targets(ctx: &Ctx) -> Result<Vec<(Demand, u64)>> {
    ctx.principal.require(Role::Incharge)?;
    let mut rows = Vec::new();
    for demand in ctx.service.usable_demands(&ctx.principal.id)? {
        let remaining = ctx.service.remaining(&demand.id)?;
        rows.push((demand, remaining));
    }

    if ctx.json() {
        let levels: Vec<_> = rows
            .iter()
            .map(|(d, remaining)| serde_json::json!({ "demand": d, "remaining": remaining }))
            .collect();
        print_json(&levels)?;
    } else if rows.is_empty() {
        println!("No demands to record usage against.");
    } else {
        println!("{:32} {:28} {:9} {:>9}", "DEMAND", "ITEM", "STATUS", "REMAINING");
        for (d, remaining) in &rows {
            println!(
                "{:32} {:28} {:9} {:>9}",
                d.id,
                clip(&d.item_label(), 28),
                d.status,
                remaining
            );
        }
    }
    Ok(rows)
}

pub fn list(ctx: &Ctx, mut filter: UsageFilter) -> Result<()> {
    filter.owner_id = ctx.scope();
    let records = ctx.service.find_usage(&filter)?;

    if ctx.json() {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No usage records found.");
        return Ok(());
    }

    let now = hms_core::now_millis();
    println!(
        "{:32} {:32} {:12} {:28} {:>5} {}",
        "ID", "DEMAND", "PATIENT", "ITEM", "QTY", "RECORDED"
    );
    for r in &records {
        println!(
            "{:32} {:32} {:12} {:28} {:>5} {}",
            r.id,
            r.demand_id,
            clip(&r.patient_id, 12),
            clip(&r.item_used, 28),
            r.quantity,
            time_ago(r.timestamp, now),
        );
    }
    Ok(())
}

/// Delete all of the caller's usage records.
pub fn clear(ctx: &Ctx, yes: bool) -> Result<usize> {
    ctx.principal.require(Role::Incharge)?;
    if !yes && !confirm("Delete all of your usage records? This cannot be undone.")? {
        println!("Cancelled.");
        return Ok(0);
    }

    let removed = ctx.service.clear_usage_by_owner(&ctx.principal.id)?;
    println!("Deleted {removed} usage record(s).");
    Ok(removed)
}
