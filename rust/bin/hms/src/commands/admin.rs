//! Administrator commands.

use anyhow::Result;
use hms_core::Role;

use super::{confirm, print_json, Ctx};

/// Dashboard counters.
pub fn stats(ctx: &Ctx) -> Result<()> {
    ctx.principal.require(Role::Admin)?;
    let stats = ctx.service.stats()?;

    if ctx.json() {
        return print_json(&stats);
    }
    println!("Demands:       {}", stats.total_demands);
    println!("  pending:     {}", stats.pending_demands);
    println!("  approved:    {}", stats.approved_demands);
    println!("  rejected:    {}", stats.rejected_demands);
    println!("Usage records: {}", stats.total_usage_records);
    println!("Units used:    {}", stats.total_units_used);
    if !stats.by_department.is_empty() {
        println!();
        println!("{:24} {:>7}", "DEPARTMENT", "DEMANDS");
        for (dept, n) in &stats.by_department {
            println!("{:24} {:>7}", dept, n);
        }
    }
    Ok(())
}

/// Wipe every demand and usage record.
pub fn reset(ctx: &Ctx, yes: bool) -> Result<bool> {
    ctx.principal.require(Role::Admin)?;
    if !yes && !confirm("Delete ALL demands and usage records? This cannot be undone.")? {
        println!("Cancelled.");
        return Ok(false);
    }

    ctx.service.reset_all()?;
    println!("All inventory data cleared.");
    Ok(true)
}
