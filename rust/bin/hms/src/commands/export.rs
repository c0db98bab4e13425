//! CSV export of the ledgers.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use inventory::{Demand, DemandFilter, UsageFilter, UsageRecord};

use super::format::timestamp;
use super::Ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Demands,
    Usage,
}

impl ExportKind {
    /// Suggested file name for a given day, e.g. `demands_2024-05-01.csv`.
    pub fn file_name(&self, day: chrono::NaiveDate) -> String {
        let stem = match self {
            Self::Demands => "demands",
            Self::Usage => "usage",
        };
        format!("{}_{}.csv", stem, day.format("%Y-%m-%d"))
    }
}

/// Export the caller's view of a ledger to `out`, or stdout. A directory
/// `out` gets a dated file name inside it.
pub fn run(ctx: &Ctx, kind: ExportKind, out: Option<&Path>) -> Result<usize> {
    let mut buf = Vec::new();
    let rows = match kind {
        ExportKind::Demands => {
            let demands = ctx.service.find_demands(&DemandFilter {
                owner_id: ctx.scope(),
                ..Default::default()
            })?;
            write_demands(&mut buf, &demands)?;
            demands.len()
        }
        ExportKind::Usage => {
            let records = ctx.service.find_usage(&UsageFilter {
                owner_id: ctx.scope(),
                ..Default::default()
            })?;
            write_usage(&mut buf, &records)?;
            records.len()
        }
    };

    match out {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(kind.file_name(chrono::Local::now().date_naive()))
            } else {
                path.to_path_buf()
            };
            std::fs::write(&path, &buf)?;
            eprintln!("Exported {} row(s) to {}.", rows, path.display());
        }
        None => std::io::stdout().write_all(&buf)?,
    }
    Ok(rows)
}

pub fn write_demands<W: Write>(w: W, demands: &[Demand]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record([
        "ID",
        "Department",
        "Item",
        "Subcategory",
        "Quantity",
        "Date",
        "Status",
        "Timestamp",
    ])?;
    for d in demands {
        wtr.write_record([
            d.id.as_str(),
            d.department.as_str(),
            d.item.as_str(),
            d.subcategory.as_str(),
            d.quantity.to_string().as_str(),
            d.date.as_str(),
            d.status.as_str(),
            timestamp(d.timestamp).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_usage<W: Write>(w: W, records: &[UsageRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record([
        "ID",
        "Demand ID",
        "Patient ID",
        "Item Used",
        "Quantity",
        "Timestamp",
    ])?;
    for r in records {
        wtr.write_record([
            r.id.as_str(),
            r.demand_id.as_str(),
            r.patient_id.as_str(),
            r.item_used.as_str(),
            r.quantity.to_string().as_str(),
            timestamp(r.timestamp).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
