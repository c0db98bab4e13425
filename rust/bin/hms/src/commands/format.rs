//! Rendering helpers shared by the commands.

use chrono::DateTime;
use inventory::Demand;

/// Relative age of an epoch-millisecond instant, e.g. "3 hours ago".
pub fn time_ago(timestamp: i64, now: i64) -> String {
    let secs = (now - timestamp).max(0) / 1000;
    let (n, unit) = match secs {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// UTC wall-clock rendering of an epoch-millisecond instant.
pub fn timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Plain-text message for forwarding a demand to a supplier.
pub fn share_message(demand: &Demand, requested_by: &str) -> String {
    format!(
        "EMERGENCY DEMAND REQUEST\n\n\
         Department: {}\n\
         Item: {}\n\
         Subcategory: {}\n\
         Quantity: {}\n\
         Date: {}\n\
         Status: {}\n\n\
         Requested by: {}",
        demand.department,
        demand.item,
        demand.subcategory,
        demand.quantity,
        demand.date,
        demand.status,
        requested_by,
    )
}

/// Truncate to `width` characters for table columns.
pub fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use inventory::DemandStatus;

    use super::*;

    const MIN: i64 = 60_000;
    const HOUR: i64 = 60 * MIN;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn test_time_ago() {
        let now = 1_700_000_000_000;
        assert_eq!(time_ago(now - 5_000, now), "just now");
        assert_eq!(time_ago(now + 5_000, now), "just now");
        assert_eq!(time_ago(now - MIN, now), "1 minute ago");
        assert_eq!(time_ago(now - 45 * MIN, now), "45 minutes ago");
        assert_eq!(time_ago(now - 2 * HOUR, now), "2 hours ago");
        assert_eq!(time_ago(now - DAY, now), "1 day ago");
        assert_eq!(time_ago(now - 65 * DAY, now), "2 months ago");
        assert_eq!(time_ago(now - 800 * DAY, now), "2 years ago");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(timestamp(1_704_153_600_000), "2024-01-02 00:00:00");
    }

    #[test]
    fn test_share_message() {
        let demand = Demand {
            id: "d1".into(),
            department: "Emergency".into(),
            item: "Bandages".into(),
            subcategory: "Gauze".into(),
            quantity: 12,
            date: "2024-05-01".into(),
            timestamp: 0,
            status: DemandStatus::Approved,
            owner_id: "2".into(),
        };
        let msg = share_message(&demand, "Incharge User");
        assert!(msg.starts_with("EMERGENCY DEMAND REQUEST\n\nDepartment: Emergency\n"));
        assert!(msg.contains("Quantity: 12\nDate: 2024-05-01\nStatus: approved\n"));
        assert!(msg.ends_with("\n\nRequested by: Incharge User"));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("Gauze", 10), "Gauze");
        assert_eq!(clip("Drug-eluting Stents", 8), "Drug-el…");
    }
}
