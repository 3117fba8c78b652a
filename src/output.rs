use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::error::{MetricsError, Result};

pub const DOWNLOAD_FILENAME: &str = "campaign_metrics.csv";
pub const DOWNLOAD_MIME: &str = "text/csv";

// serde only emits the header alongside the first record, so an empty report
// writes it from the `Tabled` column names instead.
fn serialize_rows<W, T>(wtr: &mut csv::Writer<W>, rows: &[T]) -> Result<()>
where
    W: Write,
    T: Serialize + Tabled,
{
    if rows.is_empty() {
        wtr.write_record(T::headers().iter().map(|h| h.as_bytes()))?;
    }
    for r in rows {
        wtr.serialize(r)?;
    }
    Ok(())
}

pub fn write_csv<T: Serialize + Tabled>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    serialize_rows(&mut wtr, rows)?;
    wtr.flush()?;
    Ok(())
}

/// The report as UTF-8 CSV bytes, header row always included, ready to hand
/// to a download response.
pub fn metrics_csv_bytes<T: Serialize + Tabled>(rows: &[T]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    serialize_rows(&mut wtr, rows)?;
    wtr.into_inner()
        .map_err(|e| MetricsError::Io(e.into_error()))
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows not shown)\n", rows.len() - max_rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricsRow;

    fn row(group: &str) -> MetricsRow {
        MetricsRow {
            group: group.to_string(),
            spend: "$1,000.00".to_string(),
            impressions: "10,000".to_string(),
            clicks: "100".to_string(),
            ctr: "1.00%".to_string(),
            cpc: "$10.00".to_string(),
            cpm: "$100.00".to_string(),
            conversions: "4".to_string(),
            cpa: "$250.00".to_string(),
            leads: "0".to_string(),
            cost_per_lead: "$0.00".to_string(),
            conversion_rate: "4.00%".to_string(),
        }
    }

    #[test]
    fn csv_bytes_follow_report_column_order() {
        let bytes = metrics_csv_bytes(&[row("Demo")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Campaign,Spend ($),Impr.,Clicks,CTR (%),CPC ($),CPM ($),Conversions,CPA ($),Leads,cpLead ($),Conversion Rate (%)")
        );
        assert_eq!(
            lines.next(),
            Some("Demo,\"$1,000.00\",\"10,000\",100,1.00%,$10.00,$100.00,4,$250.00,0,$0.00,4.00%")
        );
    }

    #[test]
    fn empty_report_keeps_header_row() {
        let bytes = metrics_csv_bytes::<MetricsRow>(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Campaign,Spend ($),Impr.,Clicks,CTR (%),CPC ($),CPM ($),Conversions,CPA ($),Leads,cpLead ($),Conversion Rate (%)\n"
        );
    }

    #[test]
    fn render_table_limits_rows() {
        let rows = vec![row("A"), row("B"), row("C")];
        let out = render_table(&rows, 2);
        assert!(out.contains("| A "));
        assert!(out.contains("| B "));
        assert!(!out.contains("| C "));
        assert_eq!(render_table::<MetricsRow>(&[], 5), "(no rows)");
    }
}
