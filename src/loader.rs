use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::types::RawTable;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

pub fn load_table(path: impl AsRef<Path>) -> Result<(RawTable, LoadReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    read_records(rdr)
}

/// Read a CSV export from any byte source, e.g. an uploaded file body.
pub fn read_table<R: Read>(reader: R) -> Result<(RawTable, LoadReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    read_records(rdr)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<(RawTable, LoadReport)> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(headers);
    let mut report = LoadReport::default();

    for (line, result) in rdr.records().enumerate() {
        report.total_rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(record = line + 1, error = %e, "skipping unreadable record");
                report.parse_errors += 1;
                continue;
            }
        };
        // Empty cells are treated as missing, like a blank spreadsheet cell.
        let row = record
            .iter()
            .map(|cell| {
                if cell.trim().is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        table.push_row(row);
    }

    report.loaded_rows = table.rows.len();
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_pads_short_rows() {
        let data = "Campaign Name,Impressions,Clicks\npromo,100,5\nshort\n";
        let (table, report) = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Campaign Name", "Impressions", "Clicks"]);
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(table.rows[1], vec![Some("short".to_string()), None, None]);
    }

    #[test]
    fn blank_cells_become_missing() {
        let data = "Campaign,Leads\n,  \n";
        let (table, _) = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0], vec![None, None]);
    }

    #[test]
    fn quoted_thousands_survive() {
        let data = "Campaign,Impressions\nx,\"1,250\"\n";
        let (table, _) = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0][1].as_deref(), Some("1,250"));
    }
}
