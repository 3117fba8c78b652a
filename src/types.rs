use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::util::safe_ratio;

/// An untyped table as it arrives from the caller: a header row plus records
/// of optional cell text. `None` marks a cell the source did not supply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a record, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Index of the column named exactly `name`. When a header repeats, the
    /// rightmost one is returned.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == name)
    }
}

/// A normalized record with the group label it was classified into.
/// `matched` is false when the label is the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub group: String,
    pub matched: bool,
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedTable {
    pub headers: Vec<String>,
    pub rows: Vec<ClassifiedRow>,
}

impl ClassifiedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == name)
    }
}

/// Summed raw performance numbers. Derived ratios follow the zero-denominator
/// policy: a zero denominator yields 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub conversions: f64,
    pub leads: f64,
}

impl Totals {
    pub fn add(&mut self, other: &Totals) {
        self.impressions += other.impressions;
        self.clicks += other.clicks;
        self.spend += other.spend;
        self.conversions += other.conversions;
        self.leads += other.leads;
    }

    pub fn ctr(&self) -> f64 {
        safe_ratio(self.clicks, self.impressions) * 100.0
    }

    pub fn cpc(&self) -> f64 {
        safe_ratio(self.spend, self.clicks)
    }

    pub fn cpm(&self) -> f64 {
        safe_ratio(self.spend, self.impressions / 1000.0)
    }

    pub fn cpa(&self) -> f64 {
        safe_ratio(self.spend, self.conversions)
    }

    pub fn cost_per_lead(&self) -> f64 {
        safe_ratio(self.spend, self.leads)
    }

    pub fn conversion_rate(&self) -> f64 {
        safe_ratio(self.conversions, self.clicks) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotals {
    pub group: String,
    pub rows: usize,
    pub unmatched_rows: usize,
    pub totals: Totals,
}

/// One rendered line of the report. Every value is a display string.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MetricsRow {
    #[serde(rename = "Campaign")]
    #[tabled(rename = "Campaign")]
    pub group: String,
    #[serde(rename = "Spend ($)")]
    #[tabled(rename = "Spend ($)")]
    pub spend: String,
    #[serde(rename = "Impr.")]
    #[tabled(rename = "Impr.")]
    pub impressions: String,
    #[serde(rename = "Clicks")]
    #[tabled(rename = "Clicks")]
    pub clicks: String,
    #[serde(rename = "CTR (%)")]
    #[tabled(rename = "CTR (%)")]
    pub ctr: String,
    #[serde(rename = "CPC ($)")]
    #[tabled(rename = "CPC ($)")]
    pub cpc: String,
    #[serde(rename = "CPM ($)")]
    #[tabled(rename = "CPM ($)")]
    pub cpm: String,
    #[serde(rename = "Conversions")]
    #[tabled(rename = "Conversions")]
    pub conversions: String,
    #[serde(rename = "CPA ($)")]
    #[tabled(rename = "CPA ($)")]
    pub cpa: String,
    #[serde(rename = "Leads")]
    #[tabled(rename = "Leads")]
    pub leads: String,
    #[serde(rename = "cpLead ($)")]
    #[tabled(rename = "cpLead ($)")]
    pub cost_per_lead: String,
    #[serde(rename = "Conversion Rate (%)")]
    #[tabled(rename = "Conversion Rate (%)")]
    pub conversion_rate: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: DateTime<Utc>,
    pub rows_processed: usize,
    pub total_groups: usize,
    pub unmatched_rows: usize,
    pub totals: Totals,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub cpa: f64,
    pub cost_per_lead: f64,
    pub conversion_rate: f64,
}
