//! Campaign performance metrics from ad-platform CSV exports.
//!
//! The pipeline is one-way and stateless per call:
//! raw table -> [`normalize`] -> [`classify`] -> [`aggregate`] -> report rows.
pub mod aggregate;
pub mod classify;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod types;
pub mod util;

use tracing::info;

pub use classify::{KeywordRules, DEFAULT_KEYWORDS, FALLBACK_GROUP};
pub use error::{MetricsError, Result};
pub use types::{GroupTotals, MetricsRow, RawTable, SummaryStats};

/// Grouped totals alongside their rendered rows, in the same order.
#[derive(Debug, Clone)]
pub struct CampaignReport {
    pub groups: Vec<GroupTotals>,
    pub rows: Vec<MetricsRow>,
}

impl CampaignReport {
    pub fn summary(&self) -> SummaryStats {
        aggregate::generate_summary(&self.groups)
    }
}

/// Normalize, classify and aggregate one table, keeping the numeric group
/// totals next to the formatted rows.
pub fn compute_campaign_report(raw_table: RawTable, keyword_config: &str) -> Result<CampaignReport> {
    let rules = KeywordRules::parse(keyword_config);
    let normalized = normalize::normalize_columns(raw_table);
    let classified = classify::classify_table(normalized, &rules)?;
    let groups = aggregate::aggregate_totals(&classified);
    info!(
        rows = classified.rows.len(),
        groups = groups.len(),
        "aggregated campaign metrics"
    );
    let rows = groups.iter().map(aggregate::render_row).collect();
    Ok(CampaignReport { groups, rows })
}

/// Formatted report rows for one table.
///
/// A blank `keyword_config` means [`DEFAULT_KEYWORDS`]. The only failure is a
/// table with no campaign-name column under any known alias.
pub fn compute_campaign_metrics(raw_table: RawTable, keyword_config: &str) -> Result<Vec<MetricsRow>> {
    compute_campaign_report(raw_table, keyword_config).map(|report| report.rows)
}
