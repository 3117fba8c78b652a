use chrono::Utc;
use std::collections::BTreeMap;

use crate::normalize::CanonicalField;
use crate::types::{ClassifiedTable, GroupTotals, MetricsRow, SummaryStats, Totals};
use crate::util::{coerce_number, format_count, format_currency, format_percent};

/// Sum the numeric fields per group. A numeric column missing from the table
/// contributes 0 for every row. Groups come back ordered by label.
pub fn aggregate_totals(table: &ClassifiedTable) -> Vec<GroupTotals> {
    let col = |field: CanonicalField| table.column_index(field.name());
    let impressions = col(CanonicalField::Impressions);
    let clicks = col(CanonicalField::LinkClicks);
    let spend = col(CanonicalField::AmountSpent);
    let conversions = col(CanonicalField::Results);
    let leads = col(CanonicalField::Leads);

    let mut map: BTreeMap<&str, GroupTotals> = BTreeMap::new();
    for row in &table.rows {
        let value = |idx: Option<usize>| {
            coerce_number(idx.and_then(|i| row.cells.get(i)).and_then(|c| c.as_deref()))
        };
        let row_totals = Totals {
            impressions: value(impressions),
            clicks: value(clicks),
            spend: value(spend),
            conversions: value(conversions),
            leads: value(leads),
        };
        let e = map.entry(row.group.as_str()).or_insert_with(|| GroupTotals {
            group: row.group.clone(),
            rows: 0,
            unmatched_rows: 0,
            totals: Totals::default(),
        });
        e.rows += 1;
        if !row.matched {
            e.unmatched_rows += 1;
        }
        e.totals.add(&row_totals);
    }
    map.into_values().collect()
}

pub fn render_row(group: &GroupTotals) -> MetricsRow {
    let t = &group.totals;
    MetricsRow {
        group: group.group.clone(),
        spend: format_currency(t.spend),
        impressions: format_count(t.impressions),
        clicks: format_count(t.clicks),
        ctr: format_percent(t.ctr()),
        cpc: format_currency(t.cpc()),
        cpm: format_currency(t.cpm()),
        conversions: format_count(t.conversions),
        cpa: format_currency(t.cpa()),
        leads: format_count(t.leads),
        cost_per_lead: format_currency(t.cost_per_lead()),
        conversion_rate: format_percent(t.conversion_rate()),
    }
}

/// Totals across every group, with derived metrics kept numeric.
pub fn generate_summary(groups: &[GroupTotals]) -> SummaryStats {
    let mut totals = Totals::default();
    let mut rows_processed = 0usize;
    let mut unmatched_rows = 0usize;
    for g in groups {
        totals.add(&g.totals);
        rows_processed += g.rows;
        unmatched_rows += g.unmatched_rows;
    }
    SummaryStats {
        generated_at: Utc::now(),
        rows_processed,
        total_groups: groups.len(),
        unmatched_rows,
        totals,
        ctr: totals.ctr(),
        cpc: totals.cpc(),
        cpm: totals.cpm(),
        cpa: totals.cpa(),
        cost_per_lead: totals.cost_per_lead(),
        conversion_rate: totals.conversion_rate(),
    }
}
