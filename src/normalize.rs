//! Column normalization onto the canonical schema.
//!
//! Ad platforms export the same logical field under different headers
//! ("Clicks" vs "Link clicks"). Every header is trimmed and compared
//! case-insensitively against the alias table; matches are renamed to the
//! canonical name and everything else passes through untouched.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

use crate::types::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    CampaignName,
    Impressions,
    LinkClicks,
    AmountSpent,
    Results,
    Leads,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::CampaignName,
        CanonicalField::Impressions,
        CanonicalField::LinkClicks,
        CanonicalField::AmountSpent,
        CanonicalField::Results,
        CanonicalField::Leads,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::CampaignName => "campaign_name",
            CanonicalField::Impressions => "impressions",
            CanonicalField::LinkClicks => "link_clicks",
            CanonicalField::AmountSpent => "amount_spent",
            CanonicalField::Results => "results",
            CanonicalField::Leads => "leads",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::CampaignName => &["Campaign Name", "Campaign"],
            CanonicalField::Impressions => &["Impressions"],
            CanonicalField::LinkClicks => &["Clicks", "Link clicks"],
            CanonicalField::AmountSpent => &["Total Spent", "Amount spent (USD)"],
            CanonicalField::Results => &["Conversions", "Results"],
            CanonicalField::Leads => &["Leads"],
        }
    }
}

// Lowercased alias (canonical names included) -> field.
static ALIAS_TABLE: Lazy<HashMap<String, CanonicalField>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for field in CanonicalField::ALL {
        map.insert(field.name().to_lowercase(), field);
        for alias in field.aliases() {
            map.insert(alias.to_lowercase(), field);
        }
    }
    map
});

fn header_key(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

/// Resolve a single header to its canonical field, if it is a known alias.
pub fn resolve_header(header: &str) -> Option<CanonicalField> {
    ALIAS_TABLE.get(&header_key(header)).copied()
}

/// Rename recognized headers to their canonical names.
///
/// When several source columns resolve to the same field, the rightmost one
/// takes the canonical name and the others keep their original header.
pub fn normalize_columns(table: RawTable) -> RawTable {
    let mut winner: HashMap<CanonicalField, usize> = HashMap::new();
    for (idx, header) in table.headers.iter().enumerate() {
        if let Some(field) = resolve_header(header) {
            if let Some(prev) = winner.insert(field, idx) {
                warn!(
                    field = field.name(),
                    dropped = %table.headers[prev],
                    kept = %header,
                    "multiple columns map to the same canonical field; last one wins"
                );
            }
        }
    }

    let RawTable { mut headers, rows } = table;
    for (field, idx) in winner {
        headers[idx] = field.name().to_string();
    }
    RawTable { headers, rows }
}
