//! Keyword-based campaign classification.
use tracing::debug;

use crate::error::{MetricsError, Result};
use crate::normalize::CanonicalField;
use crate::types::{ClassifiedRow, ClassifiedTable, RawTable};

pub const DEFAULT_KEYWORDS: &str = "ungatedcontent, gatedcontent, interactivedemo, talktosales";
pub const FALLBACK_GROUP: &str = "Other";

/// Ordered keyword -> display label rules. Iteration follows the position of
/// each keyword's first occurrence; a repeated keyword overwrites the label
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordRules {
    rules: Vec<(String, String)>,
}

impl KeywordRules {
    /// Build rules from a comma-separated keyword list. Blank input falls back
    /// to [`DEFAULT_KEYWORDS`].
    pub fn parse(config: &str) -> Self {
        let config = if config.trim().is_empty() {
            DEFAULT_KEYWORDS
        } else {
            config
        };
        let mut rules = KeywordRules::default();
        for token in config.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            rules.insert(token, capitalize(token));
        }
        rules
    }

    pub fn from_pairs<K, L>(pairs: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: AsRef<str>,
        L: Into<String>,
    {
        let mut rules = KeywordRules::default();
        for (keyword, label) in pairs {
            rules.insert(keyword.as_ref(), label);
        }
        rules
    }

    /// Insert or relabel a keyword. Blank keywords are ignored.
    pub fn insert(&mut self, keyword: &str, label: impl Into<String>) {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return;
        }
        let label = label.into();
        match self.rules.iter_mut().find(|(k, _)| *k == keyword) {
            Some(entry) => entry.1 = label,
            None => self.rules.push((keyword, label)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// First letter upper, remainder lower: "TalkToSales" -> "Talktosales".
fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label of the first rule whose keyword is a substring of the lowercased
/// name. Blank names count as missing.
pub fn match_keyword<'a>(campaign_name: Option<&str>, rules: &'a KeywordRules) -> Option<&'a str> {
    let name = campaign_name.filter(|n| !n.trim().is_empty())?.to_lowercase();
    rules
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, label)| label)
}

/// Like [`match_keyword`], falling back to [`FALLBACK_GROUP`].
pub fn classify<'a>(campaign_name: Option<&str>, rules: &'a KeywordRules) -> &'a str {
    match_keyword(campaign_name, rules).unwrap_or(FALLBACK_GROUP)
}

/// Attach a group label to every row of a normalized table.
///
/// Fails when the table has no `campaign_name` column at all.
pub fn classify_table(table: RawTable, rules: &KeywordRules) -> Result<ClassifiedTable> {
    let field = CanonicalField::CampaignName;
    let idx = table
        .column_index(field.name())
        .ok_or_else(|| MetricsError::MissingRequiredColumn {
            field: field.name(),
            aliases: field.aliases().join(", "),
        })?;

    let RawTable { headers, rows } = table;
    let rows: Vec<ClassifiedRow> = rows
        .into_iter()
        .map(|cells| {
            let label = match_keyword(cells.get(idx).and_then(|c| c.as_deref()), rules);
            ClassifiedRow {
                group: label.unwrap_or(FALLBACK_GROUP).to_string(),
                matched: label.is_some(),
                cells,
            }
        })
        .collect();
    debug!(rows = rows.len(), rules = rules.len(), "classified campaign rows");
    Ok(ClassifiedTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_lowercases_and_drops_empty_tokens() {
        let rules = KeywordRules::parse(" Webinar , ,TalkToSales,, ");
        let got: Vec<_> = rules.iter().collect();
        assert_eq!(got, vec![("webinar", "Webinar"), ("talktosales", "Talktosales")]);
    }

    #[test]
    fn parse_blank_uses_default_keywords() {
        let rules = KeywordRules::parse("   ");
        let keywords: Vec<_> = rules.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keywords,
            vec!["ungatedcontent", "gatedcontent", "interactivedemo", "talktosales"]
        );
    }

    #[test]
    fn duplicates_keep_first_position() {
        let rules = KeywordRules::from_pairs([("demo", "A"), ("promo", "B"), ("DEMO", "C")]);
        let got: Vec<_> = rules.iter().collect();
        assert_eq!(got, vec![("demo", "C"), ("promo", "B")]);
    }

    #[test]
    fn first_listed_keyword_wins() {
        let rules = KeywordRules::from_pairs([("demo", "Demo"), ("interactivedemo", "Interactive")]);
        assert_eq!(classify(Some("Q1-InteractiveDemo-Launch"), &rules), "Demo");
    }

    #[test]
    fn missing_or_unmatched_names_fall_back() {
        let rules = KeywordRules::parse("");
        assert_eq!(classify(None, &rules), FALLBACK_GROUP);
        assert_eq!(classify(Some(""), &rules), FALLBACK_GROUP);
        assert_eq!(classify(Some("brand-awareness"), &rules), FALLBACK_GROUP);
        assert_eq!(classify(Some("x"), &KeywordRules::default()), FALLBACK_GROUP);
    }

    #[test]
    fn default_rules_match_substrings_case_insensitively() {
        let rules = KeywordRules::parse("");
        assert_eq!(classify(Some("2024_UngatedContent_EMEA"), &rules), "Ungatedcontent");
        assert_eq!(classify(Some("retarget-talktosales"), &rules), "Talktosales");
    }

    #[test]
    fn classify_table_requires_campaign_column() {
        let mut table = RawTable::new(vec!["impressions".to_string()]);
        table.push_row(vec![Some("10".to_string())]);
        let err = classify_table(table, &KeywordRules::parse("")).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::MissingRequiredColumn { field: "campaign_name", .. }
        ));
    }

    #[test]
    fn classify_table_labels_every_row() {
        let mut table = RawTable::new(vec!["campaign_name".to_string()]);
        table.push_row(vec![Some("gatedcontent-q2".to_string())]);
        table.push_row(vec![None]);
        let classified = classify_table(table, &KeywordRules::parse("")).unwrap();
        let groups: Vec<_> = classified.rows.iter().map(|r| (r.group.as_str(), r.matched)).collect();
        assert_eq!(groups, vec![("Gatedcontent", true), ("Other", false)]);
    }

    #[test]
    fn keyword_labelled_other_still_counts_as_match() {
        let rules = KeywordRules::parse("other");
        assert_eq!(match_keyword(Some("other-brand"), &rules), Some("Other"));
        assert_eq!(match_keyword(Some("brand"), &rules), None);
        assert_eq!(classify(Some("brand"), &rules), FALLBACK_GROUP);
    }
}
