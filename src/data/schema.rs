use serde::{Deserialize, Serialize};

use super::model::ResultsDataset;

// ---------------------------------------------------------------------------
// Score-column classification
// ---------------------------------------------------------------------------

/// What a score column represents for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A subject's total mark; analysed and charted.
    Total,
    /// Carries the marker but is an aggregate such as a credit count.
    Excluded,
    /// Any other score column (component marks, grades, ...).
    Other,
}

/// Rule deciding which score columns are subject totals.
///
/// A column is a total when its name contains `marker` and its full name is
/// not one of `excluded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRule {
    pub marker: String,
    pub excluded: Vec<String>,
}

impl Default for ColumnRule {
    fn default() -> Self {
        Self {
            marker: "Total".to_string(),
            excluded: vec!["Total Credits".to_string()],
        }
    }
}

impl ColumnRule {
    pub fn classify(&self, column: &str) -> ColumnKind {
        if !column.contains(self.marker.as_str()) {
            ColumnKind::Other
        } else if self.excluded.iter().any(|e| e == column) {
            ColumnKind::Excluded
        } else {
            ColumnKind::Total
        }
    }

    pub fn is_total(&self, column: &str) -> bool {
        self.classify(column) == ColumnKind::Total
    }
}

/// Score columns offered for analysis, in sheet order.
///
/// With `total_columns_only` only columns the rule classifies as
/// [`ColumnKind::Total`] are returned; otherwise every score column.
pub fn select_columns(
    dataset: &ResultsDataset,
    rule: &ColumnRule,
    total_columns_only: bool,
) -> Vec<String> {
    dataset
        .score_columns
        .iter()
        .filter(|c| !total_columns_only || rule.is_total(c))
        .cloned()
        .collect()
}
