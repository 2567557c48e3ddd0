use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::DEFAULT_PASS_THRESHOLD;
use crate::data::schema::ColumnRule;

/// Optional settings file, read from the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Dashboard settings. Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Results file opened at start-up when it exists.
    pub data_file: PathBuf,
    /// Worksheet read from spreadsheet files.
    pub sheet_name: String,
    pub title: String,
    /// Optional institution name shown above the title.
    pub institution: Option<String>,
    /// Scores strictly below this count as failing.
    pub pass_threshold: f64,
    pub columns: ColumnRule,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("all.xlsx"),
            sheet_name: "all".to_string(),
            title: "Results Dashboard".to_string(),
            institution: None,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            columns: ColumnRule::default(),
        }
    }
}

impl DashboardConfig {
    /// Read settings from `path`; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}
