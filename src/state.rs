use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{summarize, DashboardSummary};
use crate::data::filter::{filter, FilterSpec, FilteredView};
use crate::data::loader::load_file;
use crate::data::model::{CategoryField, CellValue, ResultsDataset};
use crate::data::schema::{select_columns, ColumnRule};

// ---------------------------------------------------------------------------
// Session: one loaded dataset and its filter
// ---------------------------------------------------------------------------

/// A loaded dataset, the user's filter, and everything derived from them.
pub struct Session {
    pub dataset: ResultsDataset,
    pub filter: FilterSpec,
    /// Total columns offered in the column picker, in sheet order.
    pub total_columns: Vec<String>,
    /// Rows passing the current filter.
    pub visible_indices: Vec<usize>,
    pub summary: DashboardSummary,
    pass_threshold: f64,
}

impl Session {
    /// Start a session with every value and every total column selected.
    pub fn new(dataset: ResultsDataset, rule: &ColumnRule, pass_threshold: f64) -> Self {
        let filter = FilterSpec::all(&dataset, rule);
        let total_columns = select_columns(&dataset, rule, true);
        let mut session = Self {
            dataset,
            filter,
            total_columns,
            visible_indices: Vec::new(),
            summary: DashboardSummary::default(),
            pass_threshold,
        };
        session.recompute();
        session
    }

    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.dataset, &self.visible_indices)
    }

    /// Full recomputation after any filter change.
    pub fn recompute(&mut self) {
        let view = filter(&self.dataset, &self.filter);
        self.summary = summarize(&view, &self.filter.selected_columns, self.pass_threshold);
        self.visible_indices = view.indices().to_vec();
        log::debug!(
            "recomputed dashboard: {} of {} rows, {} columns",
            self.visible_indices.len(),
            self.dataset.len(),
            self.filter.selected_columns.len()
        );
    }

    pub fn toggle_filter_value(&mut self, field: CategoryField, value: &CellValue) {
        self.filter.toggle_value(&self.dataset, field, value);
        self.recompute();
    }

    pub fn select_all(&mut self, field: CategoryField) {
        self.filter.select_all(&self.dataset, field);
        self.recompute();
    }

    pub fn select_none(&mut self, field: CategoryField) {
        self.filter.select_none(field);
        self.recompute();
    }

    pub fn toggle_column(&mut self, column: &str) {
        self.filter.toggle_column(column);
        self.recompute();
    }

    pub fn select_all_columns(&mut self) {
        self.filter.selected_columns = self.total_columns.clone();
        self.recompute();
    }

    pub fn select_no_columns(&mut self) {
        self.filter.selected_columns.clear();
        self.recompute();
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset and filters (None until a file loads).
    pub session: Option<Session>,

    /// Colours per status value, shared by the table and the pie chart.
    pub status_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            session: None,
            status_colors: None,
            status_message: None,
        }
    }

    /// Open the configured data file if it is present.
    pub fn open_default_dataset(&mut self) {
        let path = self.config.data_file.clone();
        if path.exists() {
            self.load_path(&path);
        } else {
            log::info!("{} not found, waiting for a file", path.display());
        }
    }

    /// Load a file, replacing the session on success and keeping it on failure.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path, &self.config.sheet_name) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} students with score columns {:?}",
                    dataset.len(),
                    dataset.score_columns
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and start a fresh session.
    pub fn set_dataset(&mut self, dataset: ResultsDataset) {
        self.status_colors = dataset
            .unique_values
            .get(&CategoryField::Status)
            .map(ColorMap::new);
        self.session = Some(Session::new(
            dataset,
            &self.config.columns,
            self.config.pass_threshold,
        ));
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{sample_dataset, text};

    fn session() -> Session {
        Session::new(sample_dataset(), &ColumnRule::default(), 50.0)
    }

    #[test]
    fn new_session_shows_everything() {
        let s = session();
        assert_eq!(s.visible_indices.len(), 5);
        assert_eq!(s.total_columns, vec!["Math Total", "Physics Total"]);
        assert_eq!(s.summary.metrics.average_cgpa, Some(8.0));
        assert_eq!(s.summary.metrics.unsuccessful_count, 2);
    }

    #[test]
    fn filter_change_recomputes_summary() {
        let mut s = session();
        s.toggle_filter_value(CategoryField::Status, &text("Successful"));
        assert_eq!(s.visible_indices, vec![1, 2]);
        assert_eq!(s.summary.metrics.average_cgpa, Some(8.0));
        assert_eq!(
            s.summary.unsuccessful_counts,
            vec![("Math Total".to_string(), 2), ("Physics Total".to_string(), 0)]
        );
        assert_eq!(s.view().len(), 2);
    }

    #[test]
    fn clearing_a_field_gives_no_data() {
        let mut s = session();
        s.select_none(CategoryField::Class);
        assert!(s.visible_indices.is_empty());
        assert_eq!(s.summary.metrics.average_cgpa, None);
        assert_eq!(s.summary.metrics.most_scoring_subject, None);
        s.select_all(CategoryField::Class);
        assert_eq!(s.visible_indices.len(), 5);
    }

    #[test]
    fn column_selection_drives_charts() {
        let mut s = session();
        s.select_no_columns();
        assert!(s.summary.distributions.is_empty());
        s.toggle_column("Physics Total");
        assert_eq!(
            s.summary.metrics.most_scoring_subject.as_deref(),
            Some("Physics Total")
        );
        s.select_all_columns();
        assert_eq!(s.filter.selected_columns.len(), 2);
    }

    #[test]
    fn failed_load_keeps_previous_session() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(sample_dataset());
        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("missing.csv"));
        assert!(state.session.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("dataset unavailable")));
    }

    #[test]
    fn status_colors_follow_dataset() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(sample_dataset());
        let colors = state.status_colors.as_ref().unwrap();
        assert_ne!(
            colors.color_for(&text("Successful")),
            colors.color_for(&text("Unsuccessful"))
        );
    }
}
