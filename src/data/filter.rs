use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryField, CellValue, ResultsDataset, StudentRecord};
use super::schema::{select_columns, ColumnRule};

// ---------------------------------------------------------------------------
// Filter specification: allowed values per category + analysed columns
// ---------------------------------------------------------------------------

/// Per-field membership filter plus the score columns to analyse.
///
/// A field absent from `allowed` is unconstrained. A field mapped to an empty
/// set admits no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub allowed: BTreeMap<CategoryField, BTreeSet<CellValue>>,
    /// Selected columns in selection order.
    pub selected_columns: Vec<String>,
}

impl FilterSpec {
    /// Every distinct value and every total column selected, i.e. show everything.
    pub fn all(dataset: &ResultsDataset, rule: &ColumnRule) -> Self {
        Self {
            allowed: dataset.unique_values.clone(),
            selected_columns: select_columns(dataset, rule, true),
        }
    }

    /// Whether a record passes all three membership predicates.
    pub fn admits(&self, record: &StudentRecord) -> bool {
        CategoryField::ALL.iter().all(|&field| {
            self.allowed
                .get(&field)
                .map_or(true, |set| set.contains(record.category(field)))
        })
    }

    pub fn is_allowed(&self, field: CategoryField, value: &CellValue) -> bool {
        self.allowed
            .get(&field)
            .map_or(true, |set| set.contains(value))
    }

    /// Toggle a single value in a field's allowed set.
    pub fn toggle_value(&mut self, dataset: &ResultsDataset, field: CategoryField, value: &CellValue) {
        // An unconstrained field starts from "everything" so that a toggle removes one value.
        let selected = self
            .allowed
            .entry(field)
            .or_insert_with(|| dataset.unique_values.get(&field).cloned().unwrap_or_default());
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Select all values of a field.
    pub fn select_all(&mut self, dataset: &ResultsDataset, field: CategoryField) {
        let all = dataset.unique_values.get(&field).cloned().unwrap_or_default();
        self.allowed.insert(field, all);
    }

    /// Deselect all values of a field.
    pub fn select_none(&mut self, field: CategoryField) {
        self.allowed.insert(field, BTreeSet::new());
    }

    /// Add or remove a column; newly added columns go to the end.
    pub fn toggle_column(&mut self, column: &str) {
        if let Some(pos) = self.selected_columns.iter().position(|c| c == column) {
            self.selected_columns.remove(pos);
        } else {
            self.selected_columns.push(column.to_string());
        }
    }

    pub fn is_column_selected(&self, column: &str) -> bool {
        self.selected_columns.iter().any(|c| c == column)
    }
}

// ---------------------------------------------------------------------------
// Filtered view: ordered subsequence of dataset rows
// ---------------------------------------------------------------------------

/// Rows of a dataset passing a filter, kept as ascending row indices.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a ResultsDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row.
    pub fn full(dataset: &'a ResultsDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices produced by an earlier filter pass.
    pub fn from_indices(dataset: &'a ResultsDataset, indices: &[usize]) -> Self {
        Self {
            dataset,
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    /// Keep only the rows of this view that `spec` admits.
    pub fn refine(&self, spec: &FilterSpec) -> FilteredView<'a> {
        let dataset = self.dataset;
        FilteredView {
            dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| spec.admits(&dataset.records[i]))
                .collect(),
        }
    }

    pub fn dataset(&self) -> &'a ResultsDataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows<'s>(&'s self) -> impl Iterator<Item = &'a StudentRecord> + 's {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply `spec` to the whole dataset.
pub fn filter<'a>(dataset: &'a ResultsDataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView::full(dataset).refine(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{sample_dataset, text};

    fn spec_with(field: CategoryField, values: &[CellValue]) -> FilterSpec {
        let mut spec = FilterSpec::default();
        spec.allowed.insert(field, values.iter().cloned().collect());
        spec
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = sample_dataset();
        let spec = FilterSpec::all(&ds, &ColumnRule::default());
        let view = filter(&ds, &spec);
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn default_spec_is_unconstrained() {
        let ds = sample_dataset();
        assert_eq!(filter(&ds, &FilterSpec::default()).len(), ds.len());
    }

    #[test]
    fn rows_satisfy_every_predicate_in_order() {
        let ds = sample_dataset();
        let mut spec = spec_with(CategoryField::Class, &[text("A")]);
        spec.allowed.insert(
            CategoryField::Semester,
            [CellValue::Integer(3)].into_iter().collect(),
        );
        let view = filter(&ds, &spec);
        assert_eq!(view.indices(), &[0, 4]);
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        for row in view.rows() {
            assert_eq!(row.class, text("A"));
            assert_eq!(row.semester, CellValue::Integer(3));
        }
    }

    #[test]
    fn empty_allowed_set_hides_everything() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::all(&ds, &ColumnRule::default());
        spec.select_none(CategoryField::Status);
        assert!(filter(&ds, &spec).is_empty());
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let ds = sample_dataset();
        let spec = spec_with(CategoryField::Status, &[text("Unsuccessful")]);
        let once = filter(&ds, &spec);
        let twice = once.refine(&spec);
        assert_eq!(once.indices(), twice.indices());
        assert_eq!(once.indices(), &[1, 2]);
    }

    #[test]
    fn toggle_removes_then_restores_value() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.toggle_value(&ds, CategoryField::Class, &text("B"));
        assert_eq!(filter(&ds, &spec).indices(), &[0, 2, 4]);
        spec.toggle_value(&ds, CategoryField::Class, &text("B"));
        assert_eq!(filter(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn select_all_restores_identity() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.select_none(CategoryField::Semester);
        spec.select_all(&ds, CategoryField::Semester);
        assert_eq!(filter(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn toggled_columns_keep_selection_order() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::all(&ds, &ColumnRule::default());
        assert_eq!(spec.selected_columns, vec!["Math Total", "Physics Total"]);
        spec.toggle_column("Math Total");
        spec.toggle_column("Math Total");
        assert_eq!(spec.selected_columns, vec!["Physics Total", "Math Total"]);
    }

    #[test]
    fn stale_indices_are_dropped() {
        let ds = sample_dataset();
        let view = FilteredView::from_indices(&ds, &[1, 3, 99]);
        assert_eq!(view.indices(), &[1, 3]);
    }
}
