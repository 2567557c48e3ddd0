use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::CellValue;

/// Pass mark used when counting failing scores.
pub const DEFAULT_PASS_THRESHOLD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Key performance indicators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMean {
    pub column: String,
    /// `None` when the column has no numeric value in the view.
    pub mean: Option<f64>,
}

/// Aggregates over a filtered view. Undefined values are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsSummary {
    pub row_count: usize,
    pub average_cgpa: Option<f64>,
    pub unsuccessful_count: usize,
    /// Means in selection order.
    pub mean_scores: Vec<ColumnMean>,
    pub most_scoring_subject: Option<String>,
    pub least_scoring_subject: Option<String>,
}

impl MetricsSummary {
    /// Defined means, highest first. Equal means keep selection order.
    pub fn ranked_means(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .mean_scores
            .iter()
            .filter_map(|m| m.mean.map(|v| (m.column.as_str(), v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Values of one score column across the view; `None` for unknown columns.
fn column_values(view: &FilteredView<'_>, column: &str) -> Option<Vec<Option<f64>>> {
    let idx = view.dataset().score_index(column)?;
    Some(
        view.rows()
            .map(|r| r.scores.get(idx).copied().flatten())
            .collect(),
    )
}

/// First column holding the best defined mean according to `better`.
fn pick_column(means: &[ColumnMean], better: impl Fn(f64, f64) -> bool) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for m in means {
        let Some(v) = m.mean else { continue };
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((m.column.as_str(), v)),
        }
    }
    best.map(|(c, _)| c.to_string())
}

pub fn compute_metrics(view: &FilteredView<'_>, selected_columns: &[String]) -> MetricsSummary {
    let mean_scores: Vec<ColumnMean> = selected_columns
        .iter()
        .map(|column| ColumnMean {
            column: column.clone(),
            mean: column_values(view, column).and_then(|values| mean(values.into_iter())),
        })
        .collect();

    MetricsSummary {
        row_count: view.len(),
        average_cgpa: mean(view.rows().map(|r| r.cgpa)),
        unsuccessful_count: view.rows().filter(|r| r.is_unsuccessful()).count(),
        most_scoring_subject: pick_column(&mean_scores, |v, best| v > best),
        least_scoring_subject: pick_column(&mean_scores, |v, best| v < best),
        mean_scores,
    }
}

// ---------------------------------------------------------------------------
// Chart inputs
// ---------------------------------------------------------------------------

/// Per column, the number of unsuccessful students scoring below `threshold`.
pub fn unsuccessful_score_counts(
    view: &FilteredView<'_>,
    selected_columns: &[String],
    threshold: f64,
) -> Vec<(String, usize)> {
    let dataset = view.dataset();
    selected_columns
        .iter()
        .map(|column| {
            let count = dataset.score_index(column).map_or(0, |idx| {
                view.rows()
                    .filter(|r| r.is_unsuccessful())
                    .filter(|r| matches!(r.scores.get(idx), Some(Some(v)) if *v < threshold))
                    .count()
            });
            (column.clone(), count)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScores {
    pub column: String,
    /// Present scores in view order.
    pub values: Vec<f64>,
}

pub fn score_distribution(view: &FilteredView<'_>, selected_columns: &[String]) -> Vec<ColumnScores> {
    selected_columns
        .iter()
        .map(|column| ColumnScores {
            column: column.clone(),
            values: column_values(view, column)
                .map(|values| values.into_iter().flatten().collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// Row count per status, largest first; equal counts keep first-appearance order.
pub fn status_distribution(view: &FilteredView<'_>) -> Vec<(CellValue, usize)> {
    let mut slots: BTreeMap<&CellValue, usize> = BTreeMap::new();
    let mut counts: Vec<(CellValue, usize)> = Vec::new();
    for row in view.rows() {
        let slot = slots.get(&row.status).copied();
        match slot {
            Some(slot) => counts[slot].1 += 1,
            None => {
                slots.insert(&row.status, counts.len());
                counts.push((row.status.clone(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl BoxSummary {
    pub fn from_scores(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - fence, q3 + fence);

        let mut lower_whisker = f64::INFINITY;
        let mut upper_whisker = f64::NEG_INFINITY;
        let mut outliers = Vec::new();
        for &v in &sorted {
            if v < low_fence || v > high_fence {
                outliers.push(v);
            } else {
                lower_whisker = lower_whisker.min(v);
                upper_whisker = upper_whisker.max(v);
            }
        }

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// One full recomputation pass
// ---------------------------------------------------------------------------

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub metrics: MetricsSummary,
    pub unsuccessful_counts: Vec<(String, usize)>,
    pub distributions: Vec<ColumnScores>,
    pub status_counts: Vec<(CellValue, usize)>,
}

pub fn summarize(
    view: &FilteredView<'_>,
    selected_columns: &[String],
    threshold: f64,
) -> DashboardSummary {
    DashboardSummary {
        metrics: compute_metrics(view, selected_columns),
        unsuccessful_counts: unsuccessful_score_counts(view, selected_columns, threshold),
        distributions: score_distribution(view, selected_columns),
        status_counts: status_distribution(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSpec};
    use crate::data::model::tests::{sample_dataset, text};
    use crate::data::model::{CategoryField, ResultsDataset, StudentRecord};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn student(status: &str, cgpa: Option<f64>, scores: Vec<Option<f64>>) -> StudentRecord {
        StudentRecord {
            class: text("A"),
            semester: CellValue::Integer(3),
            status: text(status),
            name: "student".to_string(),
            uid: "1".to_string(),
            cgpa,
            scores,
        }
    }

    #[test]
    fn average_cgpa_is_plain_mean() {
        let ds = ResultsDataset::from_records(
            vec![
                student("Successful", Some(8.0), vec![]),
                student("Successful", Some(9.0), vec![]),
                student("Successful", Some(7.0), vec![]),
            ],
            vec![],
        );
        let m = compute_metrics(&FilteredView::full(&ds), &[]);
        assert_eq!(m.average_cgpa, Some(8.0));
    }

    #[test]
    fn missing_cgpa_is_ignored() {
        let ds = ResultsDataset::from_records(
            vec![
                student("Successful", Some(6.0), vec![]),
                student("Successful", None, vec![]),
            ],
            vec![],
        );
        let m = compute_metrics(&FilteredView::full(&ds), &[]);
        assert_eq!(m.average_cgpa, Some(6.0));
    }

    #[test]
    fn argmax_and_argmin_over_means() {
        let ds = ResultsDataset::from_records(
            vec![
                student("Successful", Some(8.0), vec![Some(60.0), Some(80.0)]),
                student("Successful", Some(8.0), vec![Some(80.0), Some(90.0)]),
            ],
            cols(&["Math Total", "Physics Total"]),
        );
        let m = compute_metrics(&FilteredView::full(&ds), &cols(&["Math Total", "Physics Total"]));
        assert_eq!(m.mean_scores[0].mean, Some(70.0));
        assert_eq!(m.mean_scores[1].mean, Some(85.0));
        assert_eq!(m.most_scoring_subject.as_deref(), Some("Physics Total"));
        assert_eq!(m.least_scoring_subject.as_deref(), Some("Math Total"));
    }

    #[test]
    fn ties_go_to_first_selected_column() {
        let ds = ResultsDataset::from_records(
            vec![student("Successful", None, vec![Some(50.0), Some(50.0), Some(50.0)])],
            cols(&["A Total", "B Total", "C Total"]),
        );
        let selected = cols(&["B Total", "A Total", "C Total"]);
        let m = compute_metrics(&FilteredView::full(&ds), &selected);
        assert_eq!(m.most_scoring_subject.as_deref(), Some("B Total"));
        assert_eq!(m.least_scoring_subject.as_deref(), Some("B Total"));
    }

    #[test]
    fn non_numeric_scores_are_excluded_from_means() {
        let ds = sample_dataset();
        let m = compute_metrics(&FilteredView::full(&ds), &cols(&["Math Total"]));
        // 70, 40, 45, 60 with "AB" skipped
        assert_eq!(m.mean_scores[0].mean, Some(53.75));
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.select_none(CategoryField::Class);
        let view = filter(&ds, &spec);
        let m = compute_metrics(&view, &cols(&["Math Total", "Physics Total"]));
        assert_eq!(m.row_count, 0);
        assert_eq!(m.average_cgpa, None);
        assert_eq!(m.unsuccessful_count, 0);
        assert!(m.mean_scores.iter().all(|c| c.mean.is_none()));
        assert_eq!(m.most_scoring_subject, None);
        assert_eq!(m.least_scoring_subject, None);
        assert!(m.ranked_means().is_empty());
    }

    #[test]
    fn empty_selection_yields_empty_outputs() {
        let ds = sample_dataset();
        let view = FilteredView::full(&ds);
        let summary = summarize(&view, &[], DEFAULT_PASS_THRESHOLD);
        assert!(summary.metrics.mean_scores.is_empty());
        assert_eq!(summary.metrics.most_scoring_subject, None);
        assert!(summary.unsuccessful_counts.is_empty());
        assert!(summary.distributions.is_empty());
        assert_eq!(summary.metrics.average_cgpa, Some(8.0));
    }

    #[test]
    fn unsuccessful_counts_use_strict_threshold() {
        let ds = ResultsDataset::from_records(
            vec![
                student("Unsuccessful", None, vec![Some(40.0)]),
                student("Unsuccessful", None, vec![Some(60.0)]),
                student("Unsuccessful", None, vec![Some(45.0)]),
                student("Unsuccessful", None, vec![Some(50.0)]),
                student("Successful", None, vec![Some(10.0)]),
            ],
            cols(&["Math Total"]),
        );
        let counts = unsuccessful_score_counts(&FilteredView::full(&ds), &cols(&["Math Total"]), 50.0);
        assert_eq!(counts, vec![("Math Total".to_string(), 2)]);
    }

    #[test]
    fn unknown_columns_count_nothing() {
        let ds = sample_dataset();
        let view = FilteredView::full(&ds);
        let counts = unsuccessful_score_counts(&view, &cols(&["Biology Total"]), 50.0);
        assert_eq!(counts, vec![("Biology Total".to_string(), 0)]);
        let m = compute_metrics(&view, &cols(&["Biology Total"]));
        assert_eq!(m.mean_scores[0].mean, None);
    }

    #[test]
    fn distribution_keeps_view_order_and_skips_missing() {
        let ds = sample_dataset();
        let dist = score_distribution(&FilteredView::full(&ds), &cols(&["Math Total"]));
        assert_eq!(dist[0].values, vec![70.0, 40.0, 45.0, 60.0]);
    }

    #[test]
    fn status_counts_sorted_descending() {
        let ds = sample_dataset();
        let counts = status_distribution(&FilteredView::full(&ds));
        assert_eq!(
            counts,
            vec![(text("Successful"), 3), (text("Unsuccessful"), 2)]
        );
    }

    #[test]
    fn status_ties_keep_first_appearance() {
        let ds = ResultsDataset::from_records(
            vec![
                student("Unsuccessful", None, vec![]),
                student("Successful", None, vec![]),
            ],
            vec![],
        );
        let counts = status_distribution(&FilteredView::full(&ds));
        assert_eq!(counts[0].0, text("Unsuccessful"));
        assert_eq!(counts[1].0, text("Successful"));
    }

    #[test]
    fn ranked_means_descend() {
        let ds = sample_dataset();
        let m = compute_metrics(&FilteredView::full(&ds), &cols(&["Math Total", "Physics Total"]));
        let ranked: Vec<&str> = m.ranked_means().into_iter().map(|(c, _)| c).collect();
        assert_eq!(ranked, vec!["Physics Total", "Math Total"]);
    }

    #[test]
    fn box_summary_quartiles_interpolate() {
        let b = BoxSummary::from_scores(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (2.0, 3.0, 4.0));
        assert_eq!((b.lower_whisker, b.upper_whisker), (1.0, 5.0));
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let b = BoxSummary::from_scores(&[50.0, 52.0, 54.0, 56.0, 58.0, 5.0]).unwrap();
        assert_eq!(b.outliers, vec![5.0]);
        assert_eq!(b.lower_whisker, 50.0);
        assert_eq!(b.upper_whisker, 58.0);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert!(BoxSummary::from_scores(&[]).is_none());
    }
}
