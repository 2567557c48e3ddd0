use eframe::egui::{RichText, Ui};

use crate::data::aggregate::MetricsSummary;

/// Shown in place of a value the current filter leaves undefined.
const NO_DATA: &str = "n/a";

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

/// Format the average CGPA the way the KPI card shows it.
pub fn format_cgpa(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.2}"))
}

/// Two rows of two KPI cards.
pub fn key_indicators(ui: &mut Ui, metrics: &MetricsSummary) {
    ui.heading("Key Performance Indicators");
    ui.add_space(4.0);

    ui.columns(2, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Average CGPA", &format_cgpa(metrics.average_cgpa));
        metric(
            &mut cols[1],
            "Number of Unsuccessful Students",
            &metrics.unsuccessful_count.to_string(),
        );
    });
    ui.columns(2, |cols: &mut [Ui]| {
        metric(
            &mut cols[0],
            "Least Scoring Subject",
            metrics.least_scoring_subject.as_deref().unwrap_or(NO_DATA),
        );
        metric(
            &mut cols[1],
            "Most Scoring Subject",
            metrics.most_scoring_subject.as_deref().unwrap_or(NO_DATA),
        );
    });
}
