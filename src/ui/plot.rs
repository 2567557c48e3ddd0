use std::f64::consts::TAU;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points, Polygon,
};

use crate::color::{generate_palette, ColorMap};
use crate::data::aggregate::{BoxSummary, DashboardSummary};

const CHART_HEIGHT: f32 = 280.0;

fn chart(id: &str) -> Plot {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

/// One bar chart per column so each subject gets its own legend entry.
fn subject_bars(ui: &mut Ui, id: &str, y_label: &str, values: &[(&str, f64)]) {
    let palette = generate_palette(values.len());
    chart(id)
        .y_axis_label(y_label)
        .show_axes([false, true])
        .show(ui, |plot_ui| {
            for (i, ((column, value), color)) in values.iter().zip(palette).enumerate() {
                let bar = Bar::new(i as f64, *value).name(*column).width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(*column).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Chart 1 – "Most Scoring Subjects"
// ---------------------------------------------------------------------------

pub fn mean_scores_chart(ui: &mut Ui, summary: &DashboardSummary) {
    ui.strong("Most Scoring Subjects");
    subject_bars(ui, "mean_scores", "Average Score", &summary.metrics.ranked_means());
}

// ---------------------------------------------------------------------------
// Chart 2 – "Subjects with Unsuccessful Scores"
// ---------------------------------------------------------------------------

pub fn unsuccessful_chart(ui: &mut Ui, summary: &DashboardSummary) {
    ui.strong("Subjects with Unsuccessful Scores");
    let values: Vec<(&str, f64)> = summary
        .unsuccessful_counts
        .iter()
        .map(|(column, count)| (column.as_str(), *count as f64))
        .collect();
    subject_bars(ui, "unsuccessful_scores", "Number of Unsuccessful Scores", &values);
}

// ---------------------------------------------------------------------------
// Chart 3 – "Distribution of Scores per Subject"
// ---------------------------------------------------------------------------

pub fn distribution_chart(ui: &mut Ui, summary: &DashboardSummary) {
    ui.strong("Distribution of Scores per Subject");
    let palette = generate_palette(summary.distributions.len());
    chart("score_distribution")
        .y_axis_label("Scores")
        .show_axes([false, true])
        .show(ui, |plot_ui| {
            for (i, (scores, color)) in summary.distributions.iter().zip(palette).enumerate() {
                let Some(b) = BoxSummary::from_scores(&scores.values) else {
                    continue;
                };
                let x = i as f64;
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(&scores.column)
                .box_width(0.5)
                .whisker_width(0.3)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&scores.column).color(color));

                if !b.outliers.is_empty() {
                    let points: PlotPoints = b.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Chart 4 – "Overview of Student Status"
// ---------------------------------------------------------------------------

/// Outline of a pie slice between two angles (radians), as polygon vertices.
pub fn slice_outline(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / TAU) * 96.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for s in 0..=steps {
        let a = start + (end - start) * s as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

pub fn status_pie(ui: &mut Ui, summary: &DashboardSummary, colors: Option<&ColorMap>) {
    ui.strong("Overview of Student Status");
    let total: usize = summary.status_counts.iter().map(|(_, n)| n).sum();
    chart("status_pie")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            if total == 0 {
                return;
            }
            // Clockwise from twelve o'clock.
            let mut angle = TAU / 4.0;
            for (status, count) in &summary.status_counts {
                let sweep = TAU * *count as f64 / total as f64;
                let color = colors.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(status));
                let share = 100.0 * *count as f64 / total as f64;
                let points: PlotPoints = slice_outline(angle - sweep, angle).into_iter().collect();
                plot_ui.polygon(
                    Polygon::new(points)
                        .name(format!("{status} ({share:.1}%)"))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                angle -= sweep;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_outline_starts_at_center_and_spans_arc() {
        let pts = slice_outline(0.0, TAU / 4.0);
        assert_eq!(pts[0], [0.0, 0.0]);
        let first = pts[1];
        let last = pts[pts.len() - 1];
        assert!((first[0] - 1.0).abs() < 1e-9 && first[1].abs() < 1e-9);
        assert!(last[0].abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_circle_has_many_segments() {
        assert!(slice_outline(0.0, TAU).len() > 90);
    }
}
