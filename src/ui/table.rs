use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::model::{StudentRecord, IDENTITY_COLUMNS};
use crate::state::Session;

fn score_text(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v}"))
}

fn identity_cell(record: &StudentRecord, column: &str) -> String {
    match column {
        "Class" => record.class.to_text(),
        "Semester" => record.semester.to_text(),
        "Name" => record.name.clone(),
        "UID" => record.uid.clone(),
        "Status" => record.status.to_text(),
        "CGPA" => score_text(record.cgpa),
        _ => String::new(),
    }
}

/// Filtered rows: identity columns first, then the selected score columns.
pub fn results_table(ui: &mut Ui, session: &Session, status_colors: Option<&ColorMap>) {
    let view = session.view();
    let dataset = view.dataset();
    let selected: Vec<(&str, Option<usize>)> = session
        .filter
        .selected_columns
        .iter()
        .map(|c| (c.as_str(), dataset.score_index(c)))
        .collect();
    let rows: Vec<&StudentRecord> = view.rows().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), IDENTITY_COLUMNS.len() + selected.len())
        .header(20.0, |mut header| {
            for name in IDENTITY_COLUMNS.iter().copied().chain(selected.iter().map(|(c, _)| *c)) {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = rows[row.index()];
                for column in IDENTITY_COLUMNS {
                    row.col(|ui: &mut Ui| {
                        let text = RichText::new(identity_cell(record, column));
                        match status_colors {
                            Some(cm) if column == "Status" => {
                                ui.label(text.color(cm.color_for(&record.status)));
                            }
                            _ => {
                                ui.label(text);
                            }
                        }
                    });
                }
                for (_, idx) in &selected {
                    let value = idx.and_then(|i| record.scores.get(i).copied().flatten());
                    row.col(|ui: &mut Ui| {
                        ui.label(score_text(value));
                    });
                }
            });
        });
}
