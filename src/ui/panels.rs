use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::{SPREADSHEET_EXTENSIONS, SUPPORTED_EXTENSIONS};
use crate::data::model::CategoryField;
use crate::state::{AppState, Session};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(session) = state.session.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in CategoryField::ALL {
                category_filter(ui, session, field);
            }
            ui.separator();
            column_picker(ui, session);
        });
}

/// Collapsible multi-select over the distinct values of one field.
fn category_filter(ui: &mut Ui, session: &mut Session, field: CategoryField) {
    // Clone so the session can be mutated inside the loop.
    let all_values = session
        .dataset
        .unique_values
        .get(&field)
        .cloned()
        .unwrap_or_default();

    let n_selected = all_values
        .iter()
        .filter(|v| session.filter.is_allowed(field, v))
        .count();
    let header_text = format!("Select the {field}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field.column_name())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all(field);
                }
                if ui.small_button("None").clicked() {
                    session.select_none(field);
                }
            });

            for val in &all_values {
                let mut checked = session.filter.is_allowed(field, val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    session.toggle_filter_value(field, val);
                }
            }
        });
}

/// Multi-select over the total columns, in sheet order.
fn column_picker(ui: &mut Ui, session: &mut Session) {
    let columns = session.total_columns.clone();
    let header_text = format!(
        "Select columns to display  ({}/{})",
        session.filter.selected_columns.len(),
        columns.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("score_columns")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all_columns();
                }
                if ui.small_button("None").clicked() {
                    session.select_no_columns();
                }
            });

            for col in &columns {
                let mut checked = session.filter.is_column_selected(col);
                if ui.checkbox(&mut checked, col.as_str()).changed() {
                    session.toggle_column(col);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            if session.dataset.is_empty() {
                ui.label(RichText::new("File has no student rows").color(Color32::YELLOW));
            } else {
                ui.label(format!(
                    "{} students loaded, {} visible",
                    session.dataset.len(),
                    session.summary.metrics.row_count
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open results")
        .add_filter("Supported files", &SUPPORTED_EXTENSIONS)
        .add_filter("Spreadsheets", &SPREADSHEET_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
