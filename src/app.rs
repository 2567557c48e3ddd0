use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{metrics, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig, startup_message: Option<String>) -> Self {
        let mut state = AppState::new(config);
        state.open_default_dataset();
        if state.status_message.is_none() {
            state.status_message = startup_message;
        }
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, table, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            main_page(ui, &self.state);
        });
    }
}

fn main_page(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a results file to begin  (File → Open…)");
        });
        return;
    };
    let summary = &session.summary;
    let status_colors = state.status_colors.as_ref();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(institution) = &state.config.institution {
                ui.heading(institution.as_str());
            }
            ui.heading(state.config.title.as_str());
            ui.add_space(8.0);

            metrics::key_indicators(ui, &summary.metrics);
            ui.add_space(8.0);
            ui.separator();

            table::results_table(ui, session, status_colors);
            ui.add_space(8.0);
            ui.separator();

            plot::mean_scores_chart(ui, summary);
            plot::unsuccessful_chart(ui, summary);
            plot::distribution_chart(ui, summary);
            plot::status_pie(ui, summary, status_colors);
        });
}
