use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::color::CategoryColors;
use crate::data::model::{DashboardData, Gender};
use crate::state::DashboardState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CustomerDashboardApp {
    pub state: DashboardState,
    profession_colors: CategoryColors,
    gender_colors: CategoryColors,
}

impl CustomerDashboardApp {
    pub fn new(data: Arc<DashboardData>) -> Self {
        let profession_colors = CategoryColors::new(data.customers.professions().iter().cloned());
        let gender_colors = CategoryColors::new(Gender::ALL.iter().map(|g| g.to_string()));
        Self {
            state: DashboardState::new(data),
            profession_colors,
            gender_colors,
        }
    }

    /// Two charts per row. Controls sit directly above the charts they drive.
    fn chart_grid(&mut self, ui: &mut Ui) {
        let state = &mut self.state;
        let profession_colors = &self.profession_colors;
        let gender_colors = &self.gender_colors;

        ui.columns(2, |cols| {
            plot::profession_bar(&mut cols[0], state, profession_colors);
            plot::province_map(&mut cols[1], state);
        });

        ui.separator();
        ui.columns(2, |cols| {
            panels::profession_selector(&mut cols[0], state);
            panels::age_slider(&mut cols[1], state);
        });
        ui.columns(2, |cols| {
            plot::generation_bar(&mut cols[0], state);
            plot::gender_profession_bar(&mut cols[1], state, gender_colors);
        });

        ui.separator();
        ui.columns(2, |cols| {
            plot::income_scatter(&mut cols[0], state);
            plot::income_histogram(&mut cols[1], state);
        });
    }
}

impl eframe::App for CustomerDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Central panel: chart grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| self.chart_grid(ui));
        });
    }
}
