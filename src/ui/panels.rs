use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with dataset counts and the last control error.
pub fn top_bar(ui: &mut Ui, state: &DashboardState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Customer Demography Dashboard");
        ui.separator();

        let data = state.data();
        ui.label(format!(
            "{} customers, {} professions, {} provinces mapped",
            data.customers.len(),
            data.customers.professions().len(),
            state.charts().province_map.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    ui.label(
        "Explore customer behavior at a glance: customer distribution across provinces, \
         and generational and gender insights within professions.",
    );
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Profession selector. Changing it refreshes the generation chart.
pub fn profession_selector(ui: &mut Ui, state: &mut DashboardState) {
    ui.strong("Select Profession");

    let current = state.controls().selected_profession().to_string();
    let options = state.controls().professions().to_vec();
    let mut picked = None;

    egui::ComboBox::from_id_salt("profession")
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &options {
                if ui.selectable_label(current == *option, option.as_str()).clicked() {
                    picked = Some(option.clone());
                }
            }
        });

    if let Some(profession) = picked.filter(|p| *p != current) {
        // Errors land in `status_message`.
        let _ = state.set_profession(&profession);
    }
}

/// Age range as two sliders. Changing either refreshes the gender chart.
///
/// A lower bound above the upper bound is rejected and the message shown in
/// the top bar; the previous range stays active.
pub fn age_slider(ui: &mut Ui, state: &mut DashboardState) {
    ui.strong("Select age range");

    let Some(bounds) = state.controls().age_bounds() else {
        ui.label("No ages in dataset.");
        return;
    };
    let current = state.controls().age_range();
    let (mut min, mut max) = (current.min, current.max);

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(egui::Slider::new(&mut min, bounds.min..=bounds.max).text("from"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut max, bounds.min..=bounds.max).text("to"))
            .changed();
    });

    if changed {
        let _ = state.set_age_range(min, max);
    }
}
