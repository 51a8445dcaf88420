//! Toolbar and status line for `NeoApp`.

use eframe::egui;

use neo_viz::config::{THRESHOLD_LD_RANGE, WINDOW_DAYS_RANGE};

use super::NeoApp;

impl NeoApp {
    /// Threshold, window and reload controls.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.heading("Near-Earth close approaches");
            ui.separator();

            ui.label("Threshold");
            ui.add(
                egui::DragValue::new(&mut self.config.threshold_ld)
                    .range(THRESHOLD_LD_RANGE)
                    .speed(1.0)
                    .suffix(" LD"),
            );

            ui.label("Window");
            ui.add(
                egui::DragValue::new(&mut self.config.window_days)
                    .range(WINDOW_DAYS_RANGE)
                    .speed(1.0)
                    .suffix(" d"),
            );

            let reload = ui.add_enabled(!self.loading, egui::Button::new("Reload"));
            if reload.clicked() {
                self.reload(ctx);
            }
            if self.loading {
                ui.spinner();
            }
        });
    }

    pub fn draw_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let Some(ref result) = self.result else {
                ui.label(if self.loading { "Loading…" } else { "No data" });
                return;
            };

            ui.label(format!(
                "Reference {} · window {} d · {} shown of {} fetched",
                result.context.reference_date,
                result.context.window_days,
                result.records.len(),
                result.total_rows,
            ));
            if result.skipped_rows > 0 {
                ui.separator();
                ui.label(format!("{} rows skipped", result.skipped_rows));
            }
            let pending = self.pending_lookups();
            if pending > 0 {
                ui.separator();
                ui.label(format!("{} next-approach lookups pending", pending));
            }
        });
    }
}
