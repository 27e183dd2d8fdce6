use egui::{Color32, Layout, RichText, Ui};
use egui_dropdown::DropDownBox;
use gridgap::SessionType;

use super::{GapVisualizerApp, PALETTE_ORANGE, ScheduleState};

impl GapVisualizerApp {
    pub(crate) fn show_selectors(&mut self, ui: &mut Ui) {
        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            let previous_year = self.selected_year;
            ui.label(RichText::new("Year: ").color(Color32::WHITE));
            egui::ComboBox::from_id_salt("year_selector")
                .selected_text(self.selected_year.to_string())
                .show_ui(ui, |ui| {
                    for year in &self.years {
                        ui.selectable_value(&mut self.selected_year, *year, year.to_string());
                    }
                });
            if previous_year != self.selected_year {
                self.selected_event.clear();
                self.request_schedule(self.selected_year);
            }

            ui.separator();
            ui.label(RichText::new("Event: ").color(Color32::WHITE));
            ui.add(
                DropDownBox::from_iter(
                    &self.events,
                    "event_dropbox",
                    &mut self.selected_event,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(true),
            );
            match &self.schedule_state {
                ScheduleState::Loading => {
                    ui.add(egui::Spinner::new());
                }
                ScheduleState::Failed(reason) => {
                    ui.label(RichText::new("⚠").color(Color32::RED))
                        .on_hover_text(reason);
                }
                ScheduleState::Ready => {}
            }

            ui.separator();
            ui.label(RichText::new("Session: ").color(Color32::WHITE));
            egui::ComboBox::from_id_salt("session_selector")
                .selected_text(self.selected_session.label())
                .show_ui(ui, |ui| {
                    for session_type in SessionType::ALL {
                        ui.selectable_value(
                            &mut self.selected_session,
                            session_type,
                            session_type.label(),
                        );
                    }
                });

            ui.separator();
            let can_generate = !self.is_loading() && !self.selected_event.trim().is_empty();
            let generate = ui.add_enabled(
                can_generate,
                egui::Button::new(RichText::new("Generate plot").color(PALETTE_ORANGE)),
            );
            if generate.clicked() {
                self.request_figure();
            }
        });
    }
}
