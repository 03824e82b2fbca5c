//! Control Panel Widget
//! Left side panel: data source, year filter, dataset summary and status.

use crate::data::CleaningReport;
use crate::stats::ClipBounds;
use crate::views::YearSelection;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel with file selection and the year filter.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub year_options: Vec<YearSelection>,
    pub selected_year: YearSelection,
    pub summary: Option<CleaningReport>,
    pub status: String,
    pub is_loading: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            year_options: vec![YearSelection::AllYears],
            selected_year: YearSelection::AllYears,
            summary: None,
            status: "Ready".to_string(),
            is_loading: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the year filter for a newly loaded table.
    pub fn update_years(&mut self, options: Vec<YearSelection>) {
        self.year_options = options;
        self.selected_year = YearSelection::AllYears;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("✈ Air Crashes Overview")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filter the data").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new("Select Year:"));
            ComboBox::from_id_salt("selected_year")
                .width(150.0)
                .selected_text(self.selected_year.to_string())
                .show_ui(ui, |ui| {
                    for option in &self.year_options {
                        if ui
                            .selectable_label(self.selected_year == *option, option.to_string())
                            .clicked()
                            && self.selected_year != *option
                        {
                            self.selected_year = *option;
                            action = ControlPanelAction::YearChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Dataset Summary =====
        ui.label(RichText::new("📋 Dataset Summary").size(14.0).strong());
        ui.add_space(5.0);

        match &self.summary {
            Some(report) => Self::draw_summary(ui, report),
            None => {
                ui.label(RichText::new("No data loaded").size(11.0).color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    fn draw_summary(ui: &mut egui::Ui, report: &CleaningReport) {
        let bounds_text = |bounds: Option<ClipBounds>| match bounds {
            Some(b) => format!("[{:.1}, {:.1}]", b.lower, b.upper),
            None => "-".to_string(),
        };

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("dataset_summary")
                    .striped(true)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        let rows = [
                            ("Rows loaded", report.rows_in.to_string()),
                            ("Rows kept", report.rows_out.to_string()),
                            ("Duplicates removed", report.duplicates_removed.to_string()),
                            ("Unknown countries", report.countries_imputed.to_string()),
                            ("Unknown operators", report.operators_imputed.to_string()),
                            ("Ground range", bounds_text(report.ground_bounds)),
                            ("Ground clipped", report.ground_clipped.to_string()),
                            ("Fatalities range", bounds_text(report.fatalities_bounds)),
                            ("Fatalities clipped", report.fatalities_clipped.to_string()),
                        ];
                        for (label, value) in rows {
                            ui.label(RichText::new(label).size(11.0));
                            ui.label(RichText::new(value).size(11.0).strong());
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    YearChanged,
}
