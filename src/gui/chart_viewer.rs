//! Chart Viewer Widget
//! Right side scrollable panel with one card per chart.

use crate::charts::ChartPlotter;
use crate::views::{ViewKind, ViewSet};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub views: Option<ViewSet>,
    pub load_error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.views = None;
        self.load_error = None;
    }

    pub fn set_views(&mut self, views: ViewSet) {
        self.views = Some(views);
        self.load_error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.views = None;
        self.load_error = Some(error);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = &self.load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(views) = &self.views else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_card(
                    ui,
                    views,
                    ViewKind::TopManufacturers,
                    "Top Aircraft Manufacturers by Number of Crashes",
                    |ui| ChartPlotter::draw_manufacturers(ui, &views.top_manufacturers),
                );
                Self::draw_card(
                    ui,
                    views,
                    ViewKind::YearlyTrend,
                    "Air Crash Trends Over the Years",
                    |ui| ChartPlotter::draw_yearly_trend(ui, &views.yearly_trend),
                );
                Self::draw_card(
                    ui,
                    views,
                    ViewKind::TopFatalityCountries,
                    "Countries/Regions with the Highest Number of Air Crash Fatalities",
                    |ui| ChartPlotter::draw_countries(ui, &views.top_fatality_countries),
                );
                Self::draw_card(
                    ui,
                    views,
                    ViewKind::CrashesByQuarter,
                    "Air Crashes by Quarter of the Year",
                    |ui| ChartPlotter::draw_quarters(ui, &views.crashes_by_quarter),
                );
                Self::draw_card(
                    ui,
                    views,
                    ViewKind::AboardVsFatalities,
                    "Relationship Between Number of People Aboard and Air Crash Fatalities",
                    |ui| {
                        if let Some(r) = views.aboard_fatality_correlation {
                            ui.label(
                                RichText::new(format!("Pearson r = {:.3}", r))
                                    .size(12.0)
                                    .color(Color32::GRAY),
                            );
                        }
                        ChartPlotter::draw_aboard_vs_fatalities(ui, &views.aboard_vs_fatalities);
                    },
                );
            });
    }

    /// One framed chart, or a placeholder when its derived table is empty.
    fn draw_card(
        ui: &mut egui::Ui,
        views: &ViewSet,
        kind: ViewKind,
        title: &str,
        draw: impl FnOnce(&mut egui::Ui),
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(16.0).strong().color(CARD_BORDER));
                ui.add_space(8.0);

                if views.is_view_empty(kind) {
                    ui.label(
                        RichText::new(format!("No data for {}", views.selection))
                            .size(13.0)
                            .color(Color32::GRAY),
                    );
                } else {
                    draw(ui);
                }
            });
        ui.add_space(CHART_SPACING);
    }
}
