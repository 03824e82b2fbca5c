//! Chart Plotter Module
//! Draws the five dashboard charts with egui_plot.

use crate::views::{AboardFatalityPoint, CountryFatalities, ManufacturerCount, QuarterCount, YearCount};
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};
use std::ops::RangeInclusive;

pub const MANUFACTURER_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // Sky blue
pub const TREND_COLOR: Color32 = Color32::from_rgb(0, 0, 255); // Blue
pub const COUNTRY_COLOR: Color32 = Color32::from_rgb(255, 127, 80); // Coral
pub const QUARTER_COLOR: Color32 = Color32::from_rgb(144, 238, 144); // Light green
pub const SCATTER_COLOR: Color32 = Color32::from_rgba_premultiplied(128, 0, 0, 128); // Red, half alpha

pub const CHART_HEIGHT: f32 = 320.0;

/// Label for an integer grid mark, empty between categories.
fn category_label(labels: &[String], value: f64) -> String {
    if (value - value.round()).abs() > 1e-6 || value < 0.0 {
        return String::new();
    }
    labels.get(value.round() as usize).cloned().unwrap_or_default()
}

/// Draws the dashboard charts from derived tables.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bars with the first entry at the top.
    fn draw_ranked_bars(
        ui: &mut egui::Ui,
        id: &str,
        value_label: &str,
        category_axis: &str,
        rows: Vec<(String, f64)>,
        color: Color32,
    ) {
        let n = rows.len();
        // Bars are laid out bottom-up, so the top-ranked row gets the largest position
        let labels: Vec<String> = rows.iter().rev().map(|(label, _)| label.clone()).collect();
        let bars: Vec<Bar> = rows
            .into_iter()
            .enumerate()
            .map(|(rank, (label, value))| {
                Bar::new((n - 1 - rank) as f64, value)
                    .name(label)
                    .fill(color)
                    .width(0.7)
            })
            .collect();

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(value_label)
            .y_axis_label(category_axis)
            .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).horizontal());
            });
    }

    /// Top manufacturers by number of crashes.
    pub fn draw_manufacturers(ui: &mut egui::Ui, rows: &[ManufacturerCount]) {
        let rows = rows
            .iter()
            .map(|m| (m.manufacturer.clone(), m.crashes as f64))
            .collect();
        Self::draw_ranked_bars(
            ui,
            "top_manufacturers",
            "Number of Crashes",
            "Aircraft Manufacturer",
            rows,
            MANUFACTURER_COLOR,
        );
    }

    /// Top countries/regions by summed air fatalities.
    pub fn draw_countries(ui: &mut egui::Ui, rows: &[CountryFatalities]) {
        let rows = rows
            .iter()
            .map(|c| (c.country.clone(), c.fatalities))
            .collect();
        Self::draw_ranked_bars(
            ui,
            "top_countries",
            "Number of Fatalities",
            "Country/Region",
            rows,
            COUNTRY_COLOR,
        );
    }

    /// Crash count per year as a line with markers.
    pub fn draw_yearly_trend(ui: &mut egui::Ui, rows: &[YearCount]) {
        let points: Vec<[f64; 2]> = rows
            .iter()
            .map(|y| [y.year as f64, y.crashes as f64])
            .collect();

        Plot::new("yearly_trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Number of Crashes")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(1.5)
                        .name("Crash Count"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(2.5)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Crash count per quarter, in quarter order.
    pub fn draw_quarters(ui: &mut egui::Ui, rows: &[QuarterCount]) {
        let labels: Vec<String> = rows.iter().map(|q| q.quarter.to_string()).collect();
        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, q)| {
                Bar::new(i as f64, q.crashes as f64)
                    .name(q.quarter.to_string())
                    .fill(QUARTER_COLOR)
                    .width(0.6)
            })
            .collect();

        Plot::new("crashes_by_quarter")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Quarter")
            .y_axis_label("Number of Crashes")
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(QUARTER_COLOR));
            });
    }

    /// People aboard against air fatalities, one point per crash.
    pub fn draw_aboard_vs_fatalities(ui: &mut egui::Ui, points: &[AboardFatalityPoint]) {
        let series: PlotPoints = points.iter().map(|p| [p.aboard, p.fatalities]).collect();

        Plot::new("aboard_vs_fatalities")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Number of People Aboard")
            .y_axis_label("Fatalities (air)")
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(series)
                        .radius(2.5)
                        .color(SCATTER_COLOR)
                        .name("Crash"),
                );
            });
    }
}
