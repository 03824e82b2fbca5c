//! Air Crashes Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::AppConfig;
use crate::data::{CanonicalTable, CleaningPipeline, DataLoader, LoaderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::views::{ViewSet, YearSelection};
use egui::SidePanel;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Arc<CanonicalTable>),
    Error(String),
}

/// Read and clean the file. Any error here is surfaced before a single view is computed.
pub fn build_canonical_table(path: &Path) -> Result<CanonicalTable, LoaderError> {
    let raw = DataLoader::load_csv(path)?;
    Ok(CleaningPipeline::run(raw))
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    table: Option<Arc<CanonicalTable>>,
    // The table never changes after load, so views can be kept per year
    view_cache: HashMap<YearSelection, ViewSet>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut app = Self {
            config,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            table: None,
            view_cache: HashMap::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(data_path);
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load and clean a CSV on a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.table = None;
        self.view_cache.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.summary = None;
        self.control_panel.update_years(vec![YearSelection::AllYears]);
        self.control_panel.set_status("Loading CSV file...");
        self.control_panel.is_loading = true;
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || Self::run_loading(tx, path));
    }

    /// Run loading (called from background thread)
    fn run_loading(tx: Sender<LoadResult>, path: PathBuf) {
        let _ = tx.send(LoadResult::Progress("Reading and cleaning data...".to_string()));

        match build_canonical_table(&path) {
            Ok(table) => {
                let _ = tx.send(LoadResult::Complete(Arc::new(table)));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to build dataset");
                let _ = tx.send(LoadResult::Error(e.to_string()));
            }
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete(table) => {
                        info!(rows = table.len(), years = table.years().len(), "Dataset ready");
                        self.control_panel
                            .update_years(YearSelection::options(&table));
                        self.control_panel.summary = Some(table.report().clone());
                        if table.is_empty() {
                            warn!("Dataset has no rows after cleaning");
                            self.control_panel.set_status("Loaded file has no crash rows");
                        } else {
                            self.control_panel
                                .set_status(&format!("Loaded {} crashes", table.len()));
                        }
                        self.table = Some(table);
                        self.finish_loading();
                        self.refresh_views();
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_status(&format!("Error: {}", error));
                        self.chart_viewer.set_error(error);
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_loading = false;
    }

    /// Recompute (or reuse) the derived tables for the selected year.
    fn refresh_views(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let selection = self.control_panel.selected_year;
        let top_n = self.config.top_n;

        let views = self
            .view_cache
            .entry(selection)
            .or_insert_with(|| ViewSet::compute(table, selection, top_n))
            .clone();
        self.chart_viewer.set_views(views);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::YearChanged => self.refresh_views(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
