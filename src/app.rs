use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::config::PlotConfig;
use crate::data::loader::{self, Dataset};
use crate::error::LoadError;
use crate::processing::statistics::AttributeSummary;
use crate::render::color::FillScheme;
use crate::render::engine::{RenderEngine, RenderReport};
use crate::state::selection::{Selection, SelectionChange};
use crate::state::theme::Theme;
use crate::ui::controls::{self, ControlOptions, YearControl};
use crate::ui::{plot_panel, tooltip};

type LoadSlot = Arc<Mutex<Option<Result<Dataset, LoadError>>>>;

/// Pending background file load.
struct PendingLoad {
    path: PathBuf,
    result: LoadSlot,
}

/// Take a finished load out of its slot. A poisoned lock means the worker
/// panicked; unless it stored a result first, that counts as a failed load.
fn take_load_result(
    slot: &Mutex<Option<Result<Dataset, LoadError>>>,
) -> Option<Result<Dataset, LoadError>> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => Some(
            poisoned
                .into_inner()
                .take()
                .unwrap_or(Err(LoadError::WorkerPanicked)),
        ),
    }
}

/// The scatterplot application.
pub struct StationPlotApp {
    config: PlotConfig,
    dataset: Dataset,
    data_path: Option<PathBuf>,
    selection: Selection,
    fill_scheme: FillScheme,
    engine: RenderEngine,
    options: ControlOptions,
    year_control: YearControl,
    theme: Theme,
    /// Summary of the last render, shown in the side panel.
    last_report: RenderReport,
    /// Set when the next frame must run a render (startup, new data).
    needs_render: bool,
    /// An error message shown in the footer until dismissed.
    error_message: Option<String>,
    pending_load: Option<PendingLoad>,
}

impl StationPlotApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: PlotConfig,
        data_path: Option<PathBuf>,
    ) -> Self {
        let theme = Theme::default();
        cc.egui_ctx.set_visuals(theme.visuals());

        let fill_scheme = config.fill;
        let engine = RenderEngine::new(&config, fill_scheme.rule());
        let selection = config.default_selection.clone();

        let mut app = Self {
            config,
            dataset: Dataset::default(),
            data_path: None,
            selection,
            fill_scheme,
            engine,
            options: ControlOptions::default(),
            year_control: YearControl::default(),
            theme,
            last_report: RenderReport::default(),
            needs_render: true,
            error_message: None,
            pending_load: None,
        };
        if let Some(path) = data_path {
            app.load_file(&path);
        }
        app
    }

    /// Open a native file dialog and load the chosen station file.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Station Data", &["csv", "txt"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a data file on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let result: LoadSlot = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf);
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        tracing::info!("Loading {:?}", path);
        self.pending_load = Some(PendingLoad {
            path: path.to_path_buf(),
            result,
        });
    }

    fn poll_pending_load(&mut self) {
        let finished = match &self.pending_load {
            Some(pending) => take_load_result(&pending.result),
            None => return,
        };
        let Some(result) = finished else {
            return;
        };
        let path = self.pending_load.take().map(|p| p.path);
        match result {
            Ok(dataset) => {
                self.options = ControlOptions::from_dataset(&dataset);
                self.dataset = dataset;
                self.data_path = path;
                self.engine.reset();
                self.needs_render = true;
                self.error_message = None;
            }
            Err(e) => {
                tracing::error!("Failed to load data: {e}");
                self.error_message = Some(format!("Failed to load data: {e}"));
            }
        }
    }

    fn render(&mut self, now: f64) {
        self.last_report = self.engine.render(&self.dataset, &self.selection, now);
        self.needs_render = false;
    }

    /// Apply control changes to the selection; render once if anything moved.
    fn apply_changes(&mut self, changes: Vec<SelectionChange>, now: f64) {
        let mut changed = false;
        for change in changes {
            changed |= self.selection.apply(change);
        }
        if changed {
            self.render(now);
        }
    }

    fn set_fill_scheme(&mut self, scheme: FillScheme, now: f64) {
        if scheme == self.fill_scheme {
            return;
        }
        self.fill_scheme = scheme;
        self.engine.set_fill(scheme.rule());
        self.render(now);
    }

    fn summary_lines(&self) -> Vec<String> {
        if self.dataset.is_empty() {
            return vec!["No data loaded".to_string()];
        }
        let frame = self.engine.frame();
        let (x0, x1) = frame.x_scale.domain();
        let (y0, y1) = frame.y_scale.domain();
        let domains = format!("Domain: x [{x0}, {x1}]  y [{y0}, {y1}]");
        let plotted: Vec<_> = self
            .dataset
            .observations
            .iter()
            .filter(|o| self.selection.matches(o))
            .collect();
        let x = self.selection.x;
        let y = self.selection.y;
        [
            AttributeSummary::compute(plotted.iter().map(|o| x.value_of(o)))
                .map(|s| s.report(x.label())),
            AttributeSummary::compute(plotted.iter().map(|o| y.value_of(o)))
                .map(|s| s.report(y.label())),
        ]
        .into_iter()
        .flatten()
        .chain(std::iter::once(domains))
        .collect()
    }
}

impl eframe::App for StationPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.theme.visuals());
        let now = ctx.input(|i| i.time);

        self.poll_pending_load();
        if self.pending_load.is_some() {
            ctx.request_repaint();
        }
        if self.needs_render {
            self.render(now);
        }

        // --- Header panel ---
        let mut open_file = false;
        let mut new_scheme = self.fill_scheme;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Weather Stations");
                    ui.separator();
                    if ui.button("Open Data…").clicked() {
                        open_file = true;
                    }
                    if let Some(path) = &self.data_path {
                        ui.label(egui::RichText::new(path.display().to_string()).weak());
                    }
                    if self.pending_load.is_some() {
                        ui.spinner();
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = match self.theme {
                            Theme::Dark => "Light Mode",
                            Theme::Light => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            self.theme = self.theme.toggle();
                        }
                        ui.separator();
                        egui::ComboBox::from_id_salt("fill_scheme")
                            .selected_text(new_scheme.label())
                            .show_ui(ui, |ui| {
                                for scheme in [FillScheme::Constant, FillScheme::Temperature] {
                                    ui.selectable_value(&mut new_scheme, scheme, scheme.label());
                                }
                            });
                        ui.label("Fill:");
                    });
                });
            });
        if open_file {
            self.open_file_dialog();
        }
        self.set_fill_scheme(new_scheme, now);

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let r = self.last_report;
                    ui.label(
                        egui::RichText::new(format!(
                            "{} of {} rows plotted  |  {} missing a value",
                            self.engine.live_count(),
                            self.dataset.len(),
                            r.dropped
                        ))
                        .weak(),
                    );
                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // --- Control panel ---
        let summary = self.summary_lines();
        let mut changes = Vec::new();
        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                changes = controls::show_controls(
                    ui,
                    &self.selection,
                    &self.options,
                    &mut self.year_control,
                );
                ui.add_space(16.0);
                ui.separator();
                for line in summary {
                    ui.label(egui::RichText::new(line).small());
                }
            });
        self.apply_changes(changes, now);

        // --- Plot ---
        let mut hovered = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let response =
                    plot_panel::show_plot(ui, &self.engine, &self.config, &self.theme, now);
                hovered = response.hovered;
            });
        });

        if let Some((row, pointer)) = hovered {
            if let Some(obs) = self.dataset.observations.get(row) {
                tooltip::show_tooltip(ctx, obs, pointer);
            }
        }

        self.engine.prune(now);
        if self.engine.is_animating(now) {
            ctx.request_repaint();
        }
    }
}
