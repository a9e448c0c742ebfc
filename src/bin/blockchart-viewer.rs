/*!
 * Desktop viewer for blockchart
 *
 * Opens a CSV file as a line, bar or pie chart and shows it in an interactive
 * viewport: hover for tooltips, drag to zoom, right-drag to pan, scroll to
 * zoom about the pointer, double-click to restore the automatic ranges.
 */

use anyhow::{Context, Result};
use blockchart::factory::build_chart;
use blockchart::{ChartConfig, ChartData, ChartKind, ChartViewport, ExporterRegistry, Rect};
use eframe::egui;
use std::path::PathBuf;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("blockchart viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "blockchart viewer",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new()))),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LegendPosition {
    Bottom,
    Right,
    Top,
    Left,
    Hidden,
}

impl LegendPosition {
    fn edge_name(self) -> Option<&'static str> {
        match self {
            LegendPosition::Bottom => Some("bottom"),
            LegendPosition::Right => Some("right"),
            LegendPosition::Top => Some("top"),
            LegendPosition::Left => Some("left"),
            LegendPosition::Hidden => None,
        }
    }
}

struct ViewerApp {
    // Inputs
    input_path: String,
    kind: ChartKind,
    title: String,
    x_label: String,
    y_label: String,
    legend_position: LegendPosition,
    locale: String,
    config_path: Option<PathBuf>,

    // Chart state
    viewport: Option<ChartViewport>,
    texture: Option<egui::TextureHandle>,
    shown_render: usize,
    drag_origin: Option<egui::Pos2>,
    drag_current: Option<egui::Pos2>,

    // UI state
    status_message: String,
    error_message: String,
}

impl ViewerApp {
    fn new() -> Self {
        Self {
            input_path: String::new(),
            kind: ChartKind::Line,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            legend_position: LegendPosition::Bottom,
            locale: "en".to_string(),
            config_path: None,
            viewport: None,
            texture: None,
            shown_render: 0,
            drag_origin: None,
            drag_current: None,
            status_message: String::new(),
            error_message: String::new(),
        }
    }

    fn start_dir() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn config(&self) -> Result<ChartConfig> {
        let mut cfg = match &self.config_path {
            Some(path) => ChartConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ChartConfig::default(),
        };
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
        cfg.title = non_empty(&self.title).or(cfg.title);
        cfg.x_label = non_empty(&self.x_label).or(cfg.x_label);
        cfg.y_label = non_empty(&self.y_label).or(cfg.y_label);
        cfg.locale = self.locale.clone();
        match self.legend_position.edge_name() {
            Some(edge) => {
                cfg.legend = true;
                cfg.legend_position = edge.to_string();
            }
            None => cfg.legend = false,
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn load_chart(&mut self) -> Result<()> {
        if self.input_path.trim().is_empty() {
            anyhow::bail!("Please choose a CSV file");
        }
        let cfg = self.config()?;
        let data = ChartData::load_csv(self.kind, self.input_path.trim())
            .with_context(|| format!("reading {}", self.input_path))?;
        let chart = build_chart(&cfg, data)?;
        self.viewport = Some(ChartViewport::new(chart, cfg.width, cfg.height));
        self.texture = None;
        self.shown_render = 0;
        Ok(())
    }

    fn save_as(&mut self) -> Result<Option<PathBuf>> {
        let Some(viewport) = self.viewport.as_mut() else {
            anyhow::bail!("Nothing to save yet");
        };
        let Some(path) = rfd::FileDialog::new()
            .set_directory(Self::start_dir())
            .set_file_name("chart.png")
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("SVG", &["svg"])
            .save_file()
        else {
            return Ok(None);
        };
        let (w, h) = viewport.size();
        ExporterRegistry::new()
            .save(viewport.chart_mut(), &path, w.max(1), h.max(1))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(Some(path))
    }

    fn report<T>(&mut self, result: Result<T>, success: impl FnOnce(T) -> Option<String>) {
        match result {
            Ok(v) => {
                if let Some(msg) = success(v) {
                    self.status_message = msg;
                }
                self.error_message.clear();
            }
            Err(err) => {
                self.error_message = format!("{err:#}");
                self.status_message.clear();
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("CSV file:");
            ui.text_edit_singleline(&mut self.input_path);
            if ui.button("Browse").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .set_directory(Self::start_dir())
                    .add_filter("CSV", &["csv"])
                    .pick_file()
            {
                self.input_path = path.to_string_lossy().to_string();
            }
            if ui.button("Config…").clicked() {
                self.config_path = rfd::FileDialog::new()
                    .set_directory(Self::start_dir())
                    .add_filter("JSON", &["json"])
                    .pick_file();
            }
            if let Some(path) = &self.config_path {
                ui.label(path.file_name().map_or_else(String::new, |n| n.to_string_lossy().to_string()));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Chart type:");
            ui.radio_value(&mut self.kind, ChartKind::Line, "Line");
            ui.radio_value(&mut self.kind, ChartKind::Bar, "Bar");
            ui.radio_value(&mut self.kind, ChartKind::Pie, "Pie");

            ui.separator();
            ui.label("Legend:");
            egui::ComboBox::from_id_salt("legend")
                .selected_text(format!("{:?}", self.legend_position))
                .show_ui(ui, |ui| {
                    for pos in [
                        LegendPosition::Bottom,
                        LegendPosition::Right,
                        LegendPosition::Top,
                        LegendPosition::Left,
                        LegendPosition::Hidden,
                    ] {
                        ui.selectable_value(&mut self.legend_position, pos, format!("{pos:?}"));
                    }
                });

            ui.label("Locale:");
            egui::ComboBox::from_id_salt("locale")
                .selected_text(&self.locale)
                .show_ui(ui, |ui| {
                    for tag in ["en", "de", "fr", "es", "it"] {
                        ui.selectable_value(&mut self.locale, tag.to_string(), tag);
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Title:");
            ui.text_edit_singleline(&mut self.title);
            ui.label("X:");
            ui.text_edit_singleline(&mut self.x_label);
            ui.label("Y:");
            ui.text_edit_singleline(&mut self.y_label);
        });

        ui.horizontal(|ui| {
            if ui.button("Load chart").clicked() {
                let result = self.load_chart();
                self.report(result, |_| Some("Chart loaded".to_string()));
            }
            let has_chart = self.viewport.is_some();
            if ui.add_enabled(has_chart, egui::Button::new("Reset zoom")).clicked()
                && let Some(vp) = self.viewport.as_mut()
            {
                vp.restore_auto_bounds();
            }
            if ui.add_enabled(has_chart, egui::Button::new("Save as…")).clicked() {
                let result = self.save_as();
                self.report(result, |p| p.map(|p| format!("Saved {}", p.display())));
            }
        });

        if !self.status_message.is_empty() {
            ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
        }
        if !self.error_message.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.error_message);
        }
    }

    fn chart_view(&mut self, ui: &mut egui::Ui) {
        let Some(viewport) = self.viewport.as_mut() else {
            ui.centered_and_justified(|ui| ui.label("Open a CSV file to see a chart"));
            return;
        };

        let avail = ui.available_size();
        viewport.resize(avail.x.max(1.0) as u32, avail.y.max(1.0) as u32);
        let (rect, response) = ui.allocate_exact_size(avail, egui::Sense::click_and_drag());

        if let Err(err) = viewport.image() {
            self.error_message = format!("Render failed: {err}");
            return;
        }
        let renders = viewport.render_count();
        if (self.texture.is_none() || self.shown_render != renders)
            && let Ok(image) = viewport.image()
        {
            let size = [image.width() as usize, image.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, image.to_rgba().as_raw());
            match self.texture.as_mut() {
                Some(tex) => tex.set(color, egui::TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ui.ctx().load_texture("chart", color, egui::TextureOptions::LINEAR));
                }
            }
            self.shown_render = renders;
        }
        if let Some(tex) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(tex.id(), rect, uv, egui::Color32::WHITE);
        }

        let local = |p: egui::Pos2| ((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.drag_origin = response.interact_pointer_pos();
            self.drag_current = self.drag_origin;
        }
        if let Some(origin) = self.drag_origin {
            if let Some(now) = response.interact_pointer_pos() {
                self.drag_current = Some(now);
            }
            let sel = egui::Rect::from_two_pos(origin, self.drag_current.unwrap_or(origin));
            ui.painter()
                .rect_stroke(sel, 0.0, egui::Stroke::new(1.0, egui::Color32::DARK_BLUE));
            if response.drag_stopped() {
                let (x0, y0) = local(sel.min);
                viewport.zoom_to_rect(Rect::new(x0, y0, sel.width() as f64, sel.height() as f64));
                self.drag_origin = None;
                self.drag_current = None;
            }
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let d = response.drag_delta();
            viewport.pan(d.x as f64, d.y as f64);
        }

        if let Some(pos) = response.hover_pos() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let (x, y) = local(pos);
                viewport.zoom_about(x, y, if scroll > 0.0 { 0.9 } else { 1.1 });
            }
        }

        if response.double_clicked() {
            viewport.restore_auto_bounds();
        } else if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let (x, y) = local(pos);
            let event = viewport.handle_click(x, y);
            if let Some(entity) = event.entity {
                self.status_message = entity
                    .url
                    .or(entity.tooltip)
                    .unwrap_or_else(|| format!("{:?}", entity.kind));
            }
        }

        let tooltip = response
            .hover_pos()
            .and_then(|pos| {
                let (x, y) = local(pos);
                viewport.tooltip_at(x, y).map(str::to_string)
            });
        if let Some(text) = tooltip {
            response.on_hover_text_at_pointer(text);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_view(ui);
        });
    }
}
