#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, VLine};
use image::GenericImageView;
use rfd::FileDialog;
use std::io::{BufWriter, Write};
use std::{env, fs, path::Path};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleet_replacement_toolbox::{
    config,
    cost_model::{self, FleetAnalysis, FleetParameters, ValidationError},
    i18n::{self, keys},
    report,
};

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fleet_replacement_toolbox=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko-kr)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1100.0, 720.0))
        .with_transparent(true);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let app_cfg = config::load_or_default().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        config::Config::default()
    });
    let lang = i18n::resolve_language(
        cli_lang.as_deref().unwrap_or("auto"),
        Some(app_cfg.language.as_str()),
    );
    eframe::run_native(
        "Fleet Replacement Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                warn!("font setup: {e}");
            }
            Box::new(GuiApp::new(app_cfg, &lang))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.label(text).on_hover_text(tip)
}

/// 바이너리 폰트 바이트를 egui 기본 폰트 앞에 등록한다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 시스템 폰트를 찾아 등록한다. 못 찾으면 egui 기본 폰트를 유지한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for name in ["malgun.ttf", "gulim.ttc", "batang.ttc"] {
            candidates.push(fonts.join(name));
        }
    }
    for p in [
        "assets/fonts/malgun.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    ] {
        candidates.push(p.into());
    }
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "cjk_font");
            return Ok(());
        }
    }
    Err("No CJK font found; Korean text may not render. Set a font file in settings.".into())
}

/// 사용자가 선택한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("Font file not found: {path}"));
    }
    let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

/// 창 투명도 허용 범위.
const ALPHA_RANGE: std::ops::RangeInclusive<f32> = 0.3..=1.0;

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return *ALPHA_RANGE.end();
    }
    alpha.clamp(*ALPHA_RANGE.start(), *ALPHA_RANGE.end())
}

/// 원래 배경색에 투명도를 적용한다. 매 프레임 원본에서 계산해 누적되지 않는다.
fn faded_fills(base: (egui::Color32, egui::Color32), alpha: f32) -> (egui::Color32, egui::Color32) {
    let alpha = clamp_alpha(alpha);
    (base.0.linear_multiply(alpha), base.1.linear_multiply(alpha))
}

fn write_csv_file(path: &Path, analysis: &FleetAnalysis) -> Result<(), report::ReportError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    report::write_csv(&mut out, &analysis.curves)?;
    out.flush()?;
    Ok(())
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    params: FleetParameters,
    samples: usize,
    analysis: Result<FleetAnalysis, ValidationError>,
    computed_for: Option<(FleetParameters, usize)>,
    // 설정
    lang_input: String,
    currency_input: String,
    custom_font_path: String,
    font_status: Option<String>,
    settings_status: Option<String>,
    export_status: Option<String>,
    window_alpha: f32,
    /// 투명도 적용 전 (window_fill, panel_fill)
    base_fills: Option<(egui::Color32, egui::Color32)>,
    ui_scale: f32,
    show_settings_modal: bool,
    show_help_modal: bool,
}

impl GuiApp {
    fn new(config: config::Config, lang: &str) -> Self {
        let tr = i18n::Translator::new_with_pack(lang, config.language_pack_dir.as_deref());
        let samples = config.sample_count.max(1);
        let params = FleetParameters::default();
        let analysis = cost_model::analyze(&params, samples);
        Self {
            lang_input: config.language.clone(),
            currency_input: config.currency_symbol.clone(),
            window_alpha: clamp_alpha(config.window_alpha),
            base_fills: None,
            computed_for: Some((params.clone(), samples)),
            config,
            tr,
            params,
            samples,
            analysis,
            custom_font_path: String::new(),
            font_status: None,
            settings_status: None,
            export_status: None,
            ui_scale: 1.0,
            show_settings_modal: false,
            show_help_modal: false,
        }
    }

    /// 입력이 바뀌었을 때만 곡선을 다시 계산한다.
    fn refresh(&mut self) {
        let inputs = (self.params.clone(), self.samples);
        if self.computed_for.as_ref() == Some(&inputs) {
            return;
        }
        self.analysis = cost_model::analyze(&self.params, self.samples);
        if let Err(e) = &self.analysis {
            info!(error = %e, "parameters rejected");
        }
        self.computed_for = Some(inputs);
    }

    fn reset_parameters(&mut self) {
        self.params = FleetParameters::default();
        self.samples = self.config.sample_count.max(1);
    }

    fn summary_text(&self) -> Option<String> {
        self.analysis
            .as_ref()
            .ok()
            .map(|a| report::summary_sentence(a, &self.config.currency_symbol, &self.tr))
    }

    /// 좌측 입력 폼.
    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::INPUT_HEADING));
        ui.add_space(8.0);
        let currency = self.config.currency_symbol.clone();
        egui::Grid::new("fleet_inputs")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                let money_rows: [(&str, &mut f64, f64); 3] = [
                    (keys::INPUT_COST_PER_REPAIR, &mut self.params.cost_per_repair, 10.0),
                    (
                        keys::INPUT_NON_AVAILABILITY,
                        &mut self.params.non_availability_cost_per_day,
                        5.0,
                    ),
                    (keys::INPUT_NEW_CAR, &mut self.params.cost_of_new_car, 100.0),
                ];
                for (key, value, speed) in money_rows {
                    ui.label(tr.t(key));
                    ui.add(
                        egui::DragValue::new(value)
                            .speed(speed)
                            .clamp_range(0.0..=f64::MAX)
                            .prefix(currency.as_str()),
                    );
                    ui.end_row();
                }
                for (key, value) in [
                    (keys::INPUT_PREDICTED, &mut self.params.predicted_repairs_per_year),
                    (keys::INPUT_UNPREDICTED, &mut self.params.unpredicted_repairs_per_year),
                ] {
                    ui.label(tr.t(key));
                    ui.add(
                        egui::DragValue::new(value)
                            .speed(0.1)
                            .clamp_range(0.0..=f64::MAX),
                    );
                    ui.end_row();
                }
                ui.label(tr.t(keys::INPUT_CARS));
                ui.add(
                    egui::DragValue::new(&mut self.params.number_of_cars)
                        .speed(1.0)
                        .clamp_range(1..=u32::MAX),
                );
                ui.end_row();
                ui.label(tr.t(keys::INPUT_LIFETIME));
                ui.add(
                    egui::DragValue::new(&mut self.params.expected_lifetime_years)
                        .speed(0.5)
                        .clamp_range(1.0..=f64::MAX),
                );
                ui.end_row();
            });
        ui.add_space(8.0);
        if ui.button(tr.t(keys::INPUT_RESET)).clicked() {
            self.reset_parameters();
        }
    }

    /// 본문: 차트와 요약 문장.
    fn ui_chart(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::CHART_TITLE));
        let analysis = match &self.analysis {
            Ok(a) => a,
            Err(e) => {
                ui.colored_label(
                    egui::Color32::RED,
                    format!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
                );
                return;
            }
        };
        let curves = &analysis.curves;
        let series = |ys: &[f64]| -> PlotPoints {
            curves
                .years
                .iter()
                .zip(ys)
                .map(|(&x, &y)| [x, y])
                .collect()
        };
        let marker = report::optimal_marker_label(analysis, &tr);
        let optimal_year = analysis.optimum.year;
        Plot::new("fleet_cost_plot")
            .legend(Legend::default())
            .x_axis_label(tr.t(keys::CHART_X_AXIS))
            .y_axis_label(format!(
                "{} ({})",
                tr.t(keys::CHART_Y_AXIS),
                self.config.currency_symbol
            ))
            .height((ui.available_height() - 48.0).max(240.0))
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(series(&curves.total_repair_cost)).name(tr.t(keys::SERIES_REPAIR)));
                plot_ui.line(
                    Line::new(series(&curves.preventive_cost)).name(tr.t(keys::SERIES_PREVENTION)),
                );
                plot_ui.line(
                    Line::new(series(&curves.cumulative_cost)).name(tr.t(keys::SERIES_CUMULATIVE)),
                );
                plot_ui.vline(
                    VLine::new(optimal_year)
                        .color(egui::Color32::RED)
                        .style(LineStyle::dashed_loose())
                        .name(marker),
                );
            });
        ui.add_space(8.0);
        if let Some(text) = self.summary_text() {
            ui.label(egui::RichText::new(text).strong());
        }
    }

    fn export_csv(&mut self) {
        let txt = |key: &str, default: &str| self.tr.lookup(key).unwrap_or_else(|| default.to_string());
        let Ok(analysis) = &self.analysis else {
            self.export_status = Some(txt("gui.export.invalid", "Fix the inputs before exporting."));
            return;
        };
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("fleet_costs.csv")
            .save_file()
        else {
            return;
        };
        self.export_status = Some(match write_csv_file(&path, analysis) {
            Ok(()) => {
                info!(path = %path.display(), "csv exported");
                format!("{} {}", txt("gui.export.saved", "Saved:"), path.display())
            }
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        let mut open = self.show_settings_modal;
        egui::Window::new(txt("gui.settings.title", "Settings"))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(txt("gui.settings.lang", "Language"));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.lang_input, "auto".into(), txt("gui.settings.lang_auto", "System"));
                        ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                        ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                    });
                ui.separator();
                label_with_tip(
                    ui,
                    &txt("gui.settings.currency", "Currency symbol"),
                    &txt("gui.settings.currency_tip", "Prefix used for amounts in the summary and form."),
                );
                ui.text_edit_singleline(&mut self.currency_input);
                label_with_tip(
                    ui,
                    &txt("gui.settings.samples", "Samples on time axis"),
                    &txt("gui.settings.samples_tip", "Number of evenly spaced points between year 1 and the horizon."),
                );
                ui.add(egui::DragValue::new(&mut self.samples).clamp_range(1..=10_000));
                ui.separator();
                ui.label(txt("gui.settings.ui_scale", "UI scale"));
                if ui
                    .add(egui::Slider::new(&mut self.ui_scale, 0.8..=1.6).suffix(" x"))
                    .changed()
                {
                    ctx.set_pixels_per_point(self.ui_scale);
                }
                ui.label(txt("gui.settings.alpha", "Window transparency"));
                ui.add(egui::Slider::new(&mut self.window_alpha, ALPHA_RANGE).text("alpha"));
                ui.separator();
                ui.label(txt("gui.settings.font", "Font file (.ttf/.ttc)"));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.custom_font_path);
                    if ui.button(txt("gui.settings.font_load", "Load")).clicked() {
                        self.font_status = Some(match load_custom_font(ctx, &self.custom_font_path) {
                            Ok(()) => txt("gui.settings.font_loaded", "Font loaded."),
                            Err(e) => e,
                        });
                    }
                });
                if let Some(msg) = &self.font_status {
                    ui.small(msg);
                }
                ui.separator();
                if ui.button(txt("gui.settings.save", "Save settings")).clicked() {
                    self.apply_settings();
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
    }

    /// 설정 창의 값을 Config에 반영하고 저장한다. 번역기도 즉시 교체한다.
    fn apply_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.config.currency_symbol = self.currency_input.clone();
        self.config.sample_count = self.samples;
        self.config.window_alpha = clamp_alpha(self.window_alpha);
        let resolved = i18n::resolve_language(&self.config.language, None);
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
        self.settings_status = Some(match self.config.save() {
            Ok(()) => self
                .tr
                .lookup("gui.settings.saved")
                .unwrap_or_else(|| "Saved.".into()),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_help(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        egui::Window::new(txt("gui.about.title", "Help / About"))
            .collapsible(false)
            .resizable(true)
            .open(&mut self.show_help_modal)
            .show(ctx, |ui| {
                ui.style_mut().wrap = Some(true);
                ui.heading(txt("gui.about.app", "Fleet replacement cost calculator"));
                ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.label(txt("gui.formula.repair", "Repair cost = (predicted + unpredicted) × cost per repair × t"));
                ui.label(txt("gui.formula.downtime", "Non-availability = (predicted + unpredicted) × cost per day × 1 day × t"));
                ui.label(txt("gui.formula.prevention", "Prevention cost = cost of new car / t"));
                ui.label(txt("gui.formula.cumulative", "Cumulative = repair + non-availability + prevention, × number of cars"));
                ui.label(txt("gui.formula.optimum", "The optimum is the first sample with the lowest cumulative cost."));
            });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.refresh();

        let mut style = (*ctx.style()).clone();
        let base = *self
            .base_fills
            .get_or_insert((style.visuals.window_fill, style.visuals.panel_fill));
        (style.visuals.window_fill, style.visuals.panel_fill) = faded_fills(base, self.window_alpha);
        ctx.set_style(style);

        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(txt("gui.export.button", "Export CSV")).clicked() {
                    self.export_csv();
                }
                if ui.button(txt("gui.settings.title", "Settings")).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(txt("gui.about.title", "Help / About")).clicked() {
                    self.show_help_modal = true;
                }
                if let Some(msg) = &self.export_status {
                    ui.small(msg);
                }
            });
        });

        if self.show_settings_modal {
            self.ui_settings(ctx);
        }
        if self.show_help_modal {
            self.ui_help(ctx);
        }

        egui::SidePanel::left("inputs")
            .resizable(true)
            .min_width(220.0)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.ui_inputs(ui));
            });

        // 폼 변경이 같은 프레임의 차트에 반영되도록 다시 확인한다.
        self.refresh();

        egui::CentralPanel::default().show(ctx, |ui| self.ui_chart(ui));
    }
}
