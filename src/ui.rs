#![cfg(feature = "gui")]

use crate::dashboard::{render_category_analytics_at, ChartLayout, ChartSurfaces};
use crate::format::format_display;
use crate::model::Rgb;
use crate::parse::{read_category, CategoryLoad, MalformedMode};
use crate::surface::{DrawingSurface, Font, Paint, Wedge};
use chrono::Local;
use eframe::{egui, App};
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;
use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;
use tracing::warn;

pub fn launch() -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions::default();
    // eframe::Error is not Send + Sync, so it goes through a string
    eframe::run_native(
        "Event Analyzer",
        native_options,
        Box::new(|_cc| Ok(Box::<GuiApp>::default())),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

/// egui paints in points and handles pixel density itself, so scaling is a no-op here.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
}

impl PainterSurface<'_> {
    fn pos(&self, x: f64, y: f64) -> Pos2 {
        self.rect.min + Vec2::new(x as f32, y as f32)
    }
}

fn color32(paint: Paint) -> Color32 {
    let Rgb(r, g, b) = paint.color;
    Color32::from_rgba_unmultiplied(r, g, b, (paint.alpha * 255.0).round() as u8)
}

impl DrawingSurface for PainterSurface<'_> {
    fn width(&self) -> f64 { f64::from(self.rect.width()) }
    fn height(&self) -> f64 { f64::from(self.rect.height()) }
    fn resize_backing(&mut self, _width: f64, _height: f64) {}
    fn set_scale(&mut self, _factor: f64) {}

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, paint: Paint) {
        self.painter.text(self.pos(x, y), Align2::LEFT_BOTTOM, text, FontId::proportional(font.size as f32), color32(paint));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        let rect = Rect::from_min_size(self.pos(x, y), Vec2::new(w as f32, h as f32));
        self.painter.rect_filled(rect, 0.0, color32(paint));
    }

    fn fill_wedge(&mut self, wedge: Wedge, paint: Paint) {
        // convex_polygon needs convex pieces, so wide wedges are drawn in quarter-turn slices
        let slices = (wedge.sweep().abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = wedge.sweep() / slices as f64;
        for i in 0..slices {
            let start = wedge.start + step * i as f64;
            let piece = Wedge { start, end: start + step, ..wedge };
            let points: Vec<Pos2> = piece.outline().into_iter().map(|(x, y)| self.pos(x, y)).collect();
            self.painter.add(Shape::convex_polygon(points, color32(paint), Stroke::NONE));
        }
    }
}

#[derive(Default)]
struct GuiApp {
    file: Option<PathBuf>,
    load: Option<CategoryLoad>,
    info_text: String,
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading(RichText::new("Event Analyzer").size(24.0));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open category...").clicked() {
                    if let Some(p) = FileDialog::new()
                        .add_filter("Category", &["json", "txt", "events", "log"])
                        .pick_file()
                    {
                        self.open(p);
                    }
                }
                if let Some(f) = &self.file {
                    ui.label(f.display().to_string());
                }
            });

            if !self.info_text.is_empty() {
                ui.label(self.info_text.clone());
            }

            let Some(load) = &self.load else { return };
            let category = &load.category;
            let now = Local::now().naive_local();

            ui.separator();
            ui.label(RichText::new(&category.name).strong().size(18.0));
            ui.label(format!("Events: {} | Skipped: {}", category.events.len(), load.malformed));

            if category.events.is_empty() {
                ui.label("No events logged yet.");
                return;
            }

            let layout = ChartLayout::default();
            let size = |(w, h): (u32, u32)| Vec2::new(w as f32, h as f32);
            let (stats_resp, stats_painter) = ui.allocate_painter(size(layout.stats), Sense::hover());
            let (tod_resp, tod_painter) = ui.allocate_painter(size(layout.time_of_day), Sense::hover());
            let (dow_resp, dow_painter) = ui.allocate_painter(size(layout.day_of_week), Sense::hover());

            let mut stats = PainterSurface { painter: &stats_painter, rect: stats_resp.rect };
            let mut tod = PainterSurface { painter: &tod_painter, rect: tod_resp.rect };
            let mut dow = PainterSurface { painter: &dow_painter, rect: dow_resp.rect };
            let surfaces = ChartSurfaces { stats: &mut stats, time_of_day: &mut tod, day_of_week: &mut dow };
            if let Err(e) = render_category_analytics_at(category, category.color.rgb(), surfaces, now) {
                warn!("render failed: {e}");
            }

            ui.add_space(12.0);
            ui.label(RichText::new("Entries").strong());
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::remainder())
                .body(|mut body| {
                    for event in category.events_newest_first() {
                        body.row(20.0, |mut row| {
                            row.col(|ui| {
                                ui.label(format_display(event.timestamp, now));
                            });
                        });
                    }
                });
        });
    }
}

impl GuiApp {
    fn open(&mut self, path: PathBuf) {
        self.info_text.clear();
        match read_category(&path, MalformedMode::Skip) {
            Ok(load) => self.load = Some(load),
            Err(e) => {
                self.load = None;
                self.info_text = format!("Read error: {e}");
            }
        }
        self.file = Some(path);
    }
}
