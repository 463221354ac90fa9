use crate::model::Rgb;
use crate::surface::{DrawCommand, DrawingSurface, Font, FontWeight, Paint, RecordingSurface, Wedge};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Surface that buffers paint commands and rasterizes them to a PNG on [`PngSurface::save`].
pub struct PngSurface {
    inner: RecordingSurface,
}

impl PngSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { inner: RecordingSurface::new(f64::from(width), f64::from(height)) }
    }

    /// `device_ratio` of 2.0 doubles the pixel count, like a retina canvas.
    pub fn with_device_ratio(width: u32, height: u32, device_ratio: f64) -> Self {
        Self {
            inner: RecordingSurface::new(f64::from(width), f64::from(height)).with_pixel_ratio(device_ratio, 1.0),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] { self.inner.commands() }

    pub fn save(&self, path: &Path) -> Result<()> {
        let (bw, bh) = self.inner.backing_size();
        let root = BitMapBackend::new(path, (bw.round() as u32, bh.round() as u32)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut scale = 1.0;
        let at = |scale: f64, x: f64, y: f64| ((x * scale).round() as i32, (y * scale).round() as i32);
        for cmd in self.inner.commands() {
            match cmd {
                DrawCommand::ResizeBacking { .. } => {}
                DrawCommand::Scale(f) => scale = *f,
                DrawCommand::Text { text, x, y, font, paint } => {
                    let style = text_style(*font, *paint, scale);
                    root.draw_text(text, &style, at(scale, *x, *y))?;
                }
                DrawCommand::Rect { x, y, w, h, paint } => {
                    if *w <= 0.0 || *h <= 0.0 { continue; }
                    let corners = [at(scale, *x, *y), at(scale, x + w, y + h)];
                    root.draw(&Rectangle::new(corners, color(*paint).filled()))?;
                }
                DrawCommand::Wedge { wedge, paint } => {
                    if wedge.sweep() == 0.0 { continue; }
                    let points: Vec<(i32, i32)> = wedge.outline().into_iter().map(|(x, y)| at(scale, x, y)).collect();
                    root.draw(&Polygon::new(points, color(*paint).filled()))?;
                }
            }
        }

        root.present()?;
        Ok(())
    }
}

fn color(paint: Paint) -> RGBAColor {
    let Rgb(r, g, b) = paint.color;
    RGBColor(r, g, b).mix(paint.alpha)
}

fn text_style(font: Font, paint: Paint, scale: f64) -> TextStyle<'static> {
    let style = match font.weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    };
    // canvas text is anchored on its baseline-left corner
    ("sans-serif", font.size * scale)
        .into_font()
        .style(style)
        .color(&color(paint))
        .pos(Pos::new(HPos::Left, VPos::Bottom))
}

impl DrawingSurface for PngSurface {
    fn width(&self) -> f64 { self.inner.width() }
    fn height(&self) -> f64 { self.inner.height() }
    fn device_pixel_ratio(&self) -> f64 { self.inner.device_pixel_ratio() }
    fn backing_store_ratio(&self) -> f64 { self.inner.backing_store_ratio() }
    fn resize_backing(&mut self, width: f64, height: f64) { self.inner.resize_backing(width, height) }
    fn set_scale(&mut self, factor: f64) { self.inner.set_scale(factor) }
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, paint: Paint) {
        self.inner.fill_text(text, x, y, font, paint)
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) { self.inner.fill_rect(x, y, w, h, paint) }
    fn fill_wedge(&mut self, wedge: Wedge, paint: Paint) { self.inner.fill_wedge(wedge, paint) }
}
