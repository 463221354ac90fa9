//! The drawing target the chart renderer paints on.
//!
//! Coordinates are logical (CSS-like) pixels with the origin at the top-left
//! corner and y growing downward. A surface may keep a larger backing buffer
//! for high-density displays; the renderer never sees it except through
//! [`DrawingSurface::resize_backing`] and [`DrawingSurface::set_scale`].

use crate::model::Rgb;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight { Normal, Bold }

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub size: f64,
    pub weight: FontWeight,
}

impl Font {
    pub const fn px(size: f64) -> Self { Self { size, weight: FontWeight::Normal } }

    pub const fn bold(self) -> Self { Self { size: self.size, weight: FontWeight::Bold } }
}

/// Fill color plus opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f64,
}

impl Paint {
    pub const fn solid(color: Rgb) -> Self { Self { color, alpha: 1.0 } }

    pub fn with_alpha(self, alpha: f64) -> Self { Self { alpha: alpha.clamp(0.0, 1.0), ..self } }
}

/// A pie slice. Angles are radians; increasing angle turns clockwise on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wedge {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
}

impl Wedge {
    pub fn sweep(&self) -> f64 { self.end - self.start }

    /// Polygon approximation: the center followed by points along the arc.
    /// Arcs get at least one segment per 2 degrees.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let sweep = self.sweep();
        let steps = ((sweep.abs() / (PI / 90.0)).ceil() as usize).max(1);
        let mut pts = Vec::with_capacity(steps + 2);
        pts.push((self.cx, self.cy));
        for i in 0..=steps {
            let a = self.start + sweep * i as f64 / steps as f64;
            pts.push((self.cx + self.radius * a.cos(), self.cy + self.radius * a.sin()));
        }
        pts
    }
}

pub trait DrawingSurface {
    /// Logical width; never changed by scaling.
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn device_pixel_ratio(&self) -> f64 { 1.0 }
    fn backing_store_ratio(&self) -> f64 { 1.0 }
    /// Resize the backing buffer (device pixels) without touching the logical size.
    fn resize_backing(&mut self, width: f64, height: f64);
    /// Replace the current scale transform.
    fn set_scale(&mut self, factor: f64);
    /// Draw text with its baseline-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, paint: Paint);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint);
    fn fill_wedge(&mut self, wedge: Wedge, paint: Paint);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    ResizeBacking { width: f64, height: f64 },
    Scale(f64),
    Text { text: String, x: f64, y: f64, font: Font, paint: Paint },
    Rect { x: f64, y: f64, w: f64, h: f64, paint: Paint },
    Wedge { wedge: Wedge, paint: Paint },
}

/// In-memory surface that keeps every command it receives.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    device_ratio: f64,
    backing_ratio: f64,
    backing: (f64, f64),
    scale: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_ratio: 1.0,
            backing_ratio: 1.0,
            backing: (width, height),
            scale: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn with_pixel_ratio(mut self, device: f64, backing: f64) -> Self {
        self.device_ratio = device;
        self.backing_ratio = backing;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    pub fn backing_size(&self) -> (f64, f64) { self.backing }

    pub fn scale(&self) -> f64 { self.scale }

    /// Drops recorded paint commands, keeping size and transform.
    pub fn clear(&mut self) { self.commands.clear(); }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn wedges(&self) -> Vec<(Wedge, Paint)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Wedge { wedge, paint } => Some((*wedge, *paint)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(f64, f64, f64, f64, Paint)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { x, y, w, h, paint } => Some((*x, *y, *w, *h, *paint)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> f64 { self.width }
    fn height(&self) -> f64 { self.height }
    fn device_pixel_ratio(&self) -> f64 { self.device_ratio }
    fn backing_store_ratio(&self) -> f64 { self.backing_ratio }

    fn resize_backing(&mut self, width: f64, height: f64) {
        self.backing = (width, height);
        self.commands.push(DrawCommand::ResizeBacking { width, height });
    }

    fn set_scale(&mut self, factor: f64) {
        self.scale = factor;
        self.commands.push(DrawCommand::Scale(factor));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, paint: Paint) {
        self.commands.push(DrawCommand::Text { text: text.to_string(), x, y, font, paint });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        self.commands.push(DrawCommand::Rect { x, y, w, h, paint });
    }

    fn fill_wedge(&mut self, wedge: Wedge, paint: Paint) {
        self.commands.push(DrawCommand::Wedge { wedge, paint });
    }
}
