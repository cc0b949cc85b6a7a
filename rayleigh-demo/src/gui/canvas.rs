use egui::{Align2, Color32, FontId, Painter, Pos2, Stroke};
use rayleigh_core::math::Point;
use rayleigh_core::render::{Canvas, CircleStyle, Rgb};

/// [`Canvas`] over an egui painter; playfield (0, 0) maps to `origin`.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    font: FontId,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2, font_size: f32) -> Self {
        Self {
            painter,
            origin,
            font: FontId::proportional(font_size),
        }
    }

    fn to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            self.origin.x + point.x as f32,
            self.origin.y + point.y as f32,
        )
    }
}

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

impl Canvas for EguiCanvas<'_> {
    fn clear(&mut self, rgb: Rgb) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, color(rgb));
    }

    fn draw_line(&mut self, from: Point, to: Point, rgb: Rgb, width: f32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(width, color(rgb)),
        );
    }

    fn draw_circle(&mut self, center: Point, radius: f64, rgb: Rgb, style: CircleStyle) {
        let center = self.to_screen(center);
        match style {
            CircleStyle::Filled => self.painter.circle_filled(center, radius as f32, color(rgb)),
            CircleStyle::Stroked(width) => {
                self.painter
                    .circle_stroke(center, radius as f32, Stroke::new(width, color(rgb)))
            }
        };
    }

    fn draw_text(&mut self, text: &str, anchor: Point, rgb: Rgb) {
        self.painter.text(
            self.to_screen(anchor),
            Align2::CENTER_CENTER,
            text,
            self.font.clone(),
            color(rgb),
        );
    }
}
