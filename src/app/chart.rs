//! Chart area for `NeoApp`.
//!
//! Replays the scene into the egui painter, scaled to fit the panel, and
//! turns clicks into tooltip toggles.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use neo_viz::render::color::{self, Rgba};
use neo_viz::render::scene::{DrawSurface, TextPair, TooltipPanel, ViewBox};

use super::NeoApp;

/// Maps view-box coordinates into the allocated screen rect.
struct ChartTransform {
    origin: Pos2,
    scale: f32,
}

impl ChartTransform {
    fn fit(rect: Rect, view: ViewBox) -> Self {
        let scale = (rect.width() / view.width as f32)
            .min(rect.height() / view.height as f32)
            .max(0.01);
        let used = egui::vec2(view.width as f32 * scale, view.height as f32 * scale);
        let origin = rect.min + (rect.size() - used) / 2.0;
        Self { origin, scale }
    }

    fn to_screen(&self, (x, y): (f64, f64)) -> Pos2 {
        self.origin + egui::vec2(x as f32 * self.scale, y as f32 * self.scale)
    }

    fn to_view(&self, pos: Pos2) -> (f64, f64) {
        let local = (pos - self.origin) / self.scale;
        (local.x as f64, local.y as f64)
    }
}

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// egui implementation of the scene surface.
struct PainterSurface<'a> {
    painter: &'a Painter,
    transform: &'a ChartTransform,
}

impl PainterSurface<'_> {
    fn font(&self, size: f32) -> FontId {
        FontId::proportional((size * self.transform.scale).max(6.0))
    }

    fn paint_text_pair(&self, text: &TextPair, size: f32) {
        let pos = self.transform.to_screen((text.x, text.y));
        self.painter.text(pos, Align2::LEFT_BOTTOM, &text.label, self.font(size), color32(text.color));
        if !text.value.is_empty() {
            let value_pos = self.transform.to_screen((text.x + text.value_dx, text.y));
            self.painter.text(
                value_pos,
                Align2::LEFT_BOTTOM,
                &text.value,
                self.font(size),
                color32(text.color),
            );
        }
    }
}

impl DrawSurface for PainterSurface<'_> {
    fn view_box(&mut self, view: ViewBox, background: Rgba) {
        let rect = Rect::from_two_pos(
            self.transform.to_screen((0.0, 0.0)),
            self.transform.to_screen((view.width, view.height)),
        );
        self.painter.rect_filled(rect, 0.0, color32(background));
    }

    fn circle(&mut self, _id: usize, center: (f64, f64), radius: f64, fill: Rgba) {
        let c = self.transform.to_screen(center);
        let r = radius as f32 * self.transform.scale;
        self.painter.circle_filled(c, r, color32(fill).gamma_multiply(0.85));
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Rgba, dashed: bool) {
        let points = [self.transform.to_screen(from), self.transform.to_screen(to)];
        let stroke = Stroke::new(1.0, color32(stroke));
        if dashed {
            self.painter
                .extend(egui::Shape::dashed_line(&points, stroke, 4.0, 4.0));
        } else {
            self.painter.line_segment(points, stroke);
        }
    }

    fn text_pair(&mut self, text: &TextPair) {
        self.paint_text_pair(text, 12.0);
    }

    fn tooltip(&mut self, panel: &TooltipPanel, visible: bool) {
        if !visible {
            return;
        }
        let rect = Rect::from_min_max(
            self.transform.to_screen((panel.x, panel.y)),
            self.transform.to_screen((panel.x + panel.width, panel.y + panel.height)),
        );
        self.painter.rect(
            rect,
            6.0,
            color32(color::PANEL),
            Stroke::new(1.0, color32(color::PANEL_BORDER)),
        );
        self.painter.text(
            self.transform.to_screen((panel.x + 10.0, panel.y + 24.0)),
            Align2::LEFT_BOTTOM,
            &panel.title,
            self.font(14.0),
            color32(color::PANEL_TEXT),
        );
        for row in &panel.rows {
            self.paint_text_pair(row, 12.0);
        }
    }
}

impl NeoApp {
    /// Spinner, error panel, or the chart itself.
    pub fn draw_chart(&mut self, ui: &mut egui::Ui) {
        if let Some(ref err) = self.error {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.colored_label(Color32::from_rgb(230, 90, 80), format!("Could not load close approaches: {}", err));
                ui.label("Check the network connection and press Reload.");
            });
            return;
        }

        let Some(ref scene) = self.scene else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let transform = ChartTransform::fit(response.rect, scene.view_box);

        let mut surface = PainterSurface {
            painter: &painter,
            transform: &transform,
        };
        scene.draw(&mut surface, &self.tooltips);

        if scene.circle_count() == 0 {
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                "No objects within the display threshold",
                FontId::proportional(16.0),
                color32(color::LABEL),
            );
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = transform.to_view(pos);
                match scene.hit_test(x, y) {
                    Some(id) => self.tooltips.toggle(id),
                    None => self.tooltips.hide(),
                }
            }
        }
    }
}
