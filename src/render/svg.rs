//! Standalone SVG export.
//!
//! Tooltip groups are hidden by CSS and shown only with `:target`. Clicking a
//! circle (a link to its panel) opens exactly one panel at a time, and the
//! panel's close link clears the fragment. The document fragment is the only
//! open-state, so every panel starts closed.

use std::fmt::Write as _;

use super::color::{self, Rgba};
use super::scene::{DrawSurface, Scene, TextPair, TooltipPanel, ViewBox};
use super::tooltip::TooltipState;

const STYLE: &str = "\
.tooltip{display:none}\
.tooltip:target{display:inline}\
text{font-family:sans-serif;font-size:12px}\
.title{font-weight:bold;font-size:14px}\
.value{font-weight:bold}\
a circle{cursor:pointer}";

/// Accumulates SVG markup from scene replay.
pub struct SvgDocument {
    out: String,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a scene to a complete SVG document with all tooltips closed.
pub fn render_svg(scene: &Scene) -> String {
    let mut doc = SvgDocument::new();
    scene.draw(&mut doc, &TooltipState::new());
    doc.finish()
}

impl DrawSurface for SvgDocument {
    fn view_box(&mut self, view: ViewBox, background: Rgba) {
        let _ = writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = num(view.width),
            h = num(view.height),
        );
        let _ = writeln!(self.out, "<style>{}</style>", STYLE);
        let _ = writeln!(
            self.out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            background.to_hex()
        );
    }

    fn circle(&mut self, id: usize, (cx, cy): (f64, f64), radius: f64, fill: Rgba) {
        let _ = writeln!(
            self.out,
            r##"<a href="#tooltip-{id}"><circle id="neo-{id}" cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.85"/></a>"##,
            num(cx),
            num(cy),
            num(radius),
            fill.to_hex(),
        );
    }

    fn line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), stroke: Rgba, dashed: bool) {
        let dash = if dashed { r#" stroke-dasharray="4 4""# } else { "" };
        let _ = writeln!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{}/>"#,
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            stroke.to_hex(),
            dash,
        );
    }

    fn text_pair(&mut self, text: &TextPair) {
        write_text_pair(&mut self.out, text);
    }

    fn tooltip(&mut self, panel: &TooltipPanel, _visible: bool) {
        let _ = writeln!(self.out, r#"<g id="tooltip-{}" class="tooltip">"#, panel.id);
        let _ = writeln!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="6" fill="{}" fill-opacity="{:.2}" stroke="{}"/>"#,
            num(panel.x),
            num(panel.y),
            num(panel.width),
            num(panel.height),
            color::PANEL.to_hex(),
            color::PANEL.opacity(),
            color::PANEL_BORDER.to_hex(),
        );
        let _ = writeln!(
            self.out,
            r#"<text class="title" x="{}" y="{}" fill="{}">{}</text>"#,
            num(panel.x + 10.0),
            num(panel.y + 24.0),
            color::PANEL_TEXT.to_hex(),
            escape(&panel.title),
        );
        let _ = writeln!(
            self.out,
            r##"<a href="#"><text x="{}" y="{}" fill="{}">×</text></a>"##,
            num(panel.x + panel.width - 18.0),
            num(panel.y + 20.0),
            color::PANEL_TEXT.to_hex(),
        );
        for row in &panel.rows {
            write_text_pair(&mut self.out, row);
        }
        self.out.push_str("</g>\n");
    }
}

fn write_text_pair(out: &mut String, text: &TextPair) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" fill="{}">{}"#,
        num(text.x),
        num(text.y),
        text.color.to_hex(),
        escape(&text.label),
    );
    if !text.value.is_empty() {
        let _ = write!(
            out,
            r#"<tspan class="value" x="{}">{}</tspan>"#,
            num(text.x + text.value_dx),
            escape(&text.value),
        );
    }
    out.push_str("</text>\n");
}

/// Coordinates with at most one decimal, no trailing `.0`.
fn num(v: f64) -> String {
    let rounded = (v * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
