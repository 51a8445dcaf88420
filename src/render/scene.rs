//! Laid-out records → ordered shape commands.
//!
//! A [`Scene`] is independent of the display technology: the SVG writer and
//! the egui chart both replay it through [`DrawSurface`].

use chrono::NaiveDate;

use super::color::{self, Rgba};
use super::layout::{y_position, Placement};
use super::tooltip::TooltipState;
use crate::config::{VizConfig, LANE_COUNT, MAX_GRID_LINES};
use crate::transform::NeoRecord;

/// Space around the plot; wide enough for the largest radius bucket.
pub const PLOT_MARGIN: f64 = 80.0;

const PANEL_WIDTH: f64 = 290.0;
const PANEL_PADDING: f64 = 10.0;
const ROW_HEIGHT: f64 = 18.0;
const VALUE_OFFSET: f64 = 120.0;
const PANEL_GAP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

/// A label with its value drawn `value_dx` to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPair {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub value: String,
    pub value_dx: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// One object, keyed by record id for click handling
    Circle {
        id: usize,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Rgba,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Rgba,
        dashed: bool,
    },
    Text(TextPair),
}

/// Details panel for one record, hidden until its circle is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipPanel {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub rows: Vec<TextPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view_box: ViewBox,
    pub background: Rgba,
    pub shapes: Vec<Shape>,
    pub tooltips: Vec<TooltipPanel>,
}

/// Receiver for scene replay.
pub trait DrawSurface {
    fn view_box(&mut self, view: ViewBox, background: Rgba);
    fn circle(&mut self, id: usize, center: (f64, f64), radius: f64, fill: Rgba);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Rgba, dashed: bool);
    fn text_pair(&mut self, text: &TextPair);
    fn tooltip(&mut self, panel: &TooltipPanel, visible: bool);
}

impl Scene {
    /// Replay every command in order, tooltips last so they sit on top.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, tooltips: &TooltipState) {
        surface.view_box(self.view_box, self.background);
        for shape in &self.shapes {
            match shape {
                Shape::Circle { id, cx, cy, r, fill } => surface.circle(*id, (*cx, *cy), *r, *fill),
                Shape::Line { from, to, stroke, dashed } => surface.line(*from, *to, *stroke, *dashed),
                Shape::Text(text) => surface.text_pair(text),
            }
        }
        for panel in &self.tooltips {
            surface.tooltip(panel, tooltips.is_visible(panel.id));
        }
    }

    /// Topmost circle containing the point, in view-box coordinates.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.shapes.iter().rev().find_map(|shape| match shape {
            Shape::Circle { id, cx, cy, r, .. } => {
                let (dx, dy) = (x - cx, y - cy);
                (dx * dx + dy * dy <= r * r).then_some(*id)
            }
            _ => None,
        })
    }

    pub fn circle_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count()
    }

    pub fn tooltip(&self, id: usize) -> Option<&TooltipPanel> {
        self.tooltips.iter().find(|p| p.id == id)
    }
}

/// Build the chart: header, Earth line, distance grid, lane separators, one
/// circle and one tooltip per placed record.
pub fn build_scene(
    records: &[NeoRecord],
    placements: &[Placement],
    config: &VizConfig,
    reference: NaiveDate,
) -> Scene {
    let view_box = ViewBox {
        width: config.width + 2.0 * PLOT_MARGIN,
        height: config.height + 2.0 * PLOT_MARGIN,
    };
    let left = PLOT_MARGIN;
    let right = PLOT_MARGIN + config.width;
    let top = PLOT_MARGIN;
    let multiplier = config.y_multiplier();

    let mut shapes = Vec::new();

    shapes.push(Shape::Text(TextPair {
        x: left,
        y: top / 2.0,
        label: "Close approaches".to_string(),
        value: format!(
            "{} within {} LD of Earth on {}",
            placements.len(),
            config.threshold_ld,
            reference.format("%Y-%m-%d")
        ),
        value_dx: 150.0,
        color: color::LABEL,
    }));

    shapes.push(Shape::Line {
        from: (left, top),
        to: (right, top),
        stroke: color::EARTH,
        dashed: false,
    });
    shapes.push(Shape::Text(TextPair {
        x: 8.0,
        y: top + 4.0,
        label: "Earth".to_string(),
        value: String::new(),
        value_dx: 0.0,
        color: color::EARTH,
    }));

    let steps = ((config.threshold_ld / config.grid_step_ld).floor() as u32).min(MAX_GRID_LINES);
    for k in 1..=steps {
        let ld = k as f64 * config.grid_step_ld;
        let y = top + y_position(ld, multiplier);
        shapes.push(Shape::Line {
            from: (left, y),
            to: (right, y),
            stroke: color::GRID,
            dashed: true,
        });
        shapes.push(Shape::Text(TextPair {
            x: 8.0,
            y: y + 4.0,
            label: format!("{}", ld),
            value: "LD".to_string(),
            value_dx: 28.0,
            color: color::LABEL,
        }));
    }

    let lane_width = config.lane_width();
    for i in 1..LANE_COUNT {
        let x = left + i as f64 * lane_width;
        shapes.push(Shape::Line {
            from: (x, top),
            to: (x, top + config.height),
            stroke: color::GRID,
            dashed: true,
        });
    }

    // Larger circles first so small ones stay clickable on top
    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by(|a, b| b.radius.cmp(&a.radius));

    let mut tooltips = Vec::with_capacity(placements.len());
    for placement in ordered {
        let Some(record) = records.iter().find(|r| r.id == placement.id) else {
            continue;
        };
        let cx = left + placement.x;
        let cy = top + placement.y;
        let r = placement.radius as f64;

        shapes.push(Shape::Circle {
            id: placement.id,
            cx,
            cy,
            r,
            fill: placement.color.rgba(),
        });
        tooltips.push(tooltip_panel(record, (cx, cy), r, view_box));
    }
    tooltips.sort_by_key(|p| p.id);

    Scene {
        view_box,
        background: color::BACKGROUND,
        shapes,
        tooltips,
    }
}

fn tooltip_panel(record: &NeoRecord, (cx, cy): (f64, f64), r: f64, view: ViewBox) -> TooltipPanel {
    let rows_text = tooltip_rows(record);
    let height = PANEL_PADDING * 2.0 + ROW_HEIGHT * (rows_text.len() as f64 + 1.0);

    let mut x = cx + r + PANEL_GAP;
    if x + PANEL_WIDTH > view.width {
        x = cx - r - PANEL_GAP - PANEL_WIDTH;
    }
    let x = x.max(0.0);
    let y = (cy - height / 2.0).clamp(0.0, (view.height - height).max(0.0));

    let rows = rows_text
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| TextPair {
            x: x + PANEL_PADDING,
            y: y + PANEL_PADDING + ROW_HEIGHT * (i as f64 + 2.0) - 4.0,
            label: label.to_string(),
            value,
            value_dx: VALUE_OFFSET,
            color: color::PANEL_TEXT,
        })
        .collect();

    TooltipPanel {
        id: record.id,
        x,
        y,
        width: PANEL_WIDTH,
        height,
        title: record.designation.clone(),
        rows,
    }
}

fn tooltip_rows(record: &NeoRecord) -> Vec<(&'static str, String)> {
    vec![
        (
            "Close approach",
            format!("{} ({})", record.closest_date_iso(), timing(record.days_until_closest)),
        ),
        ("Closest distance", format!("{:.2} LD", record.closest_dist_ld)),
        ("Current distance", format!("{:.2} LD", record.current_dist_ld)),
        ("Est. diameter", format!("{:.0} m", record.diameter)),
        ("Velocity", format!("{:.2} km/s", record.v_rel)),
        ("Next approach", record.next_approach.label()),
    ]
}

fn timing(days_until: i64) -> String {
    let plural = |n: i64| if n == 1 { "day" } else { "days" };
    match days_until {
        0 => "today".to_string(),
        d if d > 0 => format!("in {} {}", d, plural(d)),
        d => format!("{} {} ago", -d, plural(-d)),
    }
}
