use crate::surface::{Surface, ToolConfig};
use egui::Pos2;

/// Transient state for the stroke being drawn, if any.
#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    tool: ToolConfig,
    last: Pos2,
}

/// Converts pointer events into segments rasterized straight into the
/// surface. The raster is the only record of a stroke: once stamped it can
/// be overdrawn or wholly reset, never edited.
#[derive(Debug, Default)]
pub struct StrokeController {
    active: Option<ActiveStroke>,
}

impl StrokeController {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a new path at `at` using an immutable copy of `tool`.
    /// Silently ignored when a stroke is already active.
    pub fn begin_stroke(&mut self, surface: &mut Surface, at: Pos2, tool: ToolConfig) {
        if self.active.is_some() {
            return;
        }
        // A bare click still leaves a dot.
        surface.stamp_disc(at.x, at.y, tool.stroke_width, tool.paint());
        self.active = Some(ActiveStroke { tool, last: at });
    }

    /// Rasterizes a straight segment from the previous point to `to` using
    /// the tool captured at `begin_stroke`. No-op when no stroke is active.
    pub fn extend_stroke(&mut self, surface: &mut Surface, to: Pos2) {
        let Some(active) = &mut self.active else {
            return;
        };
        stamp_segment(surface, active.last, to, &active.tool);
        active.last = to;
    }

    /// Terminates the active stroke. Idempotent.
    pub fn end_stroke(&mut self) {
        self.active = None;
    }
}

/// Dense sub-pixel stepping of disc stamps along the segment. Keeps the
/// path gap-free and gives round caps and joins without any extra geometry.
fn stamp_segment(surface: &mut Surface, from: Pos2, to: Pos2, tool: &ToolConfig) {
    let delta = to - from;
    let distance = delta.length();
    let paint = tool.paint();

    if distance < 0.1 {
        surface.stamp_disc(to.x, to.y, tool.stroke_width, paint);
        return;
    }

    let steps = distance.ceil() as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let p = from + delta * t;
        surface.stamp_disc(p.x, p.y, tool.stroke_width, paint);
    }
}
