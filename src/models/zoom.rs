//! Pan/zoom state of the viewport.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;

/// Current zoom level and pan offset (screen pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomState {
    pub level: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            level: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Clamps a zoom level into `[MIN_ZOOM, MAX_ZOOM]`.
pub fn clamp_zoom(level: f64) -> f64 {
    if level.is_nan() {
        return 1.0;
    }
    level.clamp(MIN_ZOOM, MAX_ZOOM)
}

impl ZoomState {
    /// Brings a deserialized state back inside its invariants.
    pub fn sanitized(self) -> Self {
        Self {
            level: clamp_zoom(self.level),
            pan_x: if self.pan_x.is_finite() { self.pan_x } else { 0.0 },
            pan_y: if self.pan_y.is_finite() { self.pan_y } else { 0.0 },
        }
    }

    pub fn zoom_in(&mut self, step: f64) {
        self.set_level(self.level * effective_step(step));
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.set_level(self.level / effective_step(step));
    }

    pub fn set_level(&mut self, level: f64) {
        if level.is_finite() {
            self.level = clamp_zoom(level);
        }
    }

    /// Zooms to `level` while keeping the canvas point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, level: f64) {
        if !level.is_finite() || !screen.is_finite() {
            return;
        }
        let anchor_x = (screen.x - self.pan_x) / self.level;
        let anchor_y = (screen.y - self.pan_y) / self.level;
        self.level = clamp_zoom(level);
        self.pan_x = screen.x - anchor_x * self.level;
        self.pan_y = screen.y - anchor_y * self.level;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// A step at or below 1.0 would zoom the wrong way (or not at all).
fn effective_step(step: f64) -> f64 {
    if step.is_finite() && step > 1.0 {
        step
    } else {
        DEFAULT_ZOOM_STEP
    }
}
