//! Basic geometric value types shared by every coordinate space.

use serde::{Deserialize, Serialize};

/// A 2D point. The coordinate space is implied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of the drawing surface in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Placement of the background image inside the canvas, plus its native size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub original_width: f64,
    pub original_height: f64,
}

impl ImageBounds {
    /// Fits an image of `native_width` x `native_height` inside the canvas,
    /// preserving aspect ratio and centring it.
    ///
    /// Returns `None` when either size is empty or not finite, which callers
    /// treat as the "no image" state.
    pub fn fit(canvas: CanvasSize, native_width: f64, native_height: f64) -> Option<Self> {
        if !canvas.is_valid() {
            return None;
        }
        if !(native_width.is_finite() && native_height.is_finite())
            || native_width <= 0.0
            || native_height <= 0.0
        {
            return None;
        }

        let scale = (canvas.width / native_width).min(canvas.height / native_height);
        let width = native_width * scale;
        let height = native_height * scale;

        Some(Self {
            x: (canvas.width - width) / 2.0,
            y: (canvas.height - height) / 2.0,
            width,
            height,
            original_width: native_width,
            original_height: native_height,
        })
    }

    /// True when the bounds can be used as a divisor in the transforms.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.original_width.is_finite()
            && self.original_height.is_finite()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centres_wide_image() {
        let bounds = ImageBounds::fit(CanvasSize::new(1000.0, 500.0), 400.0, 400.0).unwrap();
        assert_eq!(bounds.width, 500.0);
        assert_eq!(bounds.height, 500.0);
        assert_eq!(bounds.x, 250.0);
        assert_eq!(bounds.y, 0.0);
        assert_eq!(bounds.original_width, 400.0);
    }

    #[test]
    fn fit_rejects_empty_image() {
        assert!(ImageBounds::fit(CanvasSize::default(), 0.0, 300.0).is_none());
        assert!(ImageBounds::fit(CanvasSize::default(), f64::NAN, 300.0).is_none());
        assert!(ImageBounds::fit(CanvasSize::new(0.0, 10.0), 10.0, 10.0).is_none());
    }
}
