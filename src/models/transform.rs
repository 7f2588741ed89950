//! Conversions between screen, canvas, original-image and grid-cell space.
//!
//! Tokens and effects live in canvas space (before zoom). Zoom and pan only
//! matter at the screen boundary, so the canvas ⇄ original-image pair never
//! takes a `ZoomState`. Every function is pure and answers `None` when the
//! point falls outside its domain.

use super::geometry::{ImageBounds, Point};
use super::grid::{GridCell, GridConfig, pixel_to_grid};
use super::zoom::ZoomState;

/// Canvas point → native image pixel.
pub fn canvas_to_original_image(cx: f64, cy: f64, bounds: &ImageBounds) -> Option<Point> {
    if !bounds.is_usable() {
        return None;
    }
    let rel_x = (cx - bounds.x) / bounds.width;
    let rel_y = (cy - bounds.y) / bounds.height;
    if !in_unit_range(rel_x) || !in_unit_range(rel_y) {
        return None;
    }
    Some(Point::new(
        rel_x * bounds.original_width,
        rel_y * bounds.original_height,
    ))
}

/// Native image pixel → canvas point. Exact inverse of
/// [`canvas_to_original_image`].
pub fn original_image_to_canvas(ox: f64, oy: f64, bounds: &ImageBounds) -> Option<Point> {
    if !bounds.is_usable() || bounds.original_width <= 0.0 || bounds.original_height <= 0.0 {
        return None;
    }
    let rel_x = ox / bounds.original_width;
    let rel_y = oy / bounds.original_height;
    if !in_unit_range(rel_x) || !in_unit_range(rel_y) {
        return None;
    }
    Some(Point::new(
        bounds.x + rel_x * bounds.width,
        bounds.y + rel_y * bounds.height,
    ))
}

/// `screen = canvas * level + pan`
pub fn canvas_to_screen(canvas: Point, zoom: &ZoomState) -> Point {
    Point::new(
        canvas.x * zoom.level + zoom.pan_x,
        canvas.y * zoom.level + zoom.pan_y,
    )
}

/// Inverse of [`canvas_to_screen`]. `None` only for a degenerate zoom level.
pub fn screen_to_canvas(screen: Point, zoom: &ZoomState) -> Option<Point> {
    if !zoom.level.is_finite() || zoom.level <= 0.0 {
        return None;
    }
    Some(Point::new(
        (screen.x - zoom.pan_x) / zoom.level,
        (screen.y - zoom.pan_y) / zoom.level,
    ))
}

/// Resolves a pointer position all the way down to a grid cell.
pub fn screen_to_grid(
    screen: Point,
    zoom: &ZoomState,
    bounds: Option<&ImageBounds>,
    grid: &GridConfig,
) -> Option<GridCell> {
    let canvas = screen_to_canvas(screen, zoom)?;
    pixel_to_grid(canvas.x, canvas.y, bounds, grid)
}

fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ImageBounds {
        ImageBounds {
            x: 37.5,
            y: 12.25,
            width: 812.0,
            height: 455.5,
            original_width: 2048.0,
            original_height: 1149.0,
        }
    }

    #[test]
    fn canvas_original_round_trip() {
        let b = bounds();
        let steps = 17;
        for i in 1..steps {
            for j in 1..steps {
                let cx = b.x + b.width * (i as f64 / steps as f64);
                let cy = b.y + b.height * (j as f64 / steps as f64);
                let original = canvas_to_original_image(cx, cy, &b).unwrap();
                let back = original_image_to_canvas(original.x, original.y, &b).unwrap();
                assert!((back.x - cx).abs() < 1e-6, "x drift at {i},{j}");
                assert!((back.y - cy).abs() < 1e-6, "y drift at {i},{j}");
            }
        }
    }

    #[test]
    fn outside_points_map_to_none() {
        let b = bounds();
        assert!(canvas_to_original_image(b.x - 0.01, b.y + 1.0, &b).is_none());
        assert!(canvas_to_original_image(b.x + 1.0, b.y + b.height + 0.5, &b).is_none());
        assert!(original_image_to_canvas(-1.0, 0.0, &b).is_none());
        assert!(original_image_to_canvas(0.0, b.original_height + 1.0, &b).is_none());
    }

    #[test]
    fn edges_are_inside() {
        let b = bounds();
        let corner = canvas_to_original_image(b.x + b.width, b.y + b.height, &b).unwrap();
        assert!((corner.x - b.original_width).abs() < 1e-9);
        assert!((corner.y - b.original_height).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_never_panic() {
        let mut b = bounds();
        b.width = 0.0;
        assert!(canvas_to_original_image(40.0, 20.0, &b).is_none());
        assert!(original_image_to_canvas(10.0, 10.0, &b).is_none());
    }

    #[test]
    fn screen_canvas_affine_round_trip() {
        let zoom = ZoomState {
            level: 2.5,
            pan_x: -120.0,
            pan_y: 44.0,
        };
        let canvas = Point::new(321.5, 87.25);
        let screen = canvas_to_screen(canvas, &zoom);
        assert_eq!(screen, Point::new(321.5 * 2.5 - 120.0, 87.25 * 2.5 + 44.0));
        let back = screen_to_canvas(screen, &zoom).unwrap();
        assert!((back.x - canvas.x).abs() < 1e-9);
        assert!((back.y - canvas.y).abs() < 1e-9);
    }

    #[test]
    fn screen_to_grid_applies_zoom_first() {
        let b = ImageBounds {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 400.0,
            original_width: 400.0,
            original_height: 400.0,
        };
        let grid = GridConfig {
            rows: 4,
            columns: 4,
            ..GridConfig::default()
        };
        let zoom = ZoomState {
            level: 2.0,
            pan_x: 10.0,
            pan_y: 10.0,
        };
        // canvas (150, 250) on screen is (310, 510)
        let cell = screen_to_grid(Point::new(310.0, 510.0), &zoom, Some(&b), &grid).unwrap();
        assert_eq!((cell.grid_x, cell.grid_y), (1, 2));
    }
}
