//! Grid geometry: cell sizes, pixel ⇄ cell lookups and snapping.
//!
//! The grid always covers the image when one is loaded, otherwise the whole
//! canvas. Lookups need image bounds: without an image there is nothing to
//! snap to.

use serde::{Deserialize, Serialize};

use super::geometry::ImageBounds;

pub const DEFAULT_GRID_SIZE: u32 = 10;
pub const DEFAULT_GRID_OPACITY: f64 = 0.5;
pub const DEFAULT_GRID_COLOR: &str = "#ffffff";

/// Author-facing grid settings, persisted with the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
    pub opacity: f64,
    pub color: String,
    pub visible: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_SIZE,
            columns: DEFAULT_GRID_SIZE,
            opacity: DEFAULT_GRID_OPACITY,
            color: DEFAULT_GRID_COLOR.to_string(),
            visible: true,
        }
    }
}

impl GridConfig {
    /// Row count as used by the math; zero is treated as one.
    pub fn effective_rows(&self) -> u32 {
        self.rows.max(1)
    }

    pub fn effective_columns(&self) -> u32 {
        self.columns.max(1)
    }

    /// Brings a deserialized config back inside its invariants.
    pub fn sanitized(mut self) -> Self {
        self.rows = self.effective_rows();
        self.columns = self.effective_columns();
        self.opacity = clamp_unit(self.opacity, DEFAULT_GRID_OPACITY);
        if self.color.trim().is_empty() {
            self.color = DEFAULT_GRID_COLOR.to_string();
        }
        self
    }
}

/// Covered area and per-cell size, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions {
    pub width: f64,
    pub height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

/// A row/column intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub grid_x: u32,
    pub grid_y: u32,
}

/// A point moved onto the centre of its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedPoint {
    pub x: f64,
    pub y: f64,
    pub grid_x: u32,
    pub grid_y: u32,
}

/// Stroke offsets for the render layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLines {
    /// Canvas x of each vertical line (columns + 1 entries).
    pub vertical: Vec<f64>,
    /// Canvas y of each horizontal line (rows + 1 entries).
    pub horizontal: Vec<f64>,
}

pub fn calculate_grid_dimensions(
    canvas_width: f64,
    canvas_height: f64,
    grid: &GridConfig,
    bounds: Option<&ImageBounds>,
) -> GridDimensions {
    let (width, height) = match bounds {
        Some(b) => (b.width, b.height),
        None => (canvas_width, canvas_height),
    };
    GridDimensions {
        width,
        height,
        cell_width: width / grid.effective_columns() as f64,
        cell_height: height / grid.effective_rows() as f64,
    }
}

pub fn pixel_to_grid(
    x: f64,
    y: f64,
    bounds: Option<&ImageBounds>,
    grid: &GridConfig,
) -> Option<GridCell> {
    let bounds = bounds?;
    if !bounds.is_usable() || !x.is_finite() || !y.is_finite() || !bounds.contains(x, y) {
        return None;
    }
    let dims = calculate_grid_dimensions(bounds.width, bounds.height, grid, Some(bounds));
    Some(GridCell {
        grid_x: cell_index(x - bounds.x, dims.cell_width, grid.effective_columns()),
        grid_y: cell_index(y - bounds.y, dims.cell_height, grid.effective_rows()),
    })
}

/// Canvas-space centre of the given cell.
pub fn grid_to_pixel(
    grid_x: u32,
    grid_y: u32,
    bounds: Option<&ImageBounds>,
    grid: &GridConfig,
) -> Option<(f64, f64)> {
    let bounds = bounds?;
    if !bounds.is_usable()
        || grid_x >= grid.effective_columns()
        || grid_y >= grid.effective_rows()
    {
        return None;
    }
    let dims = calculate_grid_dimensions(bounds.width, bounds.height, grid, Some(bounds));
    Some((
        bounds.x + (grid_x as f64 + 0.5) * dims.cell_width,
        bounds.y + (grid_y as f64 + 0.5) * dims.cell_height,
    ))
}

pub fn snap_to_grid(
    x: f64,
    y: f64,
    bounds: Option<&ImageBounds>,
    grid: &GridConfig,
) -> Option<SnappedPoint> {
    let cell = pixel_to_grid(x, y, bounds, grid)?;
    let (cx, cy) = grid_to_pixel(cell.grid_x, cell.grid_y, bounds, grid)?;
    Some(SnappedPoint {
        x: cx,
        y: cy,
        grid_x: cell.grid_x,
        grid_y: cell.grid_y,
    })
}

pub fn grid_lines(
    canvas_width: f64,
    canvas_height: f64,
    grid: &GridConfig,
    bounds: Option<&ImageBounds>,
) -> GridLines {
    let dims = calculate_grid_dimensions(canvas_width, canvas_height, grid, bounds);
    let (origin_x, origin_y) = bounds.map(|b| (b.x, b.y)).unwrap_or((0.0, 0.0));

    GridLines {
        vertical: (0..=grid.effective_columns())
            .map(|i| origin_x + i as f64 * dims.cell_width)
            .collect(),
        horizontal: (0..=grid.effective_rows())
            .map(|i| origin_y + i as f64 * dims.cell_height)
            .collect(),
    }
}

fn cell_index(offset: f64, cell_size: f64, count: u32) -> u32 {
    let raw = (offset / cell_size).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as u32).min(count - 1)
    }
}

pub(crate) fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}
