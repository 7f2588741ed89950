//! Plain data types and pure geometry.

pub mod common;
pub mod entity;
pub mod fog;
pub mod geometry;
pub mod grid;
pub mod particle;
pub mod settings;
pub mod transform;
pub mod zoom;

pub use entity::{
    Effect, EffectDraft, EffectPatch, EffectShape, EffectType, Entity, MIN_ENTITY_SIZE, Placement,
    Token, TokenDraft, TokenPatch,
};
pub use fog::{FogState, Polygon, point_in_polygon};
pub use geometry::{CanvasSize, ImageBounds, Point};
pub use grid::{
    GridCell, GridConfig, GridDimensions, GridLines, SnappedPoint, calculate_grid_dimensions,
    grid_lines, grid_to_pixel, pixel_to_grid, snap_to_grid,
};
pub use particle::{Particle, ParticleParams, ParticleType, ParticleTypeConfig};
pub use settings::ViewerSettings;
pub use transform::{
    canvas_to_original_image, canvas_to_screen, original_image_to_canvas, screen_to_canvas,
    screen_to_grid,
};
pub use zoom::{MAX_ZOOM, MIN_ZOOM, ZoomState};
