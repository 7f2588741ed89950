//! Darkness polygons and the persisted fog-of-war state.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Fewest points a darkness polygon may be committed with.
pub const MIN_POLYGON_POINTS: usize = 3;

/// An author-drawn closed region. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: String,
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POLYGON_POINTS && self.points.iter().all(Point::is_finite)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FogState {
    pub is_enabled: bool,
    pub darkness_areas: Vec<Polygon>,
}

/// Even-odd ray casting test. Points exactly on an edge may land on either
/// side.
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let pts = &polygon.points;
    if pts.len() < MIN_POLYGON_POINTS {
        return false;
    }

    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (xi, yi) = (pts[i].x, pts[i].y);
        let (xj, yj) = (pts[j].x, pts[j].y);
        if (yi > point.y) != (yj > point.y) {
            let cross_x = (xj - xi) * (point.y - yi) / (yj - yi) + xi;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
