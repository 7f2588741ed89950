//! Fog-of-war authoring state.
//!
//! Three independent axes: whether fog is shown (`FogState::is_enabled`),
//! whether the author is editing, and which tool is active while editing.
//! Players can see the fog while the author edits in the same session.

pub mod actions;

use crate::models::fog::{FogState, MIN_POLYGON_POINTS, Polygon, point_in_polygon};
use crate::models::geometry::Point;

use super::ids::IdGenerator;

pub use actions::FogCommand;

/// Active tool while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogTool {
    #[default]
    None,
    Draw,
    Select,
}

impl std::fmt::Display for FogTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FogTool::None => write!(f, "NONE"),
            FogTool::Draw => write!(f, "DRAW"),
            FogTool::Select => write!(f, "SELECT"),
        }
    }
}

/// Observable authoring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogMode {
    Disabled,
    Viewing,
    Editing(FogTool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FogEditor {
    state: FogState,
    editing: bool,
    tool: FogTool,
    selected: Option<String>,
    in_progress: Vec<Point>,
    ids: IdGenerator,
}

impl Default for FogEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FogEditor {
    pub fn new() -> Self {
        Self::from_state(FogState::default())
    }

    /// Seeds the editor from persisted fog. Invalid polygons are dropped.
    pub fn from_state(mut state: FogState) -> Self {
        let before = state.darkness_areas.len();
        state.darkness_areas.retain(Polygon::is_valid);
        if state.darkness_areas.len() != before {
            log::warn!(
                "FOG: dropped {} invalid darkness area(s)",
                before - state.darkness_areas.len()
            );
        }
        let mut ids = IdGenerator::new("fog");
        ids.reserve(state.darkness_areas.iter().map(|p| p.id.as_str()));
        Self {
            state,
            editing: false,
            tool: FogTool::None,
            selected: None,
            in_progress: Vec::new(),
            ids,
        }
    }

    pub fn state(&self) -> &FogState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled
    }

    pub fn darkness_areas(&self) -> &[Polygon] {
        &self.state.darkness_areas
    }

    pub fn mode(&self) -> FogMode {
        match (self.state.is_enabled, self.editing) {
            (false, _) => FogMode::Disabled,
            (true, false) => FogMode::Viewing,
            (true, true) => FogMode::Editing(self.tool),
        }
    }

    pub fn tool(&self) -> FogTool {
        self.tool
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn selected_polygon(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn in_progress(&self) -> &[Point] {
        &self.in_progress
    }

    /// Flips visibility; polygons are kept. Hiding fog also leaves edit mode.
    pub fn toggle_fog(&mut self) {
        self.state.is_enabled = !self.state.is_enabled;
        if !self.state.is_enabled && self.editing {
            self.exit_edit_mode();
        }
        log::info!("FOG: enabled = {}", self.state.is_enabled);
    }

    pub fn enter_edit_mode(&mut self) {
        if !self.state.is_enabled {
            return;
        }
        self.editing = true;
        self.tool = FogTool::None;
        self.selected = None;
        self.in_progress.clear();
    }

    pub fn exit_edit_mode(&mut self) {
        self.editing = false;
        self.tool = FogTool::None;
        self.selected = None;
        self.in_progress.clear();
    }

    pub fn select_tool(&mut self, tool: FogTool) {
        if !self.editing {
            return;
        }
        if self.tool == FogTool::Select && tool != FogTool::Select {
            self.selected = None;
        }
        self.tool = tool;
        self.in_progress.clear();
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        if self.mode() != FogMode::Editing(FogTool::Draw) {
            return;
        }
        let point = Point::new(x, y);
        if point.is_finite() {
            self.in_progress.push(point);
        }
    }

    pub fn undo_last_point(&mut self) {
        if self.mode() == FogMode::Editing(FogTool::Draw) {
            self.in_progress.pop();
        }
    }

    /// Commits the in-progress points as a polygon. Fewer than three points
    /// are discarded without creating anything.
    pub fn finish_polygon(&mut self) -> Option<String> {
        let points = std::mem::take(&mut self.in_progress);
        if points.len() < MIN_POLYGON_POINTS {
            log::debug!("FOG: discarded unfinished polygon ({} points)", points.len());
            return None;
        }
        let areas = &self.state.darkness_areas;
        let id = self.ids.next_free(|id| areas.iter().any(|p| p.id == id));
        self.state.darkness_areas.push(Polygon {
            id: id.clone(),
            points,
        });
        log::debug!("FOG: committed {}", id);
        Some(id)
    }

    pub fn delete_polygon(&mut self, id: &str) {
        self.state.darkness_areas.retain(|p| p.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn select_polygon(&mut self, id: Option<&str>) {
        if self.mode() != FogMode::Editing(FogTool::Select) {
            return;
        }
        match id {
            None => self.selected = None,
            Some(id) => {
                if self.state.darkness_areas.iter().any(|p| p.id == id) {
                    self.selected = Some(id.to_string());
                }
            }
        }
    }

    /// Selects the topmost polygon under `point`, or clears the selection.
    pub fn select_polygon_at(&mut self, point: Point) -> Option<String> {
        if self.mode() != FogMode::Editing(FogTool::Select) {
            return None;
        }
        let hit = self
            .state
            .darkness_areas
            .iter()
            .rev()
            .find(|p| point_in_polygon(point, p))
            .map(|p| p.id.clone());
        self.selected = hit.clone();
        hit
    }

    pub fn reset_fog(&mut self) {
        self.state.darkness_areas.clear();
        self.selected = None;
    }

    pub fn clear_all_fog(&mut self) {
        let ids = std::mem::replace(&mut self.ids, IdGenerator::new("fog"));
        *self = Self::new();
        // Keep numbering monotonic so ids never get reused in a session.
        self.ids = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing_editor() -> FogEditor {
        let mut fog = FogEditor::new();
        fog.toggle_fog();
        fog.enter_edit_mode();
        fog.select_tool(FogTool::Draw);
        fog
    }

    fn draw_triangle(fog: &mut FogEditor, offset: f64) -> String {
        fog.add_point(offset, 0.0);
        fog.add_point(offset + 10.0, 0.0);
        fog.add_point(offset, 10.0);
        fog.finish_polygon().unwrap()
    }

    #[test]
    fn mode_transitions() {
        let mut fog = FogEditor::new();
        assert_eq!(fog.mode(), FogMode::Disabled);
        fog.enter_edit_mode();
        assert_eq!(fog.mode(), FogMode::Disabled);

        fog.toggle_fog();
        assert_eq!(fog.mode(), FogMode::Viewing);
        fog.enter_edit_mode();
        assert_eq!(fog.mode(), FogMode::Editing(FogTool::None));
        fog.select_tool(FogTool::Select);
        assert_eq!(fog.mode(), FogMode::Editing(FogTool::Select));
        fog.exit_edit_mode();
        assert_eq!(fog.mode(), FogMode::Viewing);
    }

    #[test]
    fn two_points_create_nothing() {
        let mut fog = drawing_editor();
        fog.add_point(0.0, 0.0);
        fog.add_point(5.0, 5.0);
        assert_eq!(fog.finish_polygon(), None);
        assert!(fog.darkness_areas().is_empty());
        assert!(fog.in_progress().is_empty());
    }

    #[test]
    fn three_collinear_points_commit() {
        let mut fog = drawing_editor();
        fog.add_point(0.0, 0.0);
        fog.add_point(5.0, 5.0);
        fog.add_point(10.0, 10.0);
        let id = fog.finish_polygon().unwrap();
        assert_eq!(fog.darkness_areas().len(), 1);
        assert_eq!(fog.darkness_areas()[0].id, id);
        assert_eq!(fog.darkness_areas()[0].points[2], Point::new(10.0, 10.0));
    }

    #[test]
    fn points_only_accepted_while_drawing() {
        let mut fog = FogEditor::new();
        fog.toggle_fog();
        fog.add_point(1.0, 1.0);
        fog.enter_edit_mode();
        fog.add_point(1.0, 1.0);
        fog.select_tool(FogTool::Select);
        fog.add_point(1.0, 1.0);
        assert!(fog.in_progress().is_empty());
    }

    #[test]
    fn switching_tool_clears_in_progress() {
        let mut fog = drawing_editor();
        fog.add_point(1.0, 1.0);
        fog.add_point(2.0, 1.0);
        fog.select_tool(FogTool::Draw);
        assert!(fog.in_progress().is_empty());
    }

    #[test]
    fn leaving_select_clears_selection() {
        let mut fog = drawing_editor();
        let id = draw_triangle(&mut fog, 0.0);
        fog.select_tool(FogTool::Select);
        fog.select_polygon(Some(&id));
        assert_eq!(fog.selected_polygon(), Some(id.as_str()));
        fog.select_tool(FogTool::Draw);
        assert_eq!(fog.selected_polygon(), None);
    }

    #[test]
    fn deleting_selected_polygon_clears_selection() {
        let mut fog = drawing_editor();
        let first = draw_triangle(&mut fog, 0.0);
        let second = draw_triangle(&mut fog, 100.0);
        fog.select_tool(FogTool::Select);
        fog.select_polygon(Some(&second));
        fog.delete_polygon(&second);
        assert_eq!(fog.selected_polygon(), None);
        assert_eq!(fog.darkness_areas().len(), 1);
        assert_eq!(fog.darkness_areas()[0].id, first);
    }

    #[test]
    fn select_at_point_uses_hit_test() {
        let mut fog = drawing_editor();
        draw_triangle(&mut fog, 0.0);
        let far = draw_triangle(&mut fog, 100.0);
        fog.select_tool(FogTool::Select);
        assert_eq!(fog.select_polygon_at(Point::new(102.0, 2.0)), Some(far.clone()));
        assert_eq!(fog.selected_polygon(), Some(far.as_str()));
        assert_eq!(fog.select_polygon_at(Point::new(50.0, 50.0)), None);
        assert_eq!(fog.selected_polygon(), None);
    }

    #[test]
    fn reset_keeps_enabled_clear_all_disables() {
        let mut fog = drawing_editor();
        draw_triangle(&mut fog, 0.0);
        fog.reset_fog();
        assert!(fog.darkness_areas().is_empty());
        assert!(fog.is_enabled());

        fog.select_tool(FogTool::Draw);
        draw_triangle(&mut fog, 0.0);
        fog.clear_all_fog();
        assert!(fog.darkness_areas().is_empty());
        assert_eq!(fog.mode(), FogMode::Disabled);
        assert!(!fog.is_editing());
    }

    #[test]
    fn toggle_keeps_polygons() {
        let mut fog = drawing_editor();
        draw_triangle(&mut fog, 0.0);
        fog.toggle_fog();
        assert_eq!(fog.mode(), FogMode::Disabled);
        assert_eq!(fog.darkness_areas().len(), 1);
        fog.toggle_fog();
        assert_eq!(fog.mode(), FogMode::Viewing);
    }

    #[test]
    fn undo_pops_last_point() {
        let mut fog = drawing_editor();
        fog.add_point(1.0, 1.0);
        fog.add_point(2.0, 2.0);
        fog.undo_last_point();
        assert_eq!(fog.in_progress(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn restored_ids_are_not_reused() {
        let mut fog = drawing_editor();
        draw_triangle(&mut fog, 0.0);
        draw_triangle(&mut fog, 20.0);
        let mut restored = FogEditor::from_state(fog.state().clone());
        restored.enter_edit_mode();
        restored.select_tool(FogTool::Draw);
        let id = draw_triangle(&mut restored, 40.0);
        assert_eq!(id, "fog-3");
    }
}
