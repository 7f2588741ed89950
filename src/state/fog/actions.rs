//! Command interface for the fog editor.

use super::{FogEditor, FogTool};
use crate::models::fog::FogState;
use crate::models::geometry::Point;
use crate::state::traits::{Apply, Snapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum FogCommand {
    Toggle,
    EnterEditMode,
    ExitEditMode,
    SelectTool(FogTool),
    AddPoint { x: f64, y: f64 },
    UndoLastPoint,
    FinishPolygon,
    DeletePolygon(String),
    SelectPolygon(Option<String>),
    SelectPolygonAt(Point),
    Reset,
    ClearAll,
}

impl FogCommand {
    /// True when the command can change the persisted `FogState`.
    pub fn touches_persisted_state(&self) -> bool {
        matches!(
            self,
            FogCommand::Toggle
                | FogCommand::FinishPolygon
                | FogCommand::DeletePolygon(_)
                | FogCommand::Reset
                | FogCommand::ClearAll
        )
    }
}

impl Apply<FogCommand> for FogEditor {
    /// Id of the polygon created by `FinishPolygon`, or hit by
    /// `SelectPolygonAt`.
    type Outcome = Option<String>;

    fn apply(&mut self, command: FogCommand) -> Option<String> {
        match command {
            FogCommand::Toggle => self.toggle_fog(),
            FogCommand::EnterEditMode => self.enter_edit_mode(),
            FogCommand::ExitEditMode => self.exit_edit_mode(),
            FogCommand::SelectTool(tool) => self.select_tool(tool),
            FogCommand::AddPoint { x, y } => self.add_point(x, y),
            FogCommand::UndoLastPoint => self.undo_last_point(),
            FogCommand::FinishPolygon => return self.finish_polygon(),
            FogCommand::DeletePolygon(id) => self.delete_polygon(&id),
            FogCommand::SelectPolygon(id) => self.select_polygon(id.as_deref()),
            FogCommand::SelectPolygonAt(point) => return self.select_polygon_at(point),
            FogCommand::Reset => self.reset_fog(),
            FogCommand::ClearAll => self.clear_all_fog(),
        }
        None
    }
}

// The persisted slice is just the fog state; editing state stays local.
impl Snapshot for FogEditor {
    type Output = FogState;

    fn create_snapshot(&self) -> FogState {
        self.state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_sequence_builds_polygon() {
        let fog = FogEditor::new()
            .reduce(FogCommand::Toggle)
            .reduce(FogCommand::EnterEditMode)
            .reduce(FogCommand::SelectTool(FogTool::Draw))
            .reduce(FogCommand::AddPoint { x: 0.0, y: 0.0 })
            .reduce(FogCommand::AddPoint { x: 4.0, y: 0.0 })
            .reduce(FogCommand::AddPoint { x: 4.0, y: 4.0 })
            .reduce(FogCommand::FinishPolygon);

        let snapshot = fog.create_snapshot();
        assert!(snapshot.is_enabled);
        assert_eq!(snapshot.darkness_areas.len(), 1);
        assert_eq!(snapshot.darkness_areas[0].points.len(), 3);
    }

    #[test]
    fn finish_returns_new_id() {
        let mut fog = FogEditor::new();
        fog.apply(FogCommand::Toggle);
        fog.apply(FogCommand::EnterEditMode);
        fog.apply(FogCommand::SelectTool(FogTool::Draw));
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            fog.apply(FogCommand::AddPoint { x, y });
        }
        assert_eq!(fog.apply(FogCommand::FinishPolygon), Some("fog-1".to_string()));
        assert!(FogCommand::FinishPolygon.touches_persisted_state());
        assert!(!FogCommand::AddPoint { x: 0.0, y: 0.0 }.touches_persisted_state());
    }
}
