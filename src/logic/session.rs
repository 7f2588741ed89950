//! The authoring session: owns the live scene and announces changes.

use crate::shared::snapshot::SceneSnapshot;
use crate::state::scene::{SceneCommand, SceneState};
use crate::state::traits::{Apply, Snapshot};
use crate::system::bus::SceneBus;

pub struct SceneSession {
    scene: SceneState,
    bus: SceneBus,
}

impl SceneSession {
    pub fn new(scene: SceneState, bus: SceneBus) -> Self {
        Self { scene, bus }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn bus(&self) -> &SceneBus {
        &self.bus
    }

    /// Applies one command, then publishes a snapshot if the persisted
    /// record may have changed. Returns the id created, if any.
    pub fn dispatch(&mut self, command: SceneCommand) -> Option<String> {
        let publish = command.touches_persisted_state();
        log::trace!("SESSION: {:?}", command);
        let outcome = self.scene.apply(command);
        if publish {
            self.bus.publish(self.scene.create_snapshot());
        }
        outcome
    }

    /// Replaces the scene with a stored record and publishes it.
    pub fn restore(&mut self, snapshot: SceneSnapshot) {
        self.scene.restore_from(snapshot);
        log::info!(
            "SESSION: scene restored ({} tokens, {} effects, {} fog areas)",
            self.scene.tokens.len(),
            self.scene.effects.len(),
            self.scene.fog.state().darkness_areas.len()
        );
        self.bus.publish(self.scene.create_snapshot());
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.create_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{EffectDraft, EffectType, TokenDraft};
    use crate::state::entity_store::EntityCommand;
    use crate::state::fog::{FogCommand, FogTool};

    fn session() -> SceneSession {
        let mut session = SceneSession::new(SceneState::new(), SceneBus::new());
        session.dispatch(SceneCommand::ResizeCanvas {
            width: 400.0,
            height: 400.0,
        });
        session.dispatch(SceneCommand::ImageLoaded {
            image_ref: "map.png".into(),
            width: 800.0,
            height: 800.0,
        });
        session.bus().persist_rx.try_iter().for_each(drop);
        session
    }

    #[test]
    fn mutations_publish_snapshots() {
        let mut session = session();
        let id = session
            .dispatch(SceneCommand::PlaceToken(TokenDraft::new("hero.png", 160.0, 120.0)))
            .unwrap();
        let published = session.bus().latest_persisted().unwrap();
        assert_eq!(published.tokens.len(), 1);
        assert_eq!(published.selected_token_id.as_deref(), Some(id.as_str()));
        assert_eq!(published, session.snapshot());
    }

    #[test]
    fn token_moves_snap_and_effect_moves_do_not() {
        let mut session = session();
        let token = session
            .dispatch(SceneCommand::PlaceToken(TokenDraft::new("hero.png", 10.0, 10.0)))
            .unwrap();
        let effect = session
            .dispatch(SceneCommand::PlaceEffect(EffectDraft::new(EffectType::Fire, 10.0, 10.0)))
            .unwrap();

        session.dispatch(SceneCommand::MoveToken {
            id: token.clone(),
            x: 61.0,
            y: 139.0,
        });
        session.dispatch(SceneCommand::MoveEffect {
            id: effect.clone(),
            x: 61.0,
            y: 139.0,
        });

        let scene = session.scene();
        let t = scene.tokens.get(&token).unwrap();
        assert_eq!((t.x, t.y), (60.0, 140.0));
        assert_eq!((t.grid_x, t.grid_y), (1, 3));
        let e = scene.effects.get(&effect).unwrap();
        assert_eq!((e.x, e.y), (61.0, 139.0));
        assert_eq!((e.grid_x, e.grid_y), (1, 3));
    }

    #[test]
    fn transient_fog_edits_are_not_published() {
        let mut session = session();
        session.dispatch(SceneCommand::Fog(FogCommand::Toggle));
        session.bus().persist_rx.try_iter().for_each(drop);

        session.dispatch(SceneCommand::Fog(FogCommand::EnterEditMode));
        session.dispatch(SceneCommand::Fog(FogCommand::SelectTool(FogTool::Draw)));
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
            session.dispatch(SceneCommand::Fog(FogCommand::AddPoint { x, y }));
        }
        assert!(session.bus().persist_rx.is_empty());

        session.dispatch(SceneCommand::Fog(FogCommand::FinishPolygon));
        let published = session.bus().latest_persisted().unwrap();
        assert_eq!(published.fog.unwrap().darkness_areas.len(), 1);
    }

    #[test]
    fn restore_replaces_scene() {
        let mut session = session();
        session.dispatch(SceneCommand::PlaceToken(TokenDraft::new("a.png", 10.0, 10.0)));
        let saved = session.snapshot();
        session.dispatch(SceneCommand::Token(EntityCommand::DeleteAll));
        assert!(session.scene().tokens.is_empty());

        session.restore(saved.clone());
        assert_eq!(session.snapshot(), saved);
        assert_eq!(session.bus().latest_persisted(), Some(saved));
    }
}
