//! Whole-scene state and the assembler that projects it to/from the
//! persisted record.

use crate::models::entity::{Effect, EffectDraft, Entity, Token, TokenDraft};
use crate::models::geometry::{CanvasSize, ImageBounds, Point};
use crate::models::grid::{GridConfig, pixel_to_grid, snap_to_grid};
use crate::models::settings::ViewerSettings;
use crate::models::transform::{canvas_to_original_image, original_image_to_canvas};
use crate::models::zoom::{DEFAULT_ZOOM_STEP, ZoomState};
use crate::shared::snapshot::{SCENE_RECORD_VERSION, SceneSnapshot};

use super::entity_store::{EntityCommand, EntityStore};
use super::fog::{FogCommand, FogEditor};
use super::traits::{Apply, Snapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum ZoomCommand {
    ZoomIn,
    ZoomOut,
    SetLevel(f64),
    /// Zoom around a screen-space anchor (mouse wheel).
    ZoomAt { screen: Point, level: f64 },
    PanBy { dx: f64, dy: f64 },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    SetRows(u32),
    SetColumns(u32),
    SetOpacity(f64),
    SetColor(String),
    SetVisible(bool),
    ToggleVisible,
}

impl Apply<GridCommand> for GridConfig {
    type Outcome = ();

    fn apply(&mut self, command: GridCommand) {
        match command {
            GridCommand::SetRows(rows) => self.rows = rows.max(1),
            GridCommand::SetColumns(columns) => self.columns = columns.max(1),
            GridCommand::SetOpacity(opacity) => {
                if !opacity.is_nan() {
                    self.opacity = opacity.clamp(0.0, 1.0);
                }
            }
            GridCommand::SetColor(color) => {
                if !color.trim().is_empty() {
                    self.color = color;
                }
            }
            GridCommand::SetVisible(visible) => self.visible = visible,
            GridCommand::ToggleVisible => self.visible = !self.visible,
        }
    }
}

/// Every mutation the scene accepts.
#[derive(Debug, Clone)]
pub enum SceneCommand {
    /// Raw token command; positions are taken as given.
    Token(EntityCommand<Token>),
    /// Adds a token at the snapped drop position.
    PlaceToken(TokenDraft),
    /// Moves a token, snapping to the nearest cell centre.
    MoveToken { id: String, x: f64, y: f64 },
    Effect(EntityCommand<Effect>),
    /// Adds an effect at a freeform position.
    PlaceEffect(EffectDraft),
    /// Moves an effect without snapping.
    MoveEffect { id: String, x: f64, y: f64 },
    Fog(FogCommand),
    Zoom(ZoomCommand),
    Grid(GridCommand),
    /// The image collaborator decoded the map and reports its native size.
    ImageLoaded {
        image_ref: String,
        width: f64,
        height: f64,
    },
    /// The map image could not be decoded.
    ImageFailed,
    ResizeCanvas { width: f64, height: f64 },
}

impl SceneCommand {
    /// True when the command can change the persisted record.
    pub fn touches_persisted_state(&self) -> bool {
        match self {
            SceneCommand::Fog(cmd) => cmd.touches_persisted_state(),
            _ => true,
        }
    }
}

/// The full authoring state of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub map_image_ref: Option<String>,
    pub image_bounds: Option<ImageBounds>,
    pub canvas: CanvasSize,
    pub grid: GridConfig,
    pub tokens: EntityStore<Token>,
    pub effects: EntityStore<Effect>,
    pub fog: FogEditor,
    pub zoom: ZoomState,
    pub zoom_step: f64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            map_image_ref: None,
            image_bounds: None,
            canvas: CanvasSize::default(),
            grid: GridConfig::default(),
            tokens: EntityStore::new(),
            effects: EntityStore::new(),
            fog: FogEditor::new(),
            zoom: ZoomState::default(),
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }

    pub fn with_settings(settings: &ViewerSettings) -> Self {
        Self {
            grid: settings.grid.clone(),
            zoom_step: settings.zoom.step,
            ..Self::new()
        }
    }

    /// Replaces every persisted slice with `snapshot`, keeping the local
    /// canvas size and zoom step.
    pub fn restore_from(&mut self, snapshot: SceneSnapshot) {
        let restored = SceneAssembler::restore(snapshot);
        *self = Self {
            canvas: self.canvas,
            zoom_step: self.zoom_step,
            ..restored
        };
    }

    pub fn move_token(&mut self, id: &str, x: f64, y: f64) {
        let Some(token) = self.tokens.get(id) else {
            return;
        };
        match snap_to_grid(x, y, self.image_bounds.as_ref(), &self.grid) {
            Some(snapped) => self
                .tokens
                .move_to(id, snapped.x, snapped.y, snapped.grid_x, snapped.grid_y),
            // Off the image (or no image): keep the raw point and the last known cell.
            None => {
                let (gx, gy) = (token.grid_x, token.grid_y);
                self.tokens.move_to(id, x, y, gx, gy);
            }
        }
    }

    pub fn move_effect(&mut self, id: &str, x: f64, y: f64) {
        let Some(effect) = self.effects.get(id) else {
            return;
        };
        let (gx, gy) = match pixel_to_grid(x, y, self.image_bounds.as_ref(), &self.grid) {
            Some(cell) => (cell.grid_x, cell.grid_y),
            None => (effect.grid_x, effect.grid_y),
        };
        self.effects.move_to(id, x, y, gx, gy);
    }

    pub fn place_token(&mut self, mut draft: TokenDraft) -> String {
        let bounds = self.image_bounds.as_ref();
        if let Some(snapped) = snap_to_grid(draft.x, draft.y, bounds, &self.grid) {
            draft.x = snapped.x;
            draft.y = snapped.y;
            draft.grid_x = snapped.grid_x;
            draft.grid_y = snapped.grid_y;
        }
        self.tokens.add(draft)
    }

    pub fn place_effect(&mut self, mut draft: EffectDraft) -> String {
        let bounds = self.image_bounds.as_ref();
        if let Some(cell) = pixel_to_grid(draft.x, draft.y, bounds, &self.grid) {
            draft.grid_x = cell.grid_x;
            draft.grid_y = cell.grid_y;
        }
        self.effects.add(draft)
    }

    pub fn load_image(&mut self, image_ref: String, width: f64, height: f64) {
        match ImageBounds::fit(self.canvas, width, height) {
            Some(bounds) => {
                log::info!(
                    "SCENE: image {} loaded ({}x{}), placed at {:.1},{:.1} size {:.1}x{:.1}",
                    image_ref,
                    width,
                    height,
                    bounds.x,
                    bounds.y,
                    bounds.width,
                    bounds.height
                );
                self.map_image_ref = Some(image_ref);
                self.image_bounds = Some(bounds);
            }
            None => {
                log::warn!("SCENE: image {} has unusable size {}x{}", image_ref, width, height);
                self.map_image_ref = Some(image_ref);
                self.image_bounds = None;
            }
        }
    }

    /// Decode failure degrades to the "no image" state; the grid then covers
    /// the full canvas.
    pub fn image_failed(&mut self) {
        log::warn!("SCENE: map image failed to load, continuing without image");
        self.image_bounds = None;
    }

    /// Re-fits the image to the new canvas and carries entities along so they
    /// stay over the same spot of the map.
    pub fn resize_canvas(&mut self, width: f64, height: f64) {
        let canvas = CanvasSize::new(width, height);
        if !canvas.is_valid() {
            return;
        }
        self.canvas = canvas;

        let Some(old) = self.image_bounds else {
            return;
        };
        let Some(new) = ImageBounds::fit(canvas, old.original_width, old.original_height) else {
            return;
        };
        self.image_bounds = Some(new);

        for (id, p) in positions(&self.tokens) {
            if let Some(moved) = reproject(p, &old, &new) {
                self.move_token(&id, moved.x, moved.y);
            }
        }
        for (id, p) in positions(&self.effects) {
            if let Some(moved) = reproject(p, &old, &new) {
                self.move_effect(&id, moved.x, moved.y);
            }
        }
    }

    pub fn apply_zoom(&mut self, command: ZoomCommand) {
        match command {
            ZoomCommand::ZoomIn => self.zoom.zoom_in(self.zoom_step),
            ZoomCommand::ZoomOut => self.zoom.zoom_out(self.zoom_step),
            ZoomCommand::SetLevel(level) => self.zoom.set_level(level),
            ZoomCommand::ZoomAt { screen, level } => self.zoom.zoom_at(screen, level),
            ZoomCommand::PanBy { dx, dy } => self.zoom.pan_by(dx, dy),
            ZoomCommand::Reset => self.zoom.reset(),
        }
    }
}

fn positions<T: Entity>(store: &EntityStore<T>) -> Vec<(String, Point)> {
    store
        .iter()
        .map(|item| (item.id().to_string(), item.position()))
        .collect()
}

fn reproject(p: Point, old: &ImageBounds, new: &ImageBounds) -> Option<Point> {
    let original = canvas_to_original_image(p.x, p.y, old)?;
    original_image_to_canvas(original.x, original.y, new)
}

impl Apply<SceneCommand> for SceneState {
    /// Id created by add/place/finish commands.
    type Outcome = Option<String>;

    fn apply(&mut self, command: SceneCommand) -> Option<String> {
        match command {
            SceneCommand::Token(cmd) => return self.tokens.apply(cmd),
            SceneCommand::PlaceToken(draft) => return Some(self.place_token(draft)),
            SceneCommand::MoveToken { id, x, y } => self.move_token(&id, x, y),
            SceneCommand::Effect(cmd) => return self.effects.apply(cmd),
            SceneCommand::PlaceEffect(draft) => return Some(self.place_effect(draft)),
            SceneCommand::MoveEffect { id, x, y } => self.move_effect(&id, x, y),
            SceneCommand::Fog(cmd) => return self.fog.apply(cmd),
            SceneCommand::Zoom(cmd) => self.apply_zoom(cmd),
            SceneCommand::Grid(cmd) => self.grid.apply(cmd),
            SceneCommand::ImageLoaded {
                image_ref,
                width,
                height,
            } => self.load_image(image_ref, width, height),
            SceneCommand::ImageFailed => self.image_failed(),
            SceneCommand::ResizeCanvas { width, height } => self.resize_canvas(width, height),
        }
        None
    }
}

impl Snapshot for SceneState {
    type Output = SceneSnapshot;

    fn create_snapshot(&self) -> SceneSnapshot {
        SceneAssembler::serialize(self)
    }
}

/// Sole owner of the mapping between [`SceneState`] and [`SceneSnapshot`].
pub struct SceneAssembler;

impl SceneAssembler {
    /// Pure projection of every sub-store into the persisted shape.
    pub fn serialize(scene: &SceneState) -> SceneSnapshot {
        SceneSnapshot {
            version: SCENE_RECORD_VERSION,
            map_image_ref: scene.map_image_ref.clone(),
            image_bounds: scene.image_bounds,
            grid: scene.grid.clone(),
            tokens: scene.tokens.items().to_vec(),
            selected_token_id: scene.tokens.selected_id().map(str::to_string),
            effects: scene.effects.items().to_vec(),
            selected_effect_id: scene.effects.selected_id().map(str::to_string),
            fog: Some(scene.fog.create_snapshot()),
            zoom: scene.zoom,
        }
    }

    /// Seeds a fresh scene from a record, repairing out-of-range values.
    pub fn restore(snapshot: SceneSnapshot) -> SceneState {
        let tokens: Vec<Token> = snapshot.tokens.into_iter().map(Token::sanitized).collect();
        let effects: Vec<Effect> = snapshot.effects.into_iter().map(Effect::sanitized).collect();
        let image_bounds = snapshot.image_bounds.filter(|b| {
            let usable = b.is_usable();
            if !usable {
                log::warn!("SCENE: ignoring unusable image bounds {:?}", b);
            }
            usable
        });

        SceneState {
            map_image_ref: snapshot.map_image_ref,
            image_bounds,
            grid: snapshot.grid.sanitized(),
            tokens: EntityStore::restore(tokens, snapshot.selected_token_id),
            effects: EntityStore::restore(effects, snapshot.selected_effect_id),
            fog: snapshot.fog.map(FogEditor::from_state).unwrap_or_default(),
            zoom: snapshot.zoom.sanitized(),
            ..SceneState::new()
        }
    }
}
