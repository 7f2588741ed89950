//! Tokens and effects: the two placeable entity kinds of a scene.
//!
//! Both share the same placement fields and clamping rules; the store in
//! `state::entity_store` is generic over the [`Entity`] trait below.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::grid::clamp_unit;

/// Smallest width/height an entity can be resized to.
pub const MIN_ENTITY_SIZE: f64 = 20.0;
pub const DEFAULT_ENTITY_SIZE: f64 = 50.0;

pub fn clamp_size(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_ENTITY_SIZE)
    } else {
        MIN_ENTITY_SIZE
    }
}

pub fn clamp_opacity(value: f64) -> f64 {
    clamp_unit(value, 1.0)
}

/// Placement shared by every entity kind.
pub trait Entity: Clone + std::fmt::Debug + PartialEq {
    /// Fields supplied by the author when creating an entity.
    type Draft: Clone + std::fmt::Debug;
    /// Partial update merged by `update`.
    type Patch: Clone + std::fmt::Debug;

    /// Prefix of generated ids (`token-3`, `effect-12`).
    const ID_PREFIX: &'static str;

    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn id(&self) -> &str;
    /// Canvas-space anchor (centre).
    fn position(&self) -> Point;
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Mutable view of the placement fields every kind shares.
    fn placement(&mut self) -> Placement<'_>;

    /// True when the canvas point lies on the entity's footprint.
    fn contains(&self, point: Point) -> bool;

    /// Non-finite coordinates are ignored.
    fn move_to(&mut self, x: f64, y: f64, grid_x: u32, grid_y: u32) {
        if x.is_finite() && y.is_finite() {
            let p = self.placement();
            *p.x = x;
            *p.y = y;
            *p.grid_x = grid_x;
            *p.grid_y = grid_y;
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        let p = self.placement();
        *p.width = clamp_size(width);
        *p.height = clamp_size(height);
    }

    fn set_opacity(&mut self, opacity: f64) {
        *self.placement().opacity = clamp_opacity(opacity);
    }

    /// Brings a deserialized entity back inside its invariants.
    fn sanitized(mut self) -> Self {
        let p = self.placement();
        *p.width = clamp_size(*p.width);
        *p.height = clamp_size(*p.height);
        *p.opacity = clamp_opacity(*p.opacity);
        self
    }
}

/// Borrowed placement fields of one entity.
pub struct Placement<'a> {
    pub x: &'a mut f64,
    pub y: &'a mut f64,
    pub grid_x: &'a mut u32,
    pub grid_y: &'a mut u32,
    pub width: &'a mut f64,
    pub height: &'a mut f64,
    pub opacity: &'a mut f64,
}

/// A movable marker bound to a library image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub grid_x: u32,
    #[serde(default)]
    pub grid_y: u32,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    pub token_image_ref: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenDraft {
    pub x: f64,
    pub y: f64,
    pub grid_x: u32,
    pub grid_y: u32,
    pub width: f64,
    pub height: f64,
    pub name: Option<String>,
    pub opacity: f64,
    pub token_image_ref: String,
}

impl TokenDraft {
    pub fn new(token_image_ref: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            grid_x: 0,
            grid_y: 0,
            width: DEFAULT_ENTITY_SIZE,
            height: DEFAULT_ENTITY_SIZE,
            name: None,
            opacity: 1.0,
            token_image_ref: token_image_ref.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub grid_x: Option<u32>,
    pub grid_y: Option<u32>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `Some(None)` clears the name.
    pub name: Option<Option<String>>,
    pub opacity: Option<f64>,
    pub token_image_ref: Option<String>,
}

impl Entity for Token {
    type Draft = TokenDraft;
    type Patch = TokenPatch;

    const ID_PREFIX: &'static str = "token";

    fn from_draft(id: String, draft: TokenDraft) -> Self {
        Self {
            id,
            x: draft.x,
            y: draft.y,
            grid_x: draft.grid_x,
            grid_y: draft.grid_y,
            width: clamp_size(draft.width),
            height: clamp_size(draft.height),
            name: draft.name,
            opacity: clamp_opacity(draft.opacity),
            token_image_ref: draft.token_image_ref,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn apply_patch(&mut self, patch: TokenPatch) {
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(gx) = patch.grid_x {
            self.grid_x = gx;
        }
        if let Some(gy) = patch.grid_y {
            self.grid_y = gy;
        }
        if let Some(w) = patch.width {
            self.width = clamp_size(w);
        }
        if let Some(h) = patch.height {
            self.height = clamp_size(h);
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = clamp_opacity(opacity);
        }
        if let Some(image) = patch.token_image_ref {
            self.token_image_ref = image;
        }
    }

    fn placement(&mut self) -> Placement<'_> {
        Placement {
            x: &mut self.x,
            y: &mut self.y,
            grid_x: &mut self.grid_x,
            grid_y: &mut self.grid_y,
            width: &mut self.width,
            height: &mut self.height,
            opacity: &mut self.opacity,
        }
    }

    fn contains(&self, point: Point) -> bool {
        rect_contains(self.x, self.y, self.width, self.height, point)
    }
}

/// Fixed set of decorative effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectType {
    Fire,
    Ice,
    Lightning,
    Poison,
    Smoke,
    Magic,
    Water,
    Darkness,
    Holy,
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EffectType::Fire => "fire",
            EffectType::Ice => "ice",
            EffectType::Lightning => "lightning",
            EffectType::Poison => "poison",
            EffectType::Smoke => "smoke",
            EffectType::Magic => "magic",
            EffectType::Water => "water",
            EffectType::Darkness => "darkness",
            EffectType::Holy => "holy",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectShape {
    #[default]
    Square,
    Circle,
}

/// An ephemeral decorative overlay with freeform placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: String,
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub grid_x: u32,
    #[serde(default)]
    pub grid_y: u32,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(default)]
    pub shape: EffectShape,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectDraft {
    pub effect_type: EffectType,
    pub x: f64,
    pub y: f64,
    pub grid_x: u32,
    pub grid_y: u32,
    pub width: f64,
    pub height: f64,
    pub shape: EffectShape,
    pub opacity: f64,
    pub animation_ref: Option<String>,
}

impl EffectDraft {
    pub fn new(effect_type: EffectType, x: f64, y: f64) -> Self {
        Self {
            effect_type,
            x,
            y,
            grid_x: 0,
            grid_y: 0,
            width: DEFAULT_ENTITY_SIZE,
            height: DEFAULT_ENTITY_SIZE,
            shape: EffectShape::Square,
            opacity: 1.0,
            animation_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectPatch {
    pub effect_type: Option<EffectType>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub shape: Option<EffectShape>,
    pub opacity: Option<f64>,
    pub animation_ref: Option<Option<String>>,
}

impl Entity for Effect {
    type Draft = EffectDraft;
    type Patch = EffectPatch;

    const ID_PREFIX: &'static str = "effect";

    fn from_draft(id: String, draft: EffectDraft) -> Self {
        Self {
            id,
            effect_type: draft.effect_type,
            x: draft.x,
            y: draft.y,
            grid_x: draft.grid_x,
            grid_y: draft.grid_y,
            width: clamp_size(draft.width),
            height: clamp_size(draft.height),
            shape: draft.shape,
            opacity: clamp_opacity(draft.opacity),
            animation_ref: draft.animation_ref,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn apply_patch(&mut self, patch: EffectPatch) {
        if let Some(kind) = patch.effect_type {
            self.effect_type = kind;
        }
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = clamp_size(w);
        }
        if let Some(h) = patch.height {
            self.height = clamp_size(h);
        }
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = clamp_opacity(opacity);
        }
        if let Some(animation) = patch.animation_ref {
            self.animation_ref = animation;
        }
    }

    fn placement(&mut self) -> Placement<'_> {
        Placement {
            x: &mut self.x,
            y: &mut self.y,
            grid_x: &mut self.grid_x,
            grid_y: &mut self.grid_y,
            width: &mut self.width,
            height: &mut self.height,
            opacity: &mut self.opacity,
        }
    }

    fn contains(&self, point: Point) -> bool {
        match self.shape {
            EffectShape::Square => rect_contains(self.x, self.y, self.width, self.height, point),
            EffectShape::Circle => {
                // Ellipse inscribed in the footprint rectangle.
                let rx = self.width / 2.0;
                let ry = self.height / 2.0;
                let dx = (point.x - self.x) / rx;
                let dy = (point.y - self.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }
}

// Entities are anchored on their centre.
fn rect_contains(cx: f64, cy: f64, width: f64, height: f64, point: Point) -> bool {
    (point.x - cx).abs() <= width / 2.0 && (point.y - cy).abs() <= height / 2.0
}

fn default_size() -> f64 {
    DEFAULT_ENTITY_SIZE
}

fn default_opacity() -> f64 {
    1.0
}
