//! Persisted scene record.
//!
//! This is the JSON shape exchanged with the storage collaborator. Field
//! names are stable (`gridX`, `selectedTokenId`, ...) so older records keep
//! loading. Decoding is field-wise: a missing or malformed field falls back
//! to its default instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::entity::{Effect, Token};
use crate::models::fog::{FogState, Polygon};
use crate::models::geometry::ImageBounds;
use crate::models::grid::GridConfig;
use crate::models::zoom::ZoomState;

/// Current record format version.
pub const SCENE_RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    /// Format version for future compatibility.
    pub version: u32,
    pub map_image_ref: Option<String>,
    pub image_bounds: Option<ImageBounds>,
    pub grid: GridConfig,
    pub tokens: Vec<Token>,
    pub selected_token_id: Option<String>,
    pub effects: Vec<Effect>,
    pub selected_effect_id: Option<String>,
    pub fog: Option<FogState>,
    pub zoom: ZoomState,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            version: SCENE_RECORD_VERSION,
            map_image_ref: None,
            image_bounds: None,
            grid: GridConfig::default(),
            tokens: Vec::new(),
            selected_token_id: None,
            effects: Vec::new(),
            selected_effect_id: None,
            fog: None,
            zoom: ZoomState::default(),
        }
    }
}

impl SceneSnapshot {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses JSON text. Only a syntax error fails; content problems are
    /// repaired by [`SceneSnapshot::from_value`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Decodes a record field by field, substituting defaults for anything
    /// absent or malformed.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            log::warn!("SCENE: record is not an object, using an empty scene");
            return Self::default();
        };

        let version = field(obj, "version").unwrap_or(SCENE_RECORD_VERSION);
        if version > SCENE_RECORD_VERSION {
            log::warn!(
                "SCENE: record version {} is newer than {}, reading what is known",
                version,
                SCENE_RECORD_VERSION
            );
        }

        Self {
            version: SCENE_RECORD_VERSION,
            map_image_ref: field(obj, "mapImageRef"),
            image_bounds: field(obj, "imageBounds"),
            grid: obj.get("grid").map(decode_grid).unwrap_or_default(),
            tokens: list(obj, "tokens"),
            selected_token_id: field(obj, "selectedTokenId"),
            effects: list(obj, "effects"),
            selected_effect_id: field(obj, "selectedEffectId"),
            fog: obj.get("fog").and_then(decode_fog),
            zoom: obj.get("zoom").map(decode_zoom).unwrap_or_default(),
        }
    }
}

fn decode_fog(value: &Value) -> Option<FogState> {
    if value.is_null() {
        return None;
    }
    let Some(obj) = value.as_object() else {
        log::warn!("SCENE: malformed `fog`, using default");
        return None;
    };
    Some(FogState {
        is_enabled: field(obj, "isEnabled").unwrap_or(false),
        darkness_areas: list::<Polygon>(obj, "darknessAreas"),
    })
}

fn decode_grid(value: &Value) -> GridConfig {
    let defaults = GridConfig::default();
    let Some(obj) = value.as_object() else {
        if !value.is_null() {
            log::warn!("SCENE: malformed `grid`, using default");
        }
        return defaults;
    };
    GridConfig {
        rows: field(obj, "rows").unwrap_or(defaults.rows),
        columns: field(obj, "columns").unwrap_or(defaults.columns),
        opacity: field(obj, "opacity").unwrap_or(defaults.opacity),
        color: field(obj, "color").unwrap_or(defaults.color),
        visible: field(obj, "visible").unwrap_or(defaults.visible),
    }
    .sanitized()
}

fn decode_zoom(value: &Value) -> ZoomState {
    let defaults = ZoomState::default();
    let Some(obj) = value.as_object() else {
        if !value.is_null() {
            log::warn!("SCENE: malformed `zoom`, using default");
        }
        return defaults;
    };
    ZoomState {
        level: field(obj, "level").unwrap_or(defaults.level),
        pan_x: field(obj, "panX").unwrap_or(defaults.pan_x),
        pan_y: field(obj, "panY").unwrap_or(defaults.pan_y),
    }
    .sanitized()
}

/// Decodes one optional field; `null` and absent are both `None`.
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = obj.get(key)?;
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value(raw.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("SCENE: malformed `{}` ({}), using default", key, e);
            None
        }
    }
}

/// Decodes an array, skipping elements that do not parse.
fn list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(raw) = obj.get(key) else {
        return Vec::new();
    };
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            log::warn!("SCENE: `{}` is not an array, using empty list", key);
        }
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("SCENE: dropping malformed {}[{}] ({})", key, i, e);
                None
            }
        })
        .collect()
}
