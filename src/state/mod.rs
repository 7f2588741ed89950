//! State management module.
//!
//! This module contains the scene sub-stores and their reducers:
//! - `EntityStore` - Tokens and effects
//! - `FogEditor` - Darkness polygons and the authoring workflow
//! - `SceneState` - The whole scene, plus `SceneAssembler`
//!
//! Each store mutates only through commands (`Apply`) and exposes snapshots.

pub mod entity_store;
pub mod fog;
pub mod ids;
pub mod scene;
pub mod traits;

// Re-exports for convenient access
pub use entity_store::{EntityCommand, EntityStore};
pub use fog::{FogCommand, FogEditor, FogMode, FogTool};
pub use scene::{GridCommand, SceneAssembler, SceneCommand, SceneState, ZoomCommand};
pub use traits::{Apply, Snapshot, Update};
