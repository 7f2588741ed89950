pub mod snapshot;

pub use snapshot::{SCENE_RECORD_VERSION, SceneSnapshot};
