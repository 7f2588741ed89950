pub mod scene_storage;

pub use scene_storage::{delete_scene, load_scene, save_scene, scene_exists, scene_path};
