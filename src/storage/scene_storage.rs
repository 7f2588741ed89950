//! Scene file storage.
//!
//! Scenes are stored as pretty-printed JSON in `{dir}/{key}.json`. A file
//! whose content cannot be understood loads as an empty scene rather than
//! failing; only I/O problems are reported as errors.

use crate::shared::snapshot::SceneSnapshot;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

/// Get the path for a scene file given its key.
pub fn scene_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", key))
}

fn check_key(key: &str) -> std::io::Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("Invalid scene key: {:?}", key),
        ))
    }
}

/// Save a scene record. Returns the path written.
pub fn save_scene(dir: &Path, key: &str, snapshot: &SceneSnapshot) -> std::io::Result<PathBuf> {
    check_key(key)?;
    fs::create_dir_all(dir)?;

    let json = snapshot.to_json().map_err(|e| {
        Error::new(
            ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )
    })?;

    let path = scene_path(dir, key);
    fs::write(&path, json)?;
    log::info!("STORE: saved scene {} to {}", key, path.display());
    Ok(path)
}

/// Load a scene record. Unparseable content yields the default scene.
pub fn load_scene(dir: &Path, key: &str) -> std::io::Result<SceneSnapshot> {
    check_key(key)?;
    let path = scene_path(dir, key);
    let text = fs::read_to_string(&path)?;

    match SceneSnapshot::from_json(&text) {
        Ok(snapshot) => {
            log::info!("STORE: loaded scene {} from {}", key, path.display());
            Ok(snapshot)
        }
        Err(e) => {
            log::error!(
                "STORE: {} is corrupt ({}), starting from an empty scene",
                path.display(),
                e
            );
            Ok(SceneSnapshot::default())
        }
    }
}

/// Delete a scene file.
pub fn delete_scene(dir: &Path, key: &str) -> std::io::Result<()> {
    check_key(key)?;
    let path = scene_path(dir, key);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Check if a scene file exists.
pub fn scene_exists(dir: &Path, key: &str) -> bool {
    check_key(key).is_ok() && scene_path(dir, key).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{Entity, Token, TokenDraft};
    use crate::models::fog::{FogState, Polygon};
    use crate::models::geometry::Point;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("tabletop-scene-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample() -> SceneSnapshot {
        let token = Token::from_draft("token-1".into(), TokenDraft::new("hero.png", 60.0, 140.0));
        SceneSnapshot {
            map_image_ref: Some("map.png".into()),
            tokens: vec![token],
            selected_token_id: Some("token-1".into()),
            fog: Some(FogState {
                is_enabled: true,
                darkness_areas: vec![Polygon {
                    id: "fog-1".into(),
                    points: vec![
                        Point::new(0.0, 0.0),
                        Point::new(10.0, 0.0),
                        Point::new(10.0, 10.0),
                    ],
                }],
            }),
            ..SceneSnapshot::default()
        }
    }

    #[test]
    fn test_save_load_delete() {
        let dir = temp_dir("roundtrip");
        let data = sample();

        // Save
        let path = save_scene(&dir, "keep", &data).unwrap();
        assert!(path.exists());
        assert!(scene_exists(&dir, "keep"));

        // Load
        let loaded = load_scene(&dir, "keep").unwrap();
        assert_eq!(loaded, data);

        // Cleanup
        delete_scene(&dir, "keep").unwrap();
        assert!(!scene_exists(&dir, "keep"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_loads_as_default() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(scene_path(&dir, "broken"), "{ \"tokens\": [").unwrap();

        assert_eq!(load_scene(&dir, "broken").unwrap(), SceneSnapshot::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = temp_dir("missing");
        let err = load_scene(&dir, "nothing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(delete_scene(&dir, "nothing").is_ok());
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let dir = temp_dir("keys");
        let err = save_scene(&dir, "../evil", &SceneSnapshot::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!scene_exists(&dir, ""));
    }
}
