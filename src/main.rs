//! Headless driver: loads settings and the last scene, runs the ambient
//! particle loop for a moment and writes the scene back.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tabletop_scene::logic::{ParticleLoop, ParticleSimulator, SceneSession, Scheduler, SystemClock};
use tabletop_scene::models::settings::{SETTINGS_FILE, ViewerSettings};
use tabletop_scene::state::SceneState;
use tabletop_scene::storage::{load_scene, save_scene, scene_exists};
use tabletop_scene::system::SceneBus;

/// Frames run before the scene is saved back.
const FRAMES: u32 = 60;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    log::info!("MAIN: Booting tabletop-scene...");

    let settings = ViewerSettings::load(Path::new(SETTINGS_FILE));
    let dir = settings.storage.scene_dir.as_path();
    let key = settings.storage.default_scene.as_str();

    let mut session = SceneSession::new(SceneState::with_settings(&settings), SceneBus::new());
    if scene_exists(dir, key) {
        match load_scene(dir, key) {
            Ok(snapshot) => session.restore(snapshot),
            Err(e) => log::error!("MAIN: could not read scene {}: {}", key, e),
        }
    } else {
        log::info!("MAIN: no saved scene {}, starting empty", key);
    }

    let mut params = settings.particles;
    params.canvas = session.scene().canvas;

    let mut scheduler = Scheduler::new(SystemClock::new());
    let mut field = ParticleLoop::new(ParticleSimulator::new(params));
    field.configure(&mut scheduler, params);

    for _ in 0..FRAMES {
        scheduler.run_frame();
        thread::sleep(FRAME_TIME);
    }
    log::info!(
        "MAIN: {} frames done, {} particles live",
        FRAMES,
        field.simulator().particles().len()
    );
    field.stop();

    // Drain the persistence queue; the newest record is what gets written.
    let record = session
        .bus()
        .latest_persisted()
        .unwrap_or_else(|| session.snapshot());
    match save_scene(dir, key, &record) {
        Ok(path) => log::info!("MAIN: scene written to {}", path.display()),
        Err(e) => log::error!("MAIN: failed to save scene {}: {}", key, e),
    }
}
