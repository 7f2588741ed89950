//! Ambient particle field (sand, leaves, snow, ...).
//!
//! The field is reseeded whenever its driving parameters change and is then
//! stepped once per frame. Steps are normalised to 16 ms so the motion looks
//! the same at any frame rate.

use std::cell::{Ref, RefCell};
use std::f32::consts::TAU;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::particle::{Particle, ParticleParams, ParticleTypeConfig};
use crate::state::traits::{Snapshot, Update};

use super::scheduler::{CancellationToken, FrameClock, Scheduler};

/// Nominal frame length the update law is normalised to.
pub const STEP_MS: f64 = 16.0;
/// Largest step multiplier; long stalls do not teleport particles.
pub const MAX_DELTA: f64 = 2.0;
/// Distance past an edge before a particle wraps.
pub const WRAP_MARGIN: f32 = 10.0;
/// Scale of the per-step velocity perturbation.
const DRIFT: f32 = 0.1;

pub struct ParticleSimulator {
    params: ParticleParams,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSimulator {
    pub fn new(params: ParticleParams) -> Self {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Reproducible field, for tests and previews.
    pub fn with_seed(params: ParticleParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: ParticleParams, rng: StdRng) -> Self {
        let mut sim = Self {
            params,
            particles: Vec::new(),
            rng,
        };
        sim.reseed();
        sim
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Applies new parameters; reseeds only when they differ.
    pub fn set_params(&mut self, params: ParticleParams) -> bool {
        if params == self.params {
            return false;
        }
        self.reset(params);
        true
    }

    /// Applies parameters and always reseeds.
    pub fn reset(&mut self, params: ParticleParams) {
        self.params = params;
        self.reseed();
    }

    fn reseed(&mut self) {
        let count = if self.params.canvas.is_valid() {
            self.params.population()
        } else {
            0
        };
        let cfg = self.params.particle_type.config();
        let (width, height) = self.canvas();
        let speed = self.speed();

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = spawn(&mut self.rng, cfg, width, height, speed);
            self.particles.push(particle);
        }
        log::debug!(
            "PARTICLES: seeded {} {:?} particles",
            self.particles.len(),
            self.params.particle_type
        );
    }

    /// Advances every particle by one time step.
    pub fn step(&mut self, dt_ms: f64) {
        let delta = step_delta(dt_ms) as f32;
        let cfg = self.params.particle_type.config();
        let (width, height) = self.canvas();
        let speed = self.speed();
        let terminal = terminal_velocity(cfg, speed);

        for p in self.particles.iter_mut() {
            p.x += p.vx * delta;
            p.y += p.vy * delta;
            p.rotation += p.rotation_speed * delta;

            // Gusts sideways, steady pull vertically.
            let gust = self.rng.random_range(-1.0f32..1.0);
            p.vx += cfg.wind * speed * gust * delta * DRIFT;
            p.vy += cfg.gravity * speed * delta * DRIFT;
            p.vx = p.vx.clamp(-terminal, terminal);
            p.vy = p.vy.clamp(-terminal, terminal);

            wrap(p, &mut self.rng, width, height);
        }
    }

    fn canvas(&self) -> (f32, f32) {
        (
            self.params.canvas.width as f32,
            self.params.canvas.height as f32,
        )
    }

    fn speed(&self) -> f32 {
        if self.params.speed.is_finite() {
            self.params.speed.max(0.0)
        } else {
            1.0
        }
    }
}

impl Update for ParticleSimulator {
    fn update(&mut self, dt_ms: f64) {
        self.step(dt_ms);
    }
}

/// `clamp(dt / 16ms, 0, 2)`
pub fn step_delta(dt_ms: f64) -> f64 {
    if dt_ms.is_nan() {
        return 0.0;
    }
    (dt_ms / STEP_MS).clamp(0.0, MAX_DELTA)
}

fn terminal_velocity(cfg: &ParticleTypeConfig, speed: f32) -> f32 {
    cfg.speed.1 * (1.0 + cfg.wind.abs().max(cfg.gravity.abs())) * speed.max(f32::EPSILON)
}

fn spawn(
    rng: &mut StdRng,
    cfg: &ParticleTypeConfig,
    width: f32,
    height: f32,
    speed: f32,
) -> Particle {
    let base = sample(rng, cfg.speed);
    Particle {
        x: sample(rng, (0.0, width)),
        y: sample(rng, (0.0, height)),
        vx: (cfg.wind * base + sample(rng, (-0.5, 0.5))) * speed,
        vy: (cfg.gravity * base + sample(rng, (-0.5, 0.5))) * speed,
        size: sample(rng, cfg.size),
        opacity: sample(rng, cfg.opacity),
        color: cfg.colors[rng.random_range(0..cfg.colors.len())],
        rotation: sample(rng, (0.0, TAU)),
        rotation_speed: sample(rng, (-0.05, 0.05)),
    }
}

/// Re-enters from the opposite edge at a random spot along it.
fn wrap(p: &mut Particle, rng: &mut StdRng, width: f32, height: f32) {
    if p.x < -WRAP_MARGIN {
        p.x = width + WRAP_MARGIN;
        p.y = sample(rng, (0.0, height));
    } else if p.x > width + WRAP_MARGIN {
        p.x = -WRAP_MARGIN;
        p.y = sample(rng, (0.0, height));
    }

    if p.y < -WRAP_MARGIN {
        p.y = height + WRAP_MARGIN;
        p.x = sample(rng, (0.0, width));
    } else if p.y > height + WRAP_MARGIN {
        p.y = -WRAP_MARGIN;
        p.x = sample(rng, (0.0, width));
    }
}

fn sample(rng: &mut StdRng, (min, max): (f32, f32)) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// A particle field bound to the frame scheduler.
///
/// Reconfiguring cancels the running generation before reseeding, so two
/// generations never step at once. Dropping the loop cancels it too.
pub struct ParticleLoop {
    sim: Rc<RefCell<ParticleSimulator>>,
    handle: Option<CancellationToken>,
    generation: u64,
}

impl ParticleLoop {
    pub fn new(sim: ParticleSimulator) -> Self {
        Self {
            sim: Rc::new(RefCell::new(sim)),
            handle: None,
            generation: 0,
        }
    }

    /// Starts (or restarts) the loop with `params`.
    ///
    /// Unchanged parameters with a live loop are a no-op. A disabled
    /// configuration stops the loop and empties the field.
    pub fn configure<C: FrameClock>(
        &mut self,
        scheduler: &mut Scheduler<C>,
        params: ParticleParams,
    ) {
        let running = self.handle.as_ref().is_some_and(|h| !h.is_cancelled());
        if running && self.sim.borrow().params() == &params {
            return;
        }

        self.stop();
        self.sim.borrow_mut().reset(params);
        if !params.enabled {
            return;
        }

        let sim = Rc::clone(&self.sim);
        self.handle = Some(scheduler.schedule_repeating(move |dt| sim.borrow_mut().update(dt)));
        self.generation += 1;
        log::info!(
            "PARTICLES: generation {} started ({:?}, intensity {:.2}, {} particles)",
            self.generation,
            params.particle_type,
            params.intensity,
            params.population()
        );
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn simulator(&self) -> Ref<'_, ParticleSimulator> {
        self.sim.borrow()
    }
}

impl Drop for ParticleLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Snapshot for ParticleLoop {
    type Output = Vec<Particle>;

    fn create_snapshot(&self) -> Vec<Particle> {
        self.sim.borrow().particles().to_vec()
    }
}
