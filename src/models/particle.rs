//! Ambient particle types and their per-type tuning table.

use serde::{Deserialize, Serialize};

use super::geometry::CanvasSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticleType {
    #[default]
    Sand,
    Leaves,
    GreenLeaves,
    Wind,
    Snow,
    Dust,
    Sparks,
}

impl ParticleType {
    pub const ALL: [ParticleType; 7] = [
        ParticleType::Sand,
        ParticleType::Leaves,
        ParticleType::GreenLeaves,
        ParticleType::Wind,
        ParticleType::Snow,
        ParticleType::Dust,
        ParticleType::Sparks,
    ];

    pub fn config(self) -> &'static ParticleTypeConfig {
        match self {
            ParticleType::Sand => &SAND,
            ParticleType::Leaves => &LEAVES,
            ParticleType::GreenLeaves => &GREEN_LEAVES,
            ParticleType::Wind => &WIND,
            ParticleType::Snow => &SNOW,
            ParticleType::Dust => &DUST,
            ParticleType::Sparks => &SPARKS,
        }
    }
}

/// Tuning for one particle type. Ranges are `(min, max)`; speeds are in
/// canvas pixels per 16 ms step.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTypeConfig {
    pub colors: &'static [&'static str],
    pub size: (f32, f32),
    pub speed: (f32, f32),
    pub gravity: f32,
    pub wind: f32,
    pub opacity: (f32, f32),
}

const SAND: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#c2b280", "#d2b48c", "#e0c9a6", "#b8a07e"],
    size: (1.0, 3.0),
    speed: (0.5, 2.0),
    gravity: 0.1,
    wind: 1.5,
    opacity: (0.4, 0.8),
};

const LEAVES: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#8b4513", "#a0522d", "#cd853f", "#d2691e", "#b8860b"],
    size: (4.0, 8.0),
    speed: (0.5, 1.5),
    gravity: 0.3,
    wind: 1.0,
    opacity: (0.6, 0.9),
};

const GREEN_LEAVES: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#228b22", "#32cd32", "#6b8e23", "#556b2f"],
    size: (4.0, 8.0),
    speed: (0.5, 1.5),
    gravity: 0.3,
    wind: 1.0,
    opacity: (0.6, 0.9),
};

const WIND: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#ffffff", "#e0e0e0", "#f0f8ff"],
    size: (1.0, 2.0),
    speed: (2.0, 5.0),
    gravity: 0.0,
    wind: 3.0,
    opacity: (0.1, 0.3),
};

const SNOW: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#ffffff", "#f0f8ff", "#e6f2ff"],
    size: (2.0, 5.0),
    speed: (0.3, 1.0),
    gravity: 0.5,
    wind: 0.3,
    opacity: (0.6, 1.0),
};

const DUST: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#a9a9a9", "#c0c0c0", "#d3d3d3", "#bdb76b"],
    size: (1.0, 3.0),
    speed: (0.1, 0.5),
    gravity: 0.05,
    wind: 0.2,
    opacity: (0.2, 0.5),
};

const SPARKS: ParticleTypeConfig = ParticleTypeConfig {
    colors: &["#ffd700", "#ffa500", "#ff4500", "#ffff00"],
    size: (1.0, 3.0),
    speed: (1.0, 3.0),
    gravity: -0.5,
    wind: 0.2,
    opacity: (0.7, 1.0),
};

/// One simulated sprite. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub opacity: f32,
    pub color: &'static str,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Inputs that drive the simulation. Any change reseeds the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleParams {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub particle_type: ParticleType,
    pub intensity: f32,
    pub speed: f32,
    #[serde(skip)]
    pub canvas: CanvasSize,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            enabled: false,
            particle_type: ParticleType::Sand,
            intensity: 0.5,
            speed: 1.0,
            canvas: CanvasSize::default(),
        }
    }
}

impl ParticleParams {
    /// `floor(50 + intensity * 150)`, or zero while disabled.
    pub fn population(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        let intensity = if self.intensity.is_nan() {
            0.0
        } else {
            self.intensity.clamp(0.0, 1.0)
        };
        (50.0 + intensity * 150.0).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_formula() {
        let mut params = ParticleParams {
            enabled: true,
            ..ParticleParams::default()
        };
        params.intensity = 0.5;
        assert_eq!(params.population(), 125);
        params.intensity = 0.0;
        assert_eq!(params.population(), 50);
        params.intensity = 1.0;
        assert_eq!(params.population(), 200);
        params.intensity = 7.0;
        assert_eq!(params.population(), 200);
        params.enabled = false;
        assert_eq!(params.population(), 0);
    }

    #[test]
    fn every_type_has_sane_ranges() {
        for kind in ParticleType::ALL {
            let cfg = kind.config();
            assert!(!cfg.colors.is_empty(), "{:?}", kind);
            assert!(cfg.size.0 <= cfg.size.1);
            assert!(cfg.speed.0 <= cfg.speed.1);
            assert!(cfg.opacity.0 >= 0.0 && cfg.opacity.1 <= 1.0);
        }
    }
}
