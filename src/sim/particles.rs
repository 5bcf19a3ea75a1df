//! Cosmetic particle feed
//!
//! Purely visual. Has its own RNG so bursts never perturb task generation,
//! and a cap of 0 turns the whole thing into a no-op.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{EXPLOSION_PARTICLES, EXPLOSION_SPEED, MAX_PARTICLES, PARTICLE_DECAY};

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, removed at or below 0
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    cap: usize,
    rng: Pcg32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(0, MAX_PARTICLES)
    }
}

impl ParticleField {
    pub fn new(seed: u64, cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            cap,
            // Decorrelate from the gameplay stream seeded with the same value
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap; existing particles beyond it are dropped
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.particles.truncate(cap);
    }

    /// Emit a solve explosion at `pos`
    pub fn burst(&mut self, pos: Vec2, color: u32) {
        for _ in 0..EXPLOSION_PARTICLES {
            if self.particles.len() >= self.cap {
                break;
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * EXPLOSION_SPEED,
                (self.rng.random::<f32>() - 0.5) * EXPLOSION_SPEED,
            );
            self.particles.push(Particle {
                pos,
                vel,
                life: 1.0,
                color,
            });
        }
    }

    /// Integrate one tick and drop dead particles
    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.life -= PARTICLE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
