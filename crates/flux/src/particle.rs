//! Particle records and the fixed-size pool that owns them.
//!
//! A particle's identity is its index in the pool. Dead particles are never
//! removed; their slot is overwritten in place by a fresh one, so the pool
//! length only changes when a new [`ParticleStore`] is built.

use glam::DVec2;
use magnaflux_core::palette::ParticleHue;
use magnaflux_core::prng::RandomSource;
use magnaflux_core::state::FieldState;

/// Shortest life a new particle can get, in frames at 0.5 decay per frame.
pub const LIFE_MIN: f64 = 50.0;
/// Upper bound (exclusive) of a new particle's life.
pub const LIFE_MAX: f64 = 150.0;

/// One simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub life: f64,
    /// Chosen at creation from the state of that moment, then frozen.
    pub hue: ParticleHue,
}

impl Particle {
    /// A fresh particle somewhere inside `size`.
    ///
    /// Position is uniform over the surface, each velocity component uniform
    /// in [-1, 1), life uniform in [50, 150).
    pub fn spawn(size: DVec2, state: &FieldState, rng: &mut dyn RandomSource) -> Particle {
        let pos = DVec2::new(rng.next_f64() * size.x, rng.next_f64() * size.y);
        let vel = DVec2::new(rng.next_signed(), rng.next_signed());
        let life = rng.next_range(LIFE_MIN, LIFE_MAX);
        Particle {
            pos,
            vel,
            life,
            hue: ParticleHue::select(state),
        }
    }

    /// Whether position, velocity and life are all finite.
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.life.is_finite()
    }
}

/// Fixed-capacity pool of particles.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Fills a pool of `count` fresh particles.
    pub fn populate(
        count: usize,
        size: DVec2,
        state: &FieldState,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(size, state, rng))
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Overwrites slot `index` with a fresh particle created from `state`.
    ///
    /// Out-of-range indices are ignored.
    pub fn respawn(
        &mut self,
        index: usize,
        size: DVec2,
        state: &FieldState,
        rng: &mut dyn RandomSource,
    ) {
        if let Some(slot) = self.particles.get_mut(index) {
            *slot = Particle::spawn(size, state, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnaflux_core::prng::{FixedSequence, Xorshift64};

    fn size() -> DVec2 {
        DVec2::new(800.0, 600.0)
    }

    #[test]
    fn spawn_uses_random_draws_in_order() {
        // x, y, vx, vy, life
        let mut rng = FixedSequence::new(vec![0.5, 0.25, 0.75, 0.0, 0.5]);
        let p = Particle::spawn(size(), &FieldState::default(), &mut rng);
        assert_eq!(p.pos, DVec2::new(400.0, 150.0));
        assert_eq!(p.vel, DVec2::new(0.5, -1.0));
        assert_eq!(p.life, 100.0);
        assert_eq!(p.hue, ParticleHue::Ambient);
    }

    #[test]
    fn spawn_stays_inside_bounds() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..500 {
            let p = Particle::spawn(size(), &FieldState::default(), &mut rng);
            assert!(p.pos.x >= 0.0 && p.pos.x < 800.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 600.0);
            assert!(p.vel.x >= -1.0 && p.vel.x < 1.0);
            assert!(p.life >= LIFE_MIN && p.life < LIFE_MAX);
        }
    }

    #[test]
    fn hue_is_frozen_at_creation() {
        let mut rng = Xorshift64::new(5);
        let entangled = FieldState {
            entanglement: 90.0,
            ..FieldState::default()
        };
        let store = ParticleStore::populate(10, size(), &entangled, &mut rng);
        assert!(store.iter().all(|p| p.hue == ParticleHue::Entangled));
    }

    #[test]
    fn respawn_replaces_in_place_with_current_state() {
        let mut rng = Xorshift64::new(5);
        let mut store = ParticleStore::populate(3, size(), &FieldState::default(), &mut rng);
        let charged = FieldState {
            energy_level: 190.0,
            ..FieldState::default()
        };
        store.respawn(1, size(), &charged, &mut rng);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().hue, ParticleHue::Ambient);
        assert_eq!(store.get(1).unwrap().hue, ParticleHue::Charged);
        store.respawn(99, size(), &charged, &mut rng);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn non_finite_particle_is_detected() {
        let mut rng = Xorshift64::new(1);
        let mut p = Particle::spawn(size(), &FieldState::default(), &mut rng);
        assert!(p.is_finite());
        p.vel.x = f64::NAN;
        assert!(!p.is_finite());
        p.vel.x = 0.0;
        p.life = f64::INFINITY;
        assert!(!p.is_finite());
    }

    #[test]
    fn empty_pool() {
        let mut rng = Xorshift64::new(1);
        let store = ParticleStore::populate(0, size(), &FieldState::default(), &mut rng);
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }
}
