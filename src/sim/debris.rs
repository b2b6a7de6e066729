//! Ballistic impact debris
//!
//! Particles are spawned in a burst at the impact point and fall back
//! toward a gravity center until their lifetime runs out.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DEBRIS_GRAVITY, DEBRIS_LIFE_JITTER, DEBRIS_MIN_LIFE};

/// A single debris particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebrisParticle {
    pub pos: Vec3,
    /// Units per tick
    pub vel: Vec3,
    /// Ticks left before removal
    pub life: u32,
    /// Render radius (visual only)
    pub size: f32,
}

/// Number of particles an impact of `mass` produces
#[inline]
pub fn debris_count(mass: f32) -> usize {
    if mass.is_finite() && mass > 0.0 {
        (mass * 2.0).floor() as usize
    } else {
        0
    }
}

/// Spawn the debris burst for an impact.
///
/// Each particle starts at `position` with a random velocity in
/// `[-mass/10, mass/10]³` plus an outward kick along `normalize(position)`
/// of up to `mass/10`.
pub fn spawn_debris<R: Rng>(rng: &mut R, position: Vec3, mass: f32) -> Vec<DebrisParticle> {
    let count = debris_count(mass);
    let spread = mass / 10.0;
    let outward = position.normalize_or_zero();

    (0..count)
        .map(|_| {
            let jitter = Vec3::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            );
            let kick = outward * rng.random_range(0.0..=spread);
            DebrisParticle {
                pos: position,
                vel: jitter + kick,
                life: DEBRIS_MIN_LIFE + rng.random_range(0..DEBRIS_LIFE_JITTER),
                size: 0.2 + rng.random::<f32>() * 0.5,
            }
        })
        .collect()
}

/// Advance every particle one tick and drop the expired ones.
///
/// Position integrates first, then gravity is evaluated at the new
/// position. Returns how many particles were removed.
pub fn step_particles(particles: &mut Vec<DebrisParticle>, gravity_center: Vec3) -> usize {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        let toward = (particle.pos - gravity_center).normalize_or_zero();
        particle.vel -= toward * DEBRIS_GRAVITY;
        particle.life = particle.life.saturating_sub(1);
    }

    let before = particles.len();
    particles.retain(|p| p.life > 0);
    before - particles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_count_and_life() {
        let mut rng = Pcg32::seed_from_u64(7);
        let pos = Vec3::new(0.0, 100.0, 0.0);
        let debris = spawn_debris(&mut rng, pos, 10.0);
        assert_eq!(debris.len(), 20);
        for p in &debris {
            assert!((100..200).contains(&p.life));
            assert_eq!(p.pos, pos);
            // Jitter bounded per axis, kick only adds along +Y here
            assert!(p.vel.x.abs() <= 1.0 && p.vel.z.abs() <= 1.0);
            assert!(p.vel.y >= -1.0 && p.vel.y <= 2.0);
        }
    }

    #[test]
    fn test_spawn_degenerate_mass() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(spawn_debris(&mut rng, Vec3::ONE, 0.0).is_empty());
        assert!(spawn_debris(&mut rng, Vec3::ONE, -3.0).is_empty());
        assert!(spawn_debris(&mut rng, Vec3::ONE, f32::NAN).is_empty());
        assert_eq!(debris_count(2.7), 5);
    }

    #[test]
    fn test_step_applies_gravity_toward_center() {
        let mut particles = vec![DebrisParticle {
            pos: Vec3::new(0.0, 10.0, 0.0),
            vel: Vec3::ZERO,
            life: 5,
            size: 0.3,
        }];
        step_particles(&mut particles, Vec3::ZERO);
        assert!((particles[0].vel - Vec3::new(0.0, -DEBRIS_GRAVITY, 0.0)).length() < 1e-6);
        assert_eq!(particles[0].life, 4);
    }

    #[test]
    fn test_particles_drain() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut particles = spawn_debris(&mut rng, Vec3::new(100.0, 0.0, 0.0), 25.0);
        let mut last = particles.len();
        let mut removed = 0;
        for _ in 0..(DEBRIS_MIN_LIFE + DEBRIS_LIFE_JITTER) {
            removed += step_particles(&mut particles, Vec3::ZERO);
            assert!(particles.len() <= last);
            last = particles.len();
        }
        assert!(particles.is_empty());
        assert_eq!(removed, 50);
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let a = spawn_debris(&mut Pcg32::seed_from_u64(99), Vec3::X * 100.0, 12.0);
        let b = spawn_debris(&mut Pcg32::seed_from_u64(99), Vec3::X * 100.0, 12.0);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_count_never_increases(seed in any::<u64>(), mass in 0.5f32..60.0, ticks in 1usize..250) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut particles = spawn_debris(&mut rng, Vec3::Y * 100.0, mass);
            let mut last = particles.len();
            for _ in 0..ticks {
                step_particles(&mut particles, Vec3::ZERO);
                prop_assert!(particles.len() <= last);
                last = particles.len();
            }
        }
    }
}
