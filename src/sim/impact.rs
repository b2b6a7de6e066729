//! Impact chapter state and per-frame tick
//!
//! Owns the moon mesh, at most one meteor in flight and the debris set.
//! Created when the chapter is entered and dropped when it is left.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::crater::{CraterPreset, CraterProfile, apply_impact, apply_spherical_crater};
use super::debris::{DebrisParticle, spawn_debris, step_particles};
use super::mesh::Mesh;
use super::meteor::{ImpactEvent, Meteor, impact_energy};
use crate::consts::MOON_RADIUS;
use crate::settings::Settings;

/// Something the renderer may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// The meteor hit and the surface was deformed
    Impact {
        event: ImpactEvent,
        displaced_vertices: usize,
        debris_spawned: usize,
    },
    /// Debris particles reached the end of their life this tick
    DebrisExpired(usize),
}

/// Impact chapter simulation
#[derive(Debug, Clone)]
pub struct CraterSim {
    pub moon: Mesh,
    original: Vec<Vec3>,
    pub meteor: Option<Meteor>,
    pub debris: Vec<DebrisParticle>,
    pub center: Vec3,
    pub crater_preset: CraterPreset,
    /// Simulation tick counter
    pub time_ticks: u64,
    seed: u64,
    rng: Pcg32,
}

impl CraterSim {
    /// Build the moon at the resolution chosen in `settings`
    pub fn new(settings: &Settings) -> Self {
        let segments = settings.quality.sphere_segments();
        let mut sim = Self::with_mesh(Mesh::uv_sphere(MOON_RADIUS, segments, segments), settings.seed);
        sim.crater_preset = settings.crater_preset;
        sim
    }

    /// Build around an existing sphere mesh centered at the origin
    pub fn with_mesh(moon: Mesh, seed: u64) -> Self {
        let original = moon.positions.clone();
        Self {
            moon,
            original,
            meteor: None,
            debris: Vec::new(),
            center: Vec3::ZERO,
            crater_preset: CraterPreset::MassScaled,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Launch a meteor, replacing any still in flight.
    ///
    /// Returns the collision energy readout.
    pub fn collide(&mut self, mass: f32, velocity: f32, theta_deg: f32, phi_deg: f32) -> f32 {
        if self.meteor.is_some() {
            log::debug!("Replacing meteor still in flight");
        }
        self.meteor = Some(Meteor::launch(self.center, mass, velocity, theta_deg, phi_deg));
        let energy = impact_energy(mass, velocity);
        log::info!(
            "Meteor launched: mass={mass}, velocity={velocity}, theta={theta_deg}, phi={phi_deg}, energy={}",
            energy.round()
        );
        energy
    }

    /// Deform the moon and spawn debris for an impact right now
    pub fn impact(&mut self, event: ImpactEvent) -> SimEvent {
        let displaced_vertices = match self.crater_preset {
            CraterPreset::MassScaled => apply_impact(&mut self.moon, event.position, event.mass),
            CraterPreset::Fixed => apply_spherical_crater(
                &mut self.moon,
                event.position,
                &CraterProfile::erosion_fixed(),
            ),
        };
        let burst = spawn_debris(&mut self.rng, event.position, event.mass);
        let debris_spawned = burst.len();
        self.debris.extend(burst);
        log::info!(
            "Impact at {:?}: {} vertices displaced, {} debris",
            event.position,
            displaced_vertices,
            debris_spawned
        );
        SimEvent::Impact {
            event,
            displaced_vertices,
            debris_spawned,
        }
    }

    /// Advance one frame: meteor flight, impact, then debris
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        self.time_ticks += 1;

        if let Some(meteor) = self.meteor.as_mut() {
            if let Some(hit) = meteor.step(self.center, MOON_RADIUS) {
                self.meteor = None;
                events.push(self.impact(hit));
            }
        }

        let expired = step_particles(&mut self.debris, self.center);
        if expired > 0 {
            events.push(SimEvent::DebrisExpired(expired));
        }

        events
    }

    /// Restore the pristine moon and clear meteor and debris
    pub fn reset(&mut self) {
        self.moon.restore(&self.original);
        self.debris.clear();
        self.meteor = None;
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        log::info!("Crater simulation reset");
    }

    /// Pristine vertex positions captured at creation
    pub fn original_positions(&self) -> &[Vec3] {
        &self.original
    }
}
