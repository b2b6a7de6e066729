//! Incoming meteor flight for the impact chapter

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{METEOR_SPAWN_RADIUS, METEOR_VELOCITY_SCALE};
use crate::spherical_to_cartesian;

/// A consumed meteor, ready to deform the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEvent {
    pub position: Vec3,
    pub mass: f32,
}

/// A meteor travelling in a straight line toward the moon center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec3,
    /// Units per tick
    pub vel: Vec3,
    pub mass: f32,
}

impl Meteor {
    /// Spawn on the launch sphere and aim at `target`.
    ///
    /// `phi_deg` is the polar angle from +Y, `theta_deg` the azimuth.
    /// Slider velocity is scaled down to units per tick.
    pub fn launch(target: Vec3, mass: f32, velocity: f32, theta_deg: f32, phi_deg: f32) -> Self {
        let pos = target
            + spherical_to_cartesian(
                METEOR_SPAWN_RADIUS,
                phi_deg.to_radians(),
                theta_deg.to_radians(),
            );
        let vel = (target - pos).normalize_or_zero() * (velocity / METEOR_VELOCITY_SCALE);
        Self { pos, vel, mass }
    }

    /// Visual radius of the meteor body
    #[inline]
    pub fn visual_radius(&self) -> f32 {
        self.mass / 10.0
    }

    /// Advance one tick; returns the impact once the meteor reaches the surface
    pub fn step(&mut self, center: Vec3, surface_radius: f32) -> Option<ImpactEvent> {
        self.pos += self.vel;
        if self.pos.distance(center) <= surface_radius {
            Some(ImpactEvent {
                position: self.pos,
                mass: self.mass,
            })
        } else {
            None
        }
    }
}

/// Kinetic energy readout shown alongside a launch
#[inline]
pub fn impact_energy(mass: f32, velocity: f32) -> f32 {
    0.5 * mass * velocity * velocity
}
