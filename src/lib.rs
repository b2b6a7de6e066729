//! Lunar Lab - simulation core for interactive space-science chapters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (crater deformation, debris, erosion, orbits, tour)
//! - `platform`: Browser bindings exposing the chapters to an external renderer
//! - `settings`: Data-driven chapter configuration

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Lunar cycle length in simulated days
    pub const LUNAR_CYCLE: f32 = 28.0;
    /// Planet rotation period in simulated days
    pub const EARTH_DAY: f32 = 1.0;
    /// Minutes in one simulated day
    pub const MINUTES_PER_DAY: f32 = 1440.0;
    /// Minute stepping is flushed in quanta of this size
    pub const MINUTE_QUANTUM: f32 = 5.0;

    /// Crater chapter moon radius
    pub const MOON_RADIUS: f32 = 100.0;
    /// Distance from moon center where meteors spawn
    pub const METEOR_SPAWN_RADIUS: f32 = 250.0;
    /// Slider velocity is divided by this to get units per tick
    pub const METEOR_VELOCITY_SCALE: f32 = 20.0;
    /// Debris pull toward the moon center (units/tick²)
    pub const DEBRIS_GRAVITY: f32 = 0.01;
    /// Minimum debris lifetime in ticks
    pub const DEBRIS_MIN_LIFE: u32 = 100;
    /// Random extra debris lifetime (exclusive upper bound)
    pub const DEBRIS_LIFE_JITTER: u32 = 100;

    /// Erosion terrain plane size
    pub const TERRAIN_SIZE: f32 = 20.0;
    /// Water plane resolution
    pub const WATER_SEGMENTS: u32 = 64;
    /// Initial water level below the reference plane
    pub const WATER_START_LEVEL: f32 = -1.5;
    /// Water stops rising at this level
    pub const WATER_MAX_LEVEL: f32 = -0.1;
    /// Elapsed-time increment per erosion tick
    pub const EROSION_TIME_STEP: f32 = 0.01;
    /// Wave phase increment per erosion tick
    pub const WATER_TIME_STEP: f32 = 0.02;

    /// Moon orbit radius in the phase chapter
    pub const MOON_ORBIT_RADIUS: f32 = 20.0;
    /// Planet radius in the phase chapter (observer sits on it)
    pub const PLANET_RADIUS: f32 = 5.0;
}

/// Cubic Hermite blend `3t² - 2t³`
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert spherical (r, polar phi from +Y, azimuth theta) to cartesian
#[inline]
pub fn spherical_to_cartesian(r: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(r * sin_phi * theta.sin(), r * phi.cos(), r * sin_phi * theta.cos())
}

/// Point on a horizontal (XZ) circle
#[inline]
pub fn orbit_point(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-5);
        assert!(wrap_angle(TAU).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn test_spherical_axes() {
        // phi = 0 points up the +Y axis
        let up = spherical_to_cartesian(10.0, 0.0, 0.0);
        assert!((up - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-4);
        // phi = 90°, theta = 0 lies on +Z
        let front = spherical_to_cartesian(10.0, FRAC_PI_2, 0.0);
        assert!((front - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
        // theta = 90° rotates onto +X
        let side = spherical_to_cartesian(10.0, FRAC_PI_2, FRAC_PI_2);
        assert!((side - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    }
}
