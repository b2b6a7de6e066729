//! Crater erosion on a planar heightfield
//!
//! Rim vertices relax multiplicatively toward the reference plane while
//! the hole fills with a multiplicative decay plus a constant inflow.
//! The inflow is not clamped at z = 0, so a hole vertex can overshoot
//! slightly above the plane before the rim branch takes it back down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::crater::{CraterProfile, apply_planar_crater};
use super::mesh::Mesh;
use crate::consts::*;
use crate::settings::Settings;

/// Per-tick rim retention with no weather
pub const RIM_DECAY_BASE: f32 = 0.998;
/// Per-tick hole retention with no weather
pub const HOLE_FILL_BASE: f32 = 0.9985;
/// Constant hole inflow per tick (scaled by speed factor)
pub const HOLE_INFLOW: f32 = 0.001;

/// Weather toggles that accelerate erosion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErosionModifiers {
    pub rain: bool,
    pub wind: bool,
}

impl ErosionModifiers {
    /// Multiplier applied to both decay rates
    pub fn speed_factor(&self) -> f32 {
        let mut factor = 1.0;
        if self.rain {
            factor *= 1.8;
        }
        if self.wind {
            factor *= 1.5;
        }
        factor
    }

    /// Per-tick rim retention
    pub fn rim_decay(&self) -> f32 {
        1.0 - (1.0 - RIM_DECAY_BASE) * self.speed_factor()
    }

    /// Per-tick hole retention
    pub fn hole_fill(&self) -> f32 {
        1.0 - (1.0 - HOLE_FILL_BASE) * self.speed_factor()
    }

    /// Drop of the erosion-remaining readout per tick
    pub fn readout_decay(&self) -> f32 {
        let mut decay = 0.02;
        if self.rain {
            decay += 0.08;
        }
        if self.wind {
            decay += 0.05;
        }
        decay
    }
}

/// Erode a heightfield by one tick around `center`.
///
/// Only vertices inside the crater footprint move. Returns the number of
/// vertices changed; normals are recomputed when any moved.
pub fn step_erosion(
    mesh: &mut Mesh,
    center: Vec2,
    profile: &CraterProfile,
    modifiers: ErosionModifiers,
) -> usize {
    if profile.is_degenerate() {
        return 0;
    }

    let speed = modifiers.speed_factor();
    let rim_decay = modifiers.rim_decay();
    let hole_fill = modifiers.hole_fill();
    let rim_reach = profile.radius + profile.rim_width;

    let mut changed = 0;
    for vertex in &mut mesh.positions {
        let distance = vertex.truncate().distance(center);
        if distance < rim_reach && vertex.z > 0.0 {
            vertex.z *= rim_decay;
            changed += 1;
        }
        if distance < profile.radius && vertex.z < 0.0 {
            vertex.z = vertex.z * hole_fill + HOLE_INFLOW * speed;
            changed += 1;
        }
    }

    if changed > 0 {
        mesh.compute_vertex_normals();
    }
    changed
}

/// Lower the erosion-remaining readout, floored at zero
#[inline]
pub fn step_erosion_readout(percent: f32, modifiers: ErosionModifiers) -> f32 {
    (percent - modifiers.readout_decay()).max(0.0)
}

/// Water surface height offset at a base grid point
pub fn water_wave_offset(x: f32, y: f32, time: f32, rain: bool) -> f32 {
    const FREQ: f32 = 0.6;
    let amplitude = if rain { 0.15 } else { 0.06 };
    ((x + y) * FREQ + time).sin() * amplitude
        + ((x - y) * (FREQ * 0.8) + time * 1.2).cos() * (amplitude * 0.6)
}

/// Erosion chapter: a static moon crater next to an eroding earth crater
#[derive(Debug, Clone)]
pub struct ErosionSim {
    pub moon: Mesh,
    pub earth: Mesh,
    pub water: Mesh,
    moon_original: Vec<glam::Vec3>,
    earth_original: Vec<glam::Vec3>,
    water_original: Vec<glam::Vec3>,
    pub profile: CraterProfile,
    pub modifiers: ErosionModifiers,
    pub playing: bool,
    /// Ticks played since the last reset
    pub elapsed_ticks: u64,
    /// Ticks of water motion; survives reset so waves never jump
    pub wave_ticks: u64,
    pub water_level: f32,
    /// Erosion-remaining readout, 100 → 0
    pub erosion_percent: f32,
}

impl ErosionSim {
    pub fn new(settings: &Settings) -> Self {
        let segments = settings.quality.plane_segments();
        let moon = Mesh::plane(TERRAIN_SIZE, TERRAIN_SIZE, segments, segments);
        let earth = moon.clone();
        let water = Mesh::plane(TERRAIN_SIZE, TERRAIN_SIZE, WATER_SEGMENTS, WATER_SEGMENTS);

        let mut sim = Self {
            moon_original: moon.positions.clone(),
            earth_original: earth.positions.clone(),
            water_original: water.positions.clone(),
            moon,
            earth,
            water,
            profile: CraterProfile::erosion_fixed(),
            modifiers: ErosionModifiers {
                rain: settings.enable_rain,
                wind: settings.enable_wind,
            },
            playing: false,
            elapsed_ticks: 0,
            wave_ticks: 0,
            water_level: WATER_START_LEVEL,
            erosion_percent: 100.0,
        };
        sim.carve();
        sim
    }

    fn carve(&mut self) {
        apply_planar_crater(&mut self.moon, Vec2::ZERO, &self.profile);
        apply_planar_crater(&mut self.earth, Vec2::ZERO, &self.profile);
    }

    /// Begin playing; no-op if already running
    pub fn start(&mut self) {
        if !self.playing {
            self.playing = true;
            log::info!("Erosion started (rain={}, wind={})", self.modifiers.rain, self.modifiers.wind);
        }
    }

    pub fn set_rain(&mut self, enabled: bool) {
        self.modifiers.rain = enabled;
    }

    pub fn set_wind(&mut self, enabled: bool) {
        self.modifiers.wind = enabled;
    }

    /// Simulated time since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed_ticks as f32 * EROSION_TIME_STEP
    }

    /// Wave phase of the water surface
    pub fn water_time(&self) -> f32 {
        self.wave_ticks as f32 * WATER_TIME_STEP
    }

    /// Elapsed time readout (`floor(elapsed * 10)`)
    pub fn display_time(&self) -> u64 {
        self.elapsed_ticks / 10
    }

    /// Rounded erosion-remaining readout
    pub fn display_percent(&self) -> u32 {
        self.erosion_percent.round() as u32
    }

    /// Advance one frame. Returns false when paused.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_ticks += 1;
        self.wave_ticks += 1;
        let water_time = self.water_time();

        step_erosion(&mut self.earth, Vec2::ZERO, &self.profile, self.modifiers);

        if self.water_level < WATER_MAX_LEVEL {
            self.water_level += if self.modifiers.rain { 0.003 } else { 0.001 };
        }

        if self.erosion_percent > 0.0 {
            self.erosion_percent = step_erosion_readout(self.erosion_percent, self.modifiers);
        }

        for (vertex, base) in self.water.positions.iter_mut().zip(&self.water_original) {
            vertex.z = base.z + water_wave_offset(base.x, base.y, water_time, self.modifiers.rain);
        }
        self.water.compute_vertex_normals();

        true
    }

    /// Stop and rebuild both craters from pristine terrain
    pub fn reset(&mut self) {
        self.playing = false;
        self.elapsed_ticks = 0;
        self.erosion_percent = 100.0;
        self.water_level = WATER_START_LEVEL;
        self.moon.restore(&self.moon_original);
        self.earth.restore(&self.earth_original);
        self.water.restore(&self.water_original);
        self.carve();
        log::info!("Erosion simulation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;

    fn cratered_plane() -> Mesh {
        let mut mesh = Mesh::plane(20.0, 20.0, 40, 40);
        apply_planar_crater(&mut mesh, Vec2::ZERO, &CraterProfile::erosion_fixed());
        mesh
    }

    #[test]
    fn test_speed_factors() {
        let calm = ErosionModifiers::default();
        assert_eq!(calm.speed_factor(), 1.0);
        assert!((calm.rim_decay() - 0.998).abs() < 1e-6);
        let storm = ErosionModifiers { rain: true, wind: true };
        assert!((storm.speed_factor() - 2.7).abs() < 1e-6);
        assert!((storm.hole_fill() - (1.0 - 0.0015 * 2.7)).abs() < 1e-6);
        assert!((storm.readout_decay() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_calm_erosion_is_monotonic() {
        let mut mesh = cratered_plane();
        let profile = CraterProfile::erosion_fixed();
        let mut prev: Vec<f32> = mesh.positions.iter().map(|p| p.z).collect();

        for _ in 0..300 {
            step_erosion(&mut mesh, Vec2::ZERO, &profile, ErosionModifiers::default());
            for (p, &before) in mesh.positions.iter().zip(&prev) {
                let d = p.truncate().length();
                if before > 0.0 && d < profile.radius + profile.rim_width {
                    assert!(p.z < before, "rim must shrink");
                    assert!(p.z >= 0.0);
                }
                if before < 0.0 && d < profile.radius {
                    assert!(p.z > before, "hole must fill");
                }
            }
            prev = mesh.positions.iter().map(|p| p.z).collect();
        }
    }

    #[test]
    fn test_flat_terrain_untouched() {
        let mut mesh = Mesh::plane(20.0, 20.0, 10, 10);
        let changed = step_erosion(
            &mut mesh,
            Vec2::ZERO,
            &CraterProfile::erosion_fixed(),
            ErosionModifiers { rain: true, wind: true },
        );
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_hole_fill_can_overshoot() {
        // A shallow hole vertex crosses the plane under the constant inflow
        let mut mesh = Mesh::plane(2.0, 2.0, 2, 2);
        mesh.positions[4].z = -0.0005;
        let profile = CraterProfile::erosion_fixed();
        step_erosion(&mut mesh, Vec2::ZERO, &profile, ErosionModifiers::default());
        assert!(mesh.positions[4].z > 0.0);
    }

    #[test]
    fn test_readout_floors_at_zero() {
        let storm = ErosionModifiers { rain: true, wind: false };
        let mut percent = 0.05;
        percent = step_erosion_readout(percent, storm);
        assert_eq!(percent, 0.0);
    }

    #[test]
    fn test_sim_tick_and_reset() {
        let settings = Settings {
            quality: QualityPreset::Low,
            enable_rain: true,
            ..Settings::default()
        };
        let mut sim = ErosionSim::new(&settings);
        let crater_floor: f32 = sim.earth.positions.iter().map(|p| p.z).fold(0.0, f32::min);
        assert!(crater_floor < -1.0);

        // Paused sim does nothing
        assert!(!sim.tick());
        sim.start();
        for _ in 0..100 {
            assert!(sim.tick());
        }
        assert_eq!(sim.display_time(), 10);
        assert!((sim.water_level - (WATER_START_LEVEL + 0.3)).abs() < 1e-3);
        assert!((sim.erosion_percent - 90.0).abs() < 1e-2);

        let eroded_floor: f32 = sim.earth.positions.iter().map(|p| p.z).fold(0.0, f32::min);
        assert!(eroded_floor > crater_floor);
        // The moon crater never erodes
        let moon_floor: f32 = sim.moon.positions.iter().map(|p| p.z).fold(0.0, f32::min);
        assert_eq!(moon_floor, crater_floor);

        sim.reset();
        assert!(!sim.playing);
        assert_eq!(sim.display_percent(), 100);
        let reset_floor: f32 = sim.earth.positions.iter().map(|p| p.z).fold(0.0, f32::min);
        assert_eq!(reset_floor, crater_floor);
    }

    #[test]
    fn test_wave_phase_survives_reset() {
        let mut sim = ErosionSim::new(&Settings::from_preset(QualityPreset::Low));
        sim.start();
        for _ in 0..30 {
            sim.tick();
        }
        let phase = sim.water_time();
        assert!((phase - 30.0 * WATER_TIME_STEP).abs() < 1e-5);

        sim.reset();
        assert_eq!(sim.elapsed_ticks, 0);
        assert_eq!(sim.display_time(), 0);
        assert_eq!(sim.water_time(), phase);

        sim.start();
        sim.tick();
        assert!(sim.water_time() > phase);
    }

    #[test]
    fn test_water_wave_amplitude() {
        for i in 0..50 {
            let t = i as f32 * 0.37;
            assert!(water_wave_offset(1.0, -2.0, t, false).abs() <= 0.06 * 1.6 + 1e-6);
            assert!(water_wave_offset(1.0, -2.0, t, true).abs() <= 0.15 * 1.6 + 1e-6);
        }
    }
}
