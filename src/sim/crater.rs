//! Radial crater displacement kernels
//!
//! A crater is a bowl (depression inside `radius`) plus a sine-shaped rim
//! bump over a band around the crater edge. Two parameterizations exist
//! and are deliberately kept apart:
//! - `CraterProfile::from_mass`: impact chapter, scales with meteor mass
//! - `CraterProfile::erosion_fixed`: erosion chapter, constant shape

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::mesh::Mesh;
use crate::smoothstep;

/// Shape of the bowl below the reference surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BowlShape {
    /// `depth * smoothstep(1 - d/r)`
    Smoothstep,
    /// `depth * (1 - (d/r)²)`
    Parabolic,
}

/// Radial band carrying the rim bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RimBand {
    /// `(r - w, r)`, bump spans `w`
    Inner,
    /// `(r - w, r + w)`, bump spans `2w`
    Straddling,
}

/// Which crater parameterization to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CraterPreset {
    /// Radius, depth and rim derived from impact mass
    #[default]
    MassScaled,
    /// Constant erosion-chapter crater
    Fixed,
}

/// Geometric crater parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraterProfile {
    pub radius: f32,
    pub depth: f32,
    pub rim_height: f32,
    pub rim_width: f32,
    pub bowl: BowlShape,
    pub rim_band: RimBand,
}

impl CraterProfile {
    /// Impact-chapter crater: every dimension follows from mass
    pub fn from_mass(mass: f32) -> Self {
        let radius = mass / 2.5;
        let depth = radius / 2.5;
        Self {
            radius,
            depth,
            rim_height: depth * 0.4,
            rim_width: radius * 0.3,
            bowl: BowlShape::Smoothstep,
            rim_band: RimBand::Inner,
        }
    }

    /// Erosion-chapter crater: fixed regardless of mass
    pub fn erosion_fixed() -> Self {
        Self {
            radius: 4.0,
            depth: 1.5,
            rim_height: 0.5,
            rim_width: 1.5,
            bowl: BowlShape::Parabolic,
            rim_band: RimBand::Straddling,
        }
    }

    /// Resolve a preset; `mass` is ignored by `CraterPreset::Fixed`
    pub fn for_preset(preset: CraterPreset, mass: f32) -> Self {
        match preset {
            CraterPreset::MassScaled => Self::from_mass(mass),
            CraterPreset::Fixed => Self::erosion_fixed(),
        }
    }

    /// True when the profile would divide by zero or produce NaN
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0 && self.rim_width > 0.0)
            || !self.depth.is_finite()
            || !self.rim_height.is_finite()
            || !self.radius.is_finite()
            || !self.rim_width.is_finite()
    }

    /// Distance beyond which the profile is exactly zero
    pub fn influence_radius(&self) -> f32 {
        match self.rim_band {
            RimBand::Inner => self.radius,
            RimBand::Straddling => self.radius + self.rim_width,
        }
    }

    /// Signed displacement along the surface normal at `distance`
    pub fn offset_at(&self, distance: f32) -> f32 {
        if self.is_degenerate() || distance >= self.influence_radius() {
            return 0.0;
        }

        let mut offset = 0.0;
        if distance < self.radius {
            let t = distance / self.radius;
            offset -= match self.bowl {
                BowlShape::Smoothstep => self.depth * smoothstep(1.0 - t),
                BowlShape::Parabolic => self.depth * (1.0 - t * t),
            };
        }

        let rim_start = self.radius - self.rim_width;
        if distance > rim_start {
            let span = match self.rim_band {
                RimBand::Inner => self.rim_width,
                RimBand::Straddling => self.rim_width * 2.0,
            };
            let rim_factor = (distance - rim_start) / span;
            offset += self.rim_height * (rim_factor * PI).sin();
        }

        offset
    }
}

/// Carve a crater into a sphere centered at the origin.
///
/// Distance is measured in 3D from each vertex to `impact_point` and the
/// offset is applied along the vertex's outward radial direction. Normals
/// are recomputed afterwards. Returns the number of displaced vertices;
/// a degenerate mass (≤ 0 or non-finite) leaves the mesh untouched.
pub fn apply_impact(mesh: &mut Mesh, impact_point: Vec3, mass: f32) -> usize {
    let profile = CraterProfile::from_mass(mass);
    if profile.is_degenerate() || !impact_point.is_finite() {
        log::warn!("Ignoring impact with mass {mass} at {impact_point:?}");
        return 0;
    }
    apply_spherical_crater(mesh, impact_point, &profile)
}

/// Spherical crater with an explicit profile
pub fn apply_spherical_crater(mesh: &mut Mesh, impact_point: Vec3, profile: &CraterProfile) -> usize {
    if profile.is_degenerate() {
        return 0;
    }

    let reach = profile.influence_radius();
    let mut displaced = 0;
    for vertex in &mut mesh.positions {
        let distance = vertex.distance(impact_point);
        if distance >= reach {
            continue;
        }
        let outward = vertex.normalize_or_zero();
        *vertex += outward * profile.offset_at(distance);
        displaced += 1;
    }

    if displaced > 0 {
        mesh.compute_vertex_normals();
    }
    displaced
}

/// Carve a crater into an XY heightfield, moving Z only.
///
/// Distance is measured in the XY plane from `center`.
pub fn apply_planar_crater(mesh: &mut Mesh, center: Vec2, profile: &CraterProfile) -> usize {
    if profile.is_degenerate() {
        log::warn!("Ignoring degenerate planar crater {profile:?}");
        return 0;
    }

    let reach = profile.influence_radius();
    let mut displaced = 0;
    for vertex in &mut mesh.positions {
        let distance = vertex.truncate().distance(center);
        if distance >= reach {
            continue;
        }
        vertex.z += profile.offset_at(distance);
        displaced += 1;
    }

    if displaced > 0 {
        mesh.compute_vertex_normals();
    }
    displaced
}
