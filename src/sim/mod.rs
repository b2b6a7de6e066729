//! Deterministic simulation module
//!
//! All chapter logic lives here. This module must be pure and deterministic:
//! - One call per animation frame, no blocking
//! - Seeded RNG only
//! - Vertex counts never change after a mesh is built
//! - No rendering or platform dependencies

pub mod crater;
pub mod debris;
pub mod erosion;
pub mod impact;
pub mod mesh;
pub mod meteor;
pub mod orbit;
pub mod tour;

pub use crater::{
    BowlShape, CraterPreset, CraterProfile, RimBand, apply_impact, apply_planar_crater,
    apply_spherical_crater,
};
pub use debris::{DebrisParticle, debris_count, spawn_debris, step_particles};
pub use erosion::{ErosionModifiers, ErosionSim, step_erosion, step_erosion_readout, water_wave_offset};
pub use impact::{CraterSim, SimEvent};
pub use mesh::Mesh;
pub use meteor::{ImpactEvent, Meteor, impact_energy};
pub use orbit::{
    DayClock, MinuteStepper, MoonPhase, MoonPhaseSim, ObserverPreset, ObserverSlot, OrbitalState,
    SimClock, compute_orbital_state, date_of, illumination,
};
pub use tour::{BODIES, Body, TourCamera, Tween, ease_quadratic_in_out, find_body};
