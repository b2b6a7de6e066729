//! `wasm-bindgen` wrappers around the chapter simulations
//!
//! Vertex data crosses the boundary as `Float32Array` copies of the flat
//! `[x, y, z, ...]` buffers.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{
    CraterSim, ErosionSim, MoonPhase, MoonPhaseSim, ObserverSlot, OrbitalState, SimEvent,
    TourCamera, find_body,
};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier init
        return;
    }
    log::info!("Lunar Lab core loaded");
}

fn settings_from(json: Option<String>) -> Settings {
    json.map(|j| Settings::from_json_or_default(&j)).unwrap_or_default()
}

fn vec3_buffer(values: &[glam::Vec3]) -> Float32Array {
    Float32Array::from(bytemuck::cast_slice::<glam::Vec3, f32>(values))
}

/// Impact chapter
#[wasm_bindgen]
pub struct CraterChapter {
    sim: CraterSim,
}

#[wasm_bindgen]
impl CraterChapter {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Self {
        Self {
            sim: CraterSim::new(&settings_from(settings_json)),
        }
    }

    /// Launch a meteor; returns the collision energy
    pub fn collide(&mut self, mass: f32, velocity: f32, theta: f32, phi: f32) -> f32 {
        self.sim.collide(mass, velocity, theta, phi)
    }

    /// Advance one frame; returns true when the moon surface changed
    pub fn tick(&mut self) -> bool {
        self.sim
            .tick()
            .iter()
            .any(|e| matches!(e, SimEvent::Impact { .. }))
    }

    pub fn reset(&mut self) {
        self.sim.reset();
    }

    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.sim.moon.position_buffer())
    }

    pub fn normals(&self) -> Float32Array {
        Float32Array::from(self.sim.moon.normal_buffer())
    }

    pub fn indices(&self) -> Vec<u32> {
        self.sim.moon.indices.clone()
    }

    /// Meteor position as `[x, y, z, radius]`, empty when none is flying
    pub fn meteor(&self) -> Vec<f32> {
        self.sim
            .meteor
            .map(|m| vec![m.pos.x, m.pos.y, m.pos.z, m.visual_radius()])
            .unwrap_or_default()
    }

    /// Debris as `[x, y, z, size, ...]`
    pub fn debris(&self) -> Float32Array {
        let flat: Vec<f32> = self
            .sim
            .debris
            .iter()
            .flat_map(|p| [p.pos.x, p.pos.y, p.pos.z, p.size])
            .collect();
        Float32Array::from(flat.as_slice())
    }
}

/// Erosion chapter
#[wasm_bindgen]
pub struct ErosionChapter {
    sim: ErosionSim,
}

#[wasm_bindgen]
impl ErosionChapter {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Self {
        Self {
            sim: ErosionSim::new(&settings_from(settings_json)),
        }
    }

    pub fn start(&mut self) {
        self.sim.start();
    }

    pub fn reset(&mut self) {
        self.sim.reset();
    }

    pub fn set_rain(&mut self, enabled: bool) {
        self.sim.set_rain(enabled);
    }

    pub fn set_wind(&mut self, enabled: bool) {
        self.sim.set_wind(enabled);
    }

    pub fn tick(&mut self) -> bool {
        self.sim.tick()
    }

    pub fn moon_positions(&self) -> Float32Array {
        Float32Array::from(self.sim.moon.position_buffer())
    }

    pub fn earth_positions(&self) -> Float32Array {
        Float32Array::from(self.sim.earth.position_buffer())
    }

    pub fn earth_normals(&self) -> Float32Array {
        Float32Array::from(self.sim.earth.normal_buffer())
    }

    pub fn water_positions(&self) -> Float32Array {
        Float32Array::from(self.sim.water.position_buffer())
    }

    pub fn water_level(&self) -> f32 {
        self.sim.water_level
    }

    pub fn display_time(&self) -> f64 {
        self.sim.display_time() as f64
    }

    pub fn display_percent(&self) -> u32 {
        self.sim.display_percent()
    }
}

/// Moon phase chapter
#[wasm_bindgen]
pub struct MoonPhaseChapter {
    sim: MoonPhaseSim,
    last: OrbitalState,
}

#[wasm_bindgen]
impl MoonPhaseChapter {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Self {
        let sim = MoonPhaseSim::new(&settings_from(settings_json));
        let last = sim.state();
        Self { sim, last }
    }

    pub fn start(&mut self) {
        self.sim.start();
    }

    pub fn stop(&mut self) {
        self.sim.stop();
    }

    /// Returns false for an unknown slot name
    pub fn set_slot(&mut self, slot: &str) -> bool {
        match ObserverSlot::from_str(slot) {
            Some(slot) => {
                self.sim.set_slot(slot);
                self.last = self.sim.state();
                true
            }
            None => {
                log::warn!("Unknown observer slot '{slot}'");
                false
            }
        }
    }

    /// Returns false for an unknown phase name
    pub fn set_phase(&mut self, phase: &str) -> bool {
        match MoonPhase::from_str(phase) {
            Some(phase) => {
                self.last = self.sim.set_phase(phase);
                true
            }
            None => {
                log::warn!("Unknown moon phase '{phase}'");
                false
            }
        }
    }

    pub fn step_minutes(&mut self, delta: f32) -> bool {
        let stepped = self.sim.step_minutes(delta);
        self.last = self.sim.state();
        stepped
    }

    pub fn set_speed(&mut self, minutes_per_second: f32) {
        self.sim.stepper.speed = minutes_per_second;
    }

    pub fn tick(&mut self, dt_seconds: f32) {
        self.last = self.sim.tick(dt_seconds);
    }

    pub fn moon_angle(&self) -> f32 {
        self.last.moon_angle
    }

    pub fn earth_angle(&self) -> f32 {
        self.last.earth_angle
    }

    pub fn illumination(&self) -> f32 {
        self.last.illumination
    }

    pub fn moon_position(&self) -> Float32Array {
        vec3_buffer(&[self.last.moon_position])
    }

    /// Observer position followed by its facing direction
    pub fn observer(&self) -> Float32Array {
        vec3_buffer(&[self.last.observer_position, self.last.observer_facing])
    }

    pub fn date_label(&self) -> String {
        self.sim.date_label()
    }
}

/// Solar-system tour chapter
#[wasm_bindgen]
pub struct TourChapter {
    camera: TourCamera,
}

#[wasm_bindgen]
impl TourChapter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            camera: TourCamera::default(),
        }
    }

    /// Start a flight; returns false for an unknown body
    pub fn go_to(&mut self, name: &str, now_ms: f64) -> bool {
        match find_body(name) {
            Some(body) => {
                self.camera.go_to(body, now_ms);
                true
            }
            None => {
                log::warn!("Unknown tour body '{name}'");
                false
            }
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.camera.update(dt_ms);
    }

    /// Every body position at `now_ms`, in table order
    pub fn body_positions(&self, now_ms: f64) -> Float32Array {
        let positions: Vec<glam::Vec3> = crate::sim::BODIES
            .iter()
            .map(|b| b.position_at_ms(now_ms))
            .collect();
        vec3_buffer(&positions)
    }

    /// Camera position followed by its look target
    pub fn camera(&self) -> Float32Array {
        vec3_buffer(&[self.camera.position, self.camera.target])
    }
}

impl Default for TourChapter {
    fn default() -> Self {
        Self::new()
    }
}
