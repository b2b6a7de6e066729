//! Lunar Lab entry point
//!
//! The browser build drives the chapters from JavaScript through
//! `lunar_lab::platform::web`. Natively this runs every chapter headless
//! for a fixed number of frames and logs the readouts.
//!
//! Usage: `lunar-lab [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lunar_lab::Settings;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lunar Lab (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json_or_default(&json),
            Err(err) => {
                log::warn!("Could not read {path}: {err}, using defaults");
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    headless::run_crater(&settings);
    headless::run_erosion(&settings);
    headless::run_moon_phase(&settings);
    headless::run_tour();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lunar_lab::Settings;
    use lunar_lab::sim::{
        BODIES, CraterSim, ErosionSim, MoonPhase, MoonPhaseSim, ObserverSlot, SimEvent, TourCamera,
    };

    /// Frames at 60 Hz
    const FRAME_SECONDS: f32 = 1.0 / 60.0;

    pub fn run_crater(settings: &Settings) {
        let mut sim = CraterSim::new(settings);
        sim.collide(
            settings.impact_mass,
            settings.impact_velocity,
            settings.impact_theta,
            settings.impact_phi,
        );

        let mut frames = 0;
        while sim.meteor.is_some() || !sim.debris.is_empty() {
            for event in sim.tick() {
                if let SimEvent::DebrisExpired(count) = event {
                    log::debug!("Frame {frames}: {count} debris expired");
                }
            }
            frames += 1;
            if frames > 100_000 {
                log::warn!("Crater chapter did not settle, stopping");
                break;
            }
        }

        let deepest = sim
            .moon
            .positions
            .iter()
            .map(|p| p.length())
            .fold(f32::INFINITY, f32::min);
        log::info!("Crater chapter settled after {frames} frames, deepest point r={deepest:.2}");
    }

    pub fn run_erosion(settings: &Settings) {
        let mut sim = ErosionSim::new(settings);
        sim.start();
        for _ in 0..1_000 {
            sim.tick();
        }
        let floor = sim.earth.positions.iter().map(|p| p.z).fold(0.0, f32::min);
        log::info!(
            "Erosion after t={}: {}% remaining, crater floor z={floor:.3}, water level {:.3}",
            sim.display_time(),
            sim.display_percent(),
            sim.water_level
        );
    }

    pub fn run_moon_phase(settings: &Settings) {
        let mut sim = MoonPhaseSim::new(settings);
        for slot in [ObserverSlot::Evening, ObserverSlot::Midnight, ObserverSlot::Dawn] {
            sim.set_slot(slot);
            for phase in MoonPhase::ALL {
                let state = sim.set_phase(phase);
                log::info!(
                    "{:>8} {:<16} lit={:.2} moon visible={}",
                    slot.as_str(),
                    phase.as_str(),
                    state.illumination,
                    state.moon_visible
                );
            }
        }

        sim.start();
        for _ in 0..600 {
            sim.tick(FRAME_SECONDS);
        }
        log::info!("Moon phase after 10 s of animation: day {}", sim.date_label());
    }

    pub fn run_tour() {
        let mut camera = TourCamera::default();
        for body in BODIES.iter().skip(1) {
            camera.go_to(body, 0.0);
            while camera.is_moving() {
                camera.update(FRAME_SECONDS * 1000.0);
            }
            log::info!("Arrived at {} camera={:?}", body.name, camera.position);
        }
    }
}
