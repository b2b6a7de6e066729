//! Moon phase and observer kinematics
//!
//! The sun lies far along -X. The moon orbits the planet in the XZ plane
//! (angle 0 on +X, i.e. full moon) while the planet spins once per day.
//! Two clocks drive the model:
//! - a continuous day counter (`f32` days)
//! - a `DayClock` of day 1..=28 plus minutes of day, stepped in 5-minute quanta

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::consts::*;
use crate::settings::Settings;
use crate::{orbit_point, wrap_angle};

/// Direction from the planet toward the sun
pub const SUN_DIRECTION: Vec3 = Vec3::NEG_X;

/// Named time-of-day viewpoint on the planet surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObserverSlot {
    #[default]
    Evening,
    Midnight,
    Dawn,
}

impl ObserverSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObserverSlot::Evening => "evening",
            ObserverSlot::Midnight => "midnight",
            ObserverSlot::Dawn => "dawn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "evening" => Some(ObserverSlot::Evening),
            "midnight" => Some(ObserverSlot::Midnight),
            "dawn" => Some(ObserverSlot::Dawn),
            _ => None,
        }
    }
}

/// Angle table for the observer slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObserverPreset {
    /// Observer pinned in space, independent of planet spin
    #[default]
    Fixed,
    /// Observer carried around by the planet spin
    Rotating,
}

impl ObserverPreset {
    /// Angular offset of a slot on the planet circle
    pub fn slot_angle(&self, slot: ObserverSlot) -> f32 {
        match (self, slot) {
            (_, ObserverSlot::Midnight) => 0.0,
            (ObserverPreset::Fixed, ObserverSlot::Evening) => FRAC_PI_2,
            (ObserverPreset::Fixed, ObserverSlot::Dawn) => -FRAC_PI_2,
            (ObserverPreset::Rotating, ObserverSlot::Evening) => -FRAC_PI_2,
            (ObserverPreset::Rotating, ObserverSlot::Dawn) => FRAC_PI_2,
        }
    }

    /// Absolute observer angle for a slot at a given planet spin
    pub fn observer_angle(&self, slot: ObserverSlot, earth_angle: f32) -> f32 {
        match self {
            ObserverPreset::Fixed => self.slot_angle(slot),
            ObserverPreset::Rotating => earth_angle + self.slot_angle(slot),
        }
    }
}

/// The eight named lunar phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::ThirdQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Moon orbit angle that shows this phase
    pub fn orbit_angle(&self) -> f32 {
        match self {
            MoonPhase::New => PI,
            MoonPhase::WaxingCrescent => PI * 0.75,
            MoonPhase::FirstQuarter => PI * 0.5,
            MoonPhase::WaxingGibbous => PI * 0.25,
            MoonPhase::Full => 0.0,
            MoonPhase::WaningGibbous => PI * 1.75,
            MoonPhase::ThirdQuarter => PI * 1.5,
            MoonPhase::WaningCrescent => PI * 1.25,
        }
    }

    /// Continuous time (days) that puts the moon at this phase
    pub fn time(&self) -> f32 {
        self.orbit_angle() / TAU * LUNAR_CYCLE
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::Full => "full",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::ThirdQuarter => "third",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|p| p.as_str() == s).or(match s.as_str() {
            "first_quarter" => Some(MoonPhase::FirstQuarter),
            "third_quarter" => Some(MoonPhase::ThirdQuarter),
            _ => None,
        })
    }
}

/// Fraction of the moon disc lit as seen from the planet (0 new, 1 full)
#[inline]
pub fn illumination(moon_angle: f32) -> f32 {
    (1.0 + moon_angle.cos()) * 0.5
}

/// Snapshot of every derived orbital quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    /// Moon orbit angle in [0, 2π)
    pub moon_angle: f32,
    /// Planet spin angle in [0, 2π)
    pub earth_angle: f32,
    pub moon_position: Vec3,
    /// Moon spin about Y (tidally locked, equals `moon_angle`)
    pub moon_spin: f32,
    pub observer_position: Vec3,
    /// Unit vector from the observer toward the planet center
    pub observer_facing: Vec3,
    /// Local horizon normal (zenith)
    pub observer_up: Vec3,
    pub illumination: f32,
    /// Moon above the observer's horizon
    pub moon_visible: bool,
    /// Sun above the observer's horizon
    pub sun_visible: bool,
}

/// Build the full state from raw angles
fn orbital_state(moon_angle: f32, earth_angle: f32, slot: ObserverSlot, preset: ObserverPreset) -> OrbitalState {
    let moon_angle = wrap_angle(moon_angle);
    let earth_angle = wrap_angle(earth_angle);
    let moon_position = orbit_point(MOON_ORBIT_RADIUS, moon_angle);

    let observer_position = orbit_point(PLANET_RADIUS, preset.observer_angle(slot, earth_angle));
    let observer_up = observer_position.normalize_or_zero();

    OrbitalState {
        moon_angle,
        earth_angle,
        moon_position,
        moon_spin: moon_angle,
        observer_position,
        observer_facing: -observer_up,
        observer_up,
        illumination: illumination(moon_angle),
        moon_visible: (moon_position - observer_position).dot(observer_up) > 0.0,
        sun_visible: SUN_DIRECTION.dot(observer_up) > 0.0,
    }
}

/// Orbital state for a continuous day counter
pub fn compute_orbital_state(time: f32, slot: ObserverSlot, preset: ObserverPreset) -> OrbitalState {
    let moon_angle = time / LUNAR_CYCLE * TAU;
    let earth_angle = time / EARTH_DAY * TAU;
    orbital_state(moon_angle, earth_angle, slot, preset)
}

/// Day-of-month readout for the continuous model (1..=28)
#[inline]
pub fn date_of(time: f32) -> u32 {
    time.rem_euclid(LUNAR_CYCLE).floor() as u32 % LUNAR_CYCLE as u32 + 1
}

/// Calendar position within one lunar cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayClock {
    /// 1..=28
    pub day: u32,
    /// [0, 1440)
    pub minutes: f32,
}

impl Default for DayClock {
    fn default() -> Self {
        Self { day: 1, minutes: 0.0 }
    }
}

impl DayClock {
    /// Build a clock, normalizing out-of-range values
    pub fn new(day: u32, minutes: f32) -> Self {
        let mut clock = Self {
            day: (day.max(1) - 1) % LUNAR_CYCLE as u32 + 1,
            minutes: 0.0,
        };
        clock.step_minutes(minutes);
        clock
    }

    /// Clock position for a continuous day counter
    pub fn from_elapsed_days(time: f32) -> Self {
        let mut clock = Self::default();
        clock.step_minutes(time * MINUTES_PER_DAY);
        clock
    }

    /// Move forward or backward, rolling days over the 28-day cycle
    pub fn step_minutes(&mut self, delta: f32) {
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite minute step {delta}");
            return;
        }

        // Day shift is reduced modulo the cycle before any integer math
        let per_day = MINUTES_PER_DAY as f64;
        let cycle = LUNAR_CYCLE as f64;
        let total = self.minutes as f64 + delta as f64;
        let mut day_shift = (total / per_day).floor().rem_euclid(cycle) as u32;
        let mut minutes = total.rem_euclid(per_day) as f32;
        if !(0.0..MINUTES_PER_DAY).contains(&minutes) {
            minutes = 0.0;
            day_shift += 1;
        }

        let cycle_days = LUNAR_CYCLE as u32;
        let day_index = self.day.saturating_sub(1) % cycle_days;
        self.day = (day_index + day_shift) % cycle_days + 1;
        self.minutes = minutes;
    }

    /// Days elapsed since day 1, 00:00
    pub fn elapsed_days(&self) -> f32 {
        (self.day.saturating_sub(1) % LUNAR_CYCLE as u32) as f32 + self.minutes / MINUTES_PER_DAY
    }

    /// `HH:MM` readout
    pub fn time_label(&self) -> String {
        let whole = self.minutes.floor() as u32;
        format!("{:02}:{:02}", whole / 60, whole % 60)
    }

    /// Orbital state with the spin driven by minutes of the day
    pub fn orbital_state(&self, slot: ObserverSlot, preset: ObserverPreset) -> OrbitalState {
        let moon_angle = self.elapsed_days() / LUNAR_CYCLE * TAU;
        let earth_angle = self.minutes / MINUTES_PER_DAY * TAU;
        orbital_state(moon_angle, earth_angle, slot, preset)
    }
}

/// Turns a signed speed (minutes per second) into whole clock quanta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinuteStepper {
    /// Minutes per second; negative runs backward
    pub speed: f32,
    pending: f32,
}

impl MinuteStepper {
    pub fn new(speed: f32) -> Self {
        Self { speed, pending: 0.0 }
    }

    /// Accumulate `dt` seconds and flush whole quanta into `clock`.
    ///
    /// Returns the signed number of quanta applied.
    pub fn advance(&mut self, clock: &mut DayClock, dt: f32) -> i32 {
        let delta = self.speed * dt;
        if !delta.is_finite() {
            return 0;
        }
        self.pending += delta;

        let quanta = (self.pending / MINUTE_QUANTUM).trunc();
        if quanta != 0.0 {
            clock.step_minutes(quanta * MINUTE_QUANTUM);
            self.pending -= quanta * MINUTE_QUANTUM;
        }
        quanta as i32
    }

    /// Minutes accumulated but not yet applied
    pub fn pending(&self) -> f32 {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = 0.0;
    }
}

/// Simulated time in either of the two supported representations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimClock {
    Continuous(f32),
    Minutes(DayClock),
}

impl SimClock {
    pub fn elapsed_days(&self) -> f32 {
        match self {
            SimClock::Continuous(time) => *time,
            SimClock::Minutes(clock) => clock.elapsed_days(),
        }
    }
}

/// Moon phase chapter state
#[derive(Debug, Clone)]
pub struct MoonPhaseSim {
    pub clock: SimClock,
    pub slot: ObserverSlot,
    pub preset: ObserverPreset,
    pub animating: bool,
    /// Continuous model rate
    pub days_per_second: f32,
    pub stepper: MinuteStepper,
}

impl MoonPhaseSim {
    pub fn new(settings: &Settings) -> Self {
        let clock = if settings.use_minute_precision {
            SimClock::Minutes(DayClock::default())
        } else {
            SimClock::Continuous(0.0)
        };
        Self {
            clock,
            slot: ObserverSlot::default(),
            preset: settings.observer_preset,
            animating: true,
            days_per_second: settings.days_per_second,
            stepper: MinuteStepper::new(settings.minutes_per_second),
        }
    }

    pub fn start(&mut self) {
        self.animating = true;
    }

    pub fn stop(&mut self) {
        self.animating = false;
        self.stepper.clear();
    }

    pub fn set_slot(&mut self, slot: ObserverSlot) {
        self.slot = slot;
    }

    /// Jump to a named phase; stops the animation
    pub fn set_phase(&mut self, phase: MoonPhase) -> OrbitalState {
        self.stop();
        let time = phase.time();
        self.clock = match self.clock {
            SimClock::Continuous(_) => SimClock::Continuous(time),
            SimClock::Minutes(_) => SimClock::Minutes(DayClock::from_elapsed_days(time)),
        };
        log::info!("Moon phase set to {} (day {:.2})", phase.as_str(), time);
        self.state()
    }

    /// Step the clock by whole minutes (minute model only)
    pub fn step_minutes(&mut self, delta: f32) -> bool {
        match &mut self.clock {
            SimClock::Minutes(clock) => {
                clock.step_minutes(delta);
                true
            }
            SimClock::Continuous(_) => false,
        }
    }

    /// Advance by `dt` seconds of wall time and return the new state
    pub fn tick(&mut self, dt: f32) -> OrbitalState {
        if self.animating && dt.is_finite() && dt > 0.0 {
            match &mut self.clock {
                SimClock::Continuous(time) => *time += dt * self.days_per_second,
                SimClock::Minutes(clock) => {
                    self.stepper.advance(clock, dt);
                }
            }
        }
        self.state()
    }

    pub fn state(&self) -> OrbitalState {
        match &self.clock {
            SimClock::Continuous(time) => compute_orbital_state(*time, self.slot, self.preset),
            SimClock::Minutes(clock) => clock.orbital_state(self.slot, self.preset),
        }
    }

    /// Date readout: `"12"` in the continuous model, `"12 06:35"` with minutes
    pub fn date_label(&self) -> String {
        match &self.clock {
            SimClock::Continuous(time) => date_of(*time).to_string(),
            SimClock::Minutes(clock) => format!("{} {}", clock.day, clock.time_label()),
        }
    }
}
