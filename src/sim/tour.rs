//! Solar-system tour: circular planet orbits and eased camera flights

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{orbit_point, wrap_angle};

/// Camera flight duration
pub const TOUR_TWEEN_MS: f32 = 1500.0;
/// Wall-clock milliseconds are scaled by this to get tour time
pub const TOUR_TIME_SCALE: f64 = 0.0001;

/// A body on the tour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub name: &'static str,
    /// Render radius
    pub size: f32,
    /// Orbit radius around the sun (0 for the sun itself)
    pub distance: f32,
}

impl Body {
    /// Orbital angular speed, slower for outer bodies
    pub fn angular_speed(&self) -> f32 {
        if self.distance > 0.0 {
            5.0 / self.distance.sqrt()
        } else {
            0.0
        }
    }

    /// Position at tour time `t`
    pub fn position_at(&self, t: f32) -> Vec3 {
        if self.distance > 0.0 {
            orbit_point(self.distance, t * self.angular_speed())
        } else {
            Vec3::ZERO
        }
    }

    /// Orbit angle in [0, 2π) for a wall-clock timestamp in milliseconds.
    ///
    /// Computed in f64 and wrapped before narrowing to f32.
    pub fn angle_at_ms(&self, now_ms: f64) -> f32 {
        let angle = now_ms * TOUR_TIME_SCALE * self.angular_speed() as f64;
        wrap_angle(angle.rem_euclid(std::f64::consts::TAU) as f32)
    }

    /// Position for a wall-clock timestamp in milliseconds
    pub fn position_at_ms(&self, now_ms: f64) -> Vec3 {
        if self.distance > 0.0 {
            orbit_point(self.distance, self.angle_at_ms(now_ms))
        } else {
            Vec3::ZERO
        }
    }
}

/// Sun and eight planets
pub static BODIES: [Body; 9] = [
    Body { name: "sun", size: 10.0, distance: 0.0 },
    Body { name: "mercury", size: 1.0, distance: 20.0 },
    Body { name: "venus", size: 1.5, distance: 30.0 },
    Body { name: "earth", size: 1.6, distance: 40.0 },
    Body { name: "mars", size: 1.2, distance: 50.0 },
    Body { name: "jupiter", size: 5.0, distance: 70.0 },
    Body { name: "saturn", size: 4.0, distance: 90.0 },
    Body { name: "uranus", size: 3.0, distance: 110.0 },
    Body { name: "neptune", size: 2.8, distance: 130.0 },
];

/// Look up a body by name (case-insensitive)
pub fn find_body(name: &str) -> Option<&'static Body> {
    let name = name.to_lowercase();
    BODIES.iter().find(|b| b.name == name)
}

/// Quadratic ease-in-out on [0, 1]
pub fn ease_quadratic_in_out(k: f32) -> f32 {
    let k = k.clamp(0.0, 1.0) * 2.0;
    if k < 1.0 {
        0.5 * k * k
    } else {
        let k = k - 1.0;
        -0.5 * (k * (k - 2.0) - 1.0)
    }
}

/// A single eased interpolation between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: Vec3,
    pub to: Vec3,
    pub duration_ms: f32,
    pub elapsed_ms: f32,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current interpolated value
    pub fn value(&self) -> Vec3 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let k = ease_quadratic_in_out(self.elapsed_ms / self.duration_ms);
        self.from.lerp(self.to, k)
    }

    /// Advance and return the new value; holds `to` once finished
    pub fn update(&mut self, dt_ms: f32) -> Vec3 {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms.max(0.0));
        }
        self.value()
    }
}

/// Camera position and look target with in-flight tweens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourCamera {
    pub position: Vec3,
    pub target: Vec3,
    position_tween: Option<Tween>,
    target_tween: Option<Tween>,
}

impl Default for TourCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 50.0, 150.0), Vec3::ZERO)
    }
}

impl TourCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            position_tween: None,
            target_tween: None,
        }
    }

    /// Fly toward a body as it is placed at wall-clock time `now_ms`.
    ///
    /// The camera ends up offset by `size * 4` on every axis, looking at
    /// the body. A new flight replaces one in progress.
    pub fn go_to(&mut self, body: &Body, now_ms: f64) {
        let body_pos = body.position_at_ms(now_ms);
        let camera_goal = body_pos + Vec3::splat(body.size * 4.0);
        self.position_tween = Some(Tween::new(self.position, camera_goal, TOUR_TWEEN_MS));
        self.target_tween = Some(Tween::new(self.target, body_pos, TOUR_TWEEN_MS));
        log::info!("Tour flying to {} at {:?}", body.name, body_pos);
    }

    pub fn is_moving(&self) -> bool {
        self.position_tween.is_some() || self.target_tween.is_some()
    }

    /// Advance both tweens by `dt_ms`, dropping them once finished
    pub fn update(&mut self, dt_ms: f32) {
        if let Some(tween) = self.position_tween.as_mut() {
            self.position = tween.update(dt_ms);
            if tween.is_finished() {
                self.position_tween = None;
            }
        }
        if let Some(tween) = self.target_tween.as_mut() {
            self.target = tween.update(dt_ms);
            if tween.is_finished() {
                self.target_tween = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_shape() {
        assert_eq!(ease_quadratic_in_out(0.0), 0.0);
        assert_eq!(ease_quadratic_in_out(0.5), 0.5);
        assert_eq!(ease_quadratic_in_out(1.0), 1.0);
        assert!(ease_quadratic_in_out(0.25) < 0.25);
        assert!(ease_quadratic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_orbits() {
        let earth = find_body("Earth").expect("earth is on the tour");
        assert!((earth.position_at(0.0) - Vec3::new(40.0, 0.0, 0.0)).length() < 1e-5);
        for t in [0.0, 1.3, 17.0] {
            assert!((earth.position_at(t).length() - 40.0).abs() < 1e-3);
        }
        let sun = find_body("sun").expect("sun is on the tour");
        assert_eq!(sun.position_at(5.0), Vec3::ZERO);
        // Inner planets are faster
        assert!(BODIES[1].angular_speed() > BODIES[8].angular_speed());
        assert!(find_body("pluto").is_none());
    }

    #[test]
    fn test_camera_flight() {
        let mut camera = TourCamera::default();
        let mars = find_body("mars").expect("mars is on the tour");
        camera.go_to(mars, 0.0);
        assert!(camera.is_moving());

        camera.update(TOUR_TWEEN_MS / 2.0);
        let midway = camera.position;
        assert!((midway - Vec3::new(0.0, 50.0, 150.0)).length() > 1.0);

        camera.update(TOUR_TWEEN_MS);
        assert!(!camera.is_moving());
        let body = mars.position_at(0.0);
        assert!((camera.position - (body + Vec3::splat(4.8))).length() < 1e-4);
        assert!((camera.target - body).length() < 1e-4);

        // Holds position afterwards
        camera.update(500.0);
        assert!((camera.target - body).length() < 1e-4);
    }

    #[test]
    fn test_wall_clock_positions() {
        let earth = find_body("earth").expect("earth is on the tour");
        // 10 s of wall clock is one unit of tour time
        let angle = earth.angle_at_ms(10_000.0);
        assert!((angle - earth.angular_speed()).abs() < 1e-5);
        assert!((earth.position_at_ms(10_000.0) - earth.position_at(1.0)).length() < 1e-4);

        // Epoch-sized timestamps still move every frame
        let now = 1.76e12;
        for body in BODIES.iter().skip(1) {
            let a = body.position_at_ms(now);
            let b = body.position_at_ms(now + 1000.0);
            let c = body.position_at_ms(now + 16.0);
            let expected = body.distance * body.angular_speed() * 0.1;
            assert!(((a - b).length() - expected).abs() < expected * 0.01, "{}", body.name);
            assert!((a - c).length() > 0.0, "{}", body.name);
            assert!((a.length() - body.distance).abs() < 1e-3);
            let angle = body.angle_at_ms(now);
            assert!((0.0..std::f32::consts::TAU).contains(&angle));
        }
        assert_eq!(BODIES[0].position_at_ms(now), Vec3::ZERO);
    }
}
