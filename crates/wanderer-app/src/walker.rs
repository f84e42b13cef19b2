//! The camera that walks the world.

use glam::DVec2;

/// Fraction of the gap to the target velocity closed each frame.
const EASING: f64 = 0.2;
/// Per-axis scale for diagonal input, so diagonal speed matches straight.
const DIAGONAL: f64 = 0.707;

/// Camera position and velocity in world tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Walker {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Top speed in tiles per frame.
    pub speed: f64,
}

impl Walker {
    pub fn new(position: DVec2, speed: f64) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            speed,
        }
    }

    /// Advance one frame with directional input `(dx, dy)`, each -1, 0 or 1.
    pub fn step(&mut self, dx: i8, dy: i8) {
        let mut target = DVec2::new(dx.signum() as f64, dy.signum() as f64) * self.speed;
        if dx != 0 && dy != 0 {
            target *= DIAGONAL;
        }
        self.velocity += (target - self.velocity) * EASING;
        self.position += self.velocity;
    }

    /// The whole tile under the camera.
    pub fn tile(&self) -> (i64, i64) {
        (self.position.x.round() as i64, self.position.y.round() as i64)
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 4.0)
    }
}
