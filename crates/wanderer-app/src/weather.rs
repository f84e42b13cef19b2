//! Rain and fog.
//!
//! Fog eases in and out over a few dozen frames. Rain is a pool of falling
//! streaks spawned along the top edge of the frame.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::frame::Tint;

/// Densest fog overlay.
pub const FOG_MAX: f64 = 0.35;
const FOG_RAMP_UP: f64 = 0.008;
const FOG_RAMP_DOWN: f64 = 0.015;
const FOG_COLOR: [u8; 3] = [190, 200, 210];

const DROPS_PER_FRAME: usize = 3;
const MAX_DROPS: usize = 300;
const DROPS_TRIMMED: usize = 100;
/// Horizontal drift per frame; drops fall slightly to the left.
const DROP_DRIFT: f64 = 1.5;
pub const RAIN_TINT: Tint = Tint {
    rgb: [180, 200, 220],
    alpha: 0.35,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub length: f64,
}

#[derive(Clone, Debug)]
pub struct Weather {
    pub rain: bool,
    pub fog: bool,
    fog_density: f64,
    drops: Vec<Raindrop>,
    rng: ChaCha8Rng,
}

impl Weather {
    /// Clear skies. `seed` drives raindrop placement.
    pub fn new(seed: u64) -> Self {
        Self {
            rain: false,
            fog: false,
            fog_density: 0.0,
            drops: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn toggle_rain(&mut self) {
        self.rain = !self.rain;
    }

    pub fn toggle_fog(&mut self) {
        self.fog = !self.fog;
    }

    /// Advance one frame on a `width` x `height` frame.
    pub fn tick(&mut self, width: u32, height: u32) {
        if self.rain {
            for _ in 0..DROPS_PER_FRAME {
                let drop = Raindrop {
                    x: self.rng.random_range(0.0..width.max(1) as f64),
                    y: -10.0,
                    speed: 12.0 + self.rng.random::<f64>() * 8.0,
                    length: 8.0 + self.rng.random::<f64>() * 12.0,
                };
                self.drops.push(drop);
            }
            let bottom = height as f64;
            self.drops.retain_mut(|d| {
                d.y += d.speed;
                d.x -= DROP_DRIFT;
                d.y < bottom
            });
            if self.drops.len() > MAX_DROPS {
                self.drops.drain(..DROPS_TRIMMED);
            }
        } else {
            self.drops.clear();
        }

        self.fog_density = if self.fog {
            self.fog_density + FOG_RAMP_UP
        } else {
            self.fog_density - self.fog_density.min(FOG_RAMP_DOWN)
        }
        .clamp(0.0, FOG_MAX);
    }

    pub fn fog_density(&self) -> f64 {
        self.fog_density
    }

    /// Fog overlay, once any fog has built up.
    pub fn fog_tint(&self) -> Option<Tint> {
        (self.fog_density > 0.0).then(|| Tint::new(FOG_COLOR, self.fog_density))
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// `"Rain, Fog"`, `"Rain"`, `"Fog"` or `"Clear"`.
    pub fn label(&self) -> String {
        let mut conditions = Vec::new();
        if self.rain {
            conditions.push("Rain");
        }
        if self.fog {
            conditions.push("Fog");
        }
        if conditions.is_empty() {
            "Clear".to_string()
        } else {
            conditions.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let mut weather = Weather::new(1);
        assert_eq!(weather.label(), "Clear");
        weather.toggle_rain();
        assert_eq!(weather.label(), "Rain");
        weather.toggle_fog();
        assert_eq!(weather.label(), "Rain, Fog");
        weather.toggle_rain();
        assert_eq!(weather.label(), "Fog");
    }

    #[test]
    fn test_fog_ramps_and_caps() {
        let mut weather = Weather::new(1);
        weather.fog = true;
        weather.tick(100, 100);
        assert!((weather.fog_density() - 0.008).abs() < 1e-12);
        for _ in 0..100 {
            weather.tick(100, 100);
        }
        assert_eq!(weather.fog_density(), FOG_MAX);
        assert_eq!(weather.fog_tint().map(|t| t.rgb), Some(FOG_COLOR));

        weather.fog = false;
        weather.tick(100, 100);
        assert!((weather.fog_density() - (FOG_MAX - 0.015)).abs() < 1e-12);
        for _ in 0..100 {
            weather.tick(100, 100);
        }
        assert_eq!(weather.fog_density(), 0.0);
        assert!(weather.fog_tint().is_none());
    }

    #[test]
    fn test_rain_spawns_and_falls_off_screen() {
        let mut weather = Weather::new(7);
        weather.rain = true;
        weather.tick(200, 1000);
        assert_eq!(weather.drops().len(), 3);
        for drop in weather.drops() {
            assert!((0.0..200.0).contains(&(drop.x + DROP_DRIFT)));
            assert!(drop.y > -10.0);
        }

        // On a very short frame every drop falls out immediately.
        let mut short = Weather::new(7);
        short.rain = true;
        short.tick(200, 1);
        assert!(short.drops().is_empty());
    }

    #[test]
    fn test_drop_pool_is_bounded() {
        let mut weather = Weather::new(3);
        weather.rain = true;
        for _ in 0..2000 {
            weather.tick(800, 1_000_000);
            assert!(weather.drops().len() <= MAX_DROPS);
        }
        weather.rain = false;
        weather.tick(800, 600);
        assert!(weather.drops().is_empty());
    }

    #[test]
    fn test_rain_is_reproducible() {
        let mut a = Weather::new(11);
        let mut b = Weather::new(11);
        a.rain = true;
        b.rain = true;
        for _ in 0..10 {
            a.tick(640, 480);
            b.tick(640, 480);
        }
        assert_eq!(a.drops(), b.drops());
    }
}
