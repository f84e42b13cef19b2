//! World clock: time of day, lighting curve, and sky color.
//!
//! Time is normalized to `[0.0, 1.0)`: 0.0 is midnight, 0.25 dawn, 0.5 noon
//! and 0.75 dusk. The clock advances a fixed fraction per frame.

use crate::frame::Tint;

/// Day fraction advanced per frame by default.
pub const DEFAULT_TIME_SPEED: f64 = 0.00015;

/// Sky keyframes: `(time, r, g, b)`, interpolated linearly.
const SKY_KEYFRAMES: [(f64, [f64; 3]); 9] = [
    (0.0, [10.0, 15.0, 35.0]),
    (0.22, [25.0, 30.0, 60.0]),
    (0.27, [255.0, 140.0, 90.0]),
    (0.32, [130.0, 180.0, 220.0]),
    (0.5, [135.0, 195.0, 240.0]),
    (0.68, [130.0, 175.0, 215.0]),
    (0.73, [255.0, 130.0, 70.0]),
    (0.78, [45.0, 35.0, 80.0]),
    (1.0, [10.0, 15.0, 35.0]),
];

const NIGHT_TINT: [u8; 3] = [10, 15, 40];

#[derive(Clone, Debug, PartialEq)]
pub struct WorldClock {
    /// Current time of day, normalized `[0.0, 1.0)`.
    pub time_of_day: f64,
    /// Day fraction advanced per [`tick`](Self::tick).
    pub time_speed: f64,
    pub paused: bool,
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(0.5, DEFAULT_TIME_SPEED)
    }
}

impl WorldClock {
    pub fn new(time_of_day: f64, time_speed: f64) -> Self {
        Self {
            time_of_day: time_of_day.rem_euclid(1.0),
            time_speed,
            paused: false,
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.time_of_day = (self.time_of_day + self.time_speed) % 1.0;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_night(&self) -> bool {
        self.time_of_day < 0.25 || self.time_of_day > 0.75
    }

    /// Scene brightness: 0.35 at midnight rising to 0.7 at dawn, then a sine
    /// arc peaking at 1.0 at noon.
    pub fn lighting(&self) -> f64 {
        let t = self.time_of_day;
        if self.is_night() {
            let np = if t < 0.25 { t / 0.25 } else { (1.0 - t) / 0.25 };
            return 0.35 + np * 0.35;
        }
        0.7 + ((t - 0.25) / 0.5 * std::f64::consts::PI).sin() * 0.3
    }

    /// Sky color at the current time.
    pub fn sky_color(&self) -> [u8; 3] {
        let t = self.time_of_day;
        let (mut prev, mut next) = (SKY_KEYFRAMES[0], SKY_KEYFRAMES[1]);
        for pair in SKY_KEYFRAMES.windows(2) {
            if t >= pair[0].0 && t < pair[1].0 {
                (prev, next) = (pair[0], pair[1]);
                break;
            }
        }
        let progress = (t - prev.0) / (next.0 - prev.0);
        let channel = |i: usize| {
            let v = prev.1[i] + (next.1[i] - prev.1[i]) * progress;
            v.round().clamp(0.0, 255.0) as u8
        };
        [channel(0), channel(1), channel(2)]
    }

    /// Darkening overlay for the current lighting, if any.
    ///
    /// Night uses a blue tint; daytime dimming is black at half strength.
    pub fn overlay(&self) -> Option<Tint> {
        let lighting = self.lighting();
        if lighting >= 0.95 {
            return None;
        }
        let alpha = (1.0 - lighting) * 0.7;
        Some(if self.is_night() {
            Tint::new(NIGHT_TINT, alpha)
        } else {
            Tint::new([0, 0, 0], alpha * 0.5)
        })
    }

    /// Star opacity: 1 at midnight, fading to 0 at dawn and dusk.
    pub fn star_alpha(&self) -> f64 {
        let t = self.time_of_day;
        if t < 0.25 {
            (0.25 - t) / 0.25
        } else if t > 0.75 {
            (t - 0.75) / 0.25
        } else {
            0.0
        }
    }

    /// Wall-clock reading of the time of day.
    pub fn hours_minutes(&self) -> (u32, u32) {
        let hours = self.time_of_day * 24.0;
        let h = hours.floor();
        let m = ((hours - h) * 60.0).floor();
        (h as u32, m as u32)
    }

    /// `HH:MM`.
    pub fn label(&self) -> String {
        let (h, m) = self.hours_minutes();
        format!("{h:02}:{m:02}")
    }
}
