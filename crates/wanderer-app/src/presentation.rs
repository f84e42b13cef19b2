//! HUD boundary: where the walker reports what it sees.

use tracing::{debug, info};

/// Receives HUD updates once per frame.
pub trait Presentation {
    fn show_coords(&mut self, x: i64, y: i64);
    fn show_biome(&mut self, name: &str);
    /// Time of day as `HH:MM`.
    fn show_time(&mut self, label: &str);
    fn show_weather(&mut self, label: &str);
}

/// Writes HUD changes to the log.
///
/// Biome and weather changes log at `info`; coordinates and time, which
/// change almost every frame, log at `debug`.
#[derive(Debug, Default)]
pub struct LogPresentation {
    biome: Option<String>,
    weather: Option<String>,
    time: Option<String>,
    biome_changes: usize,
}

impl LogPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last biome shown.
    pub fn current_biome(&self) -> Option<&str> {
        self.biome.as_deref()
    }

    /// How many times the biome has changed, counting the first one.
    pub fn biome_changes(&self) -> usize {
        self.biome_changes
    }
}

impl Presentation for LogPresentation {
    fn show_coords(&mut self, x: i64, y: i64) {
        debug!(x, y, "position");
    }

    fn show_biome(&mut self, name: &str) {
        if self.biome.as_deref() != Some(name) {
            info!(biome = name, "entered biome");
            self.biome = Some(name.to_string());
            self.biome_changes += 1;
        }
    }

    fn show_time(&mut self, label: &str) {
        if self.time.as_deref() != Some(label) {
            debug!(time = label, "clock");
            self.time = Some(label.to_string());
        }
    }

    fn show_weather(&mut self, label: &str) {
        if self.weather.as_deref() != Some(label) {
            info!(weather = label, "weather changed");
            self.weather = Some(label.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biome_changes_counted_once_per_change() {
        let mut hud = LogPresentation::new();
        for name in ["Forest", "Forest", "Plains", "Plains", "Forest"] {
            hud.show_biome(name);
        }
        assert_eq!(hud.biome_changes(), 3);
        assert_eq!(hud.current_biome(), Some("Forest"));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let mut hud = LogPresentation::new();
        let sink: &mut dyn Presentation = &mut hud;
        sink.show_coords(1, -2);
        sink.show_time("12:00");
        sink.show_weather("Clear");
        sink.show_biome("Ocean");
        assert_eq!(hud.current_biome(), Some("Ocean"));
    }
}
