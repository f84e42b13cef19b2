//! A walk through one world: camera, clock, weather, and the composited frame.

use std::f64::consts::{PI, TAU};

use tracing::{debug, trace};
use wanderer_config::WorldConfig;
use wanderer_terrain::{
    AsyncChunkGenerator, Biome, BiomeClassifier, ChunkLayout, ChunkRenderer, GradientNoise,
    NoiseField, SamplerConfigError, SamplerPreset, Viewport, WorldSampler,
};

use crate::clock::WorldClock;
use crate::frame::{FrameBuffer, FrameError, Tint};
use crate::presentation::Presentation;
use crate::walker::Walker;
use crate::weather::{RAIN_TINT, Weather};

const STAR_COUNT: u32 = 80;
const SUN_COLOR: [u8; 3] = [255, 248, 224];
const MOON_COLOR: [u8; 3] = [221, 221, 238];
const MARKER: Tint = Tint {
    rgb: [255, 255, 255],
    alpha: 0.9,
};

/// Build a sampler from a preset, with any sizes the config overrides.
pub fn build_sampler<C: BiomeClassifier>(
    preset: SamplerPreset,
    classifier: C,
    seed: u64,
    world: &WorldConfig,
) -> Result<WorldSampler<GradientNoise, C>, SamplerConfigError> {
    let layout = ChunkLayout::new(
        world.chunk_size.unwrap_or(preset.layout.chunk_size()),
        world.tile_size.unwrap_or(preset.layout.tile_size()),
    )?;
    let renderer = ChunkRenderer::new(
        GradientNoise::from_seed(seed, preset.gradients),
        classifier,
        layout,
    );
    WorldSampler::new(renderer, world.max_chunks.unwrap_or(preset.max_chunks.get()))
}

pub struct WalkSession<N, C> {
    sampler: WorldSampler<N, C>,
    background: Option<AsyncChunkGenerator>,
    viewport: Viewport,
    frame: FrameBuffer,
    pub clock: WorldClock,
    pub weather: Weather,
    pub walker: Walker,
}

impl<N, C> WalkSession<N, C>
where
    N: NoiseField + Send + Sync + 'static,
    C: BiomeClassifier + 'static,
{
    /// # Errors
    ///
    /// Returns [`FrameError::Empty`] for a zero-sized viewport.
    pub fn new(
        sampler: WorldSampler<N, C>,
        viewport: Viewport,
        clock: WorldClock,
        weather: Weather,
        walker: Walker,
    ) -> Result<Self, FrameError> {
        Ok(Self {
            sampler,
            background: None,
            frame: FrameBuffer::new(viewport.width, viewport.height)?,
            viewport,
            clock,
            weather,
            walker,
        })
    }

    /// Render chunks on `threads` background workers instead of the frame
    /// thread. Chunks still in flight leave the sky showing through.
    pub fn with_background_workers(mut self, threads: usize) -> std::io::Result<Self> {
        if threads > 0 {
            let capacity = self.sampler.cache().capacity();
            self.background = Some(AsyncChunkGenerator::new(
                std::sync::Arc::clone(self.sampler.renderer()),
                threads,
                capacity,
                capacity * 2,
            )?);
        }
        Ok(self)
    }

    pub fn sampler(&self) -> &WorldSampler<N, C> {
        &self.sampler
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Biome under the camera.
    pub fn biome(&self) -> C::Biome {
        self.sampler.biome_under(self.walker.position)
    }

    /// Advance one frame with directional input.
    pub fn step(&mut self, dx: i8, dy: i8) {
        self.walker.step(dx, dy);
        self.clock.tick();
        self.weather.tick(self.viewport.width, self.viewport.height);
    }

    /// Change the output size. Cached chunks are dropped.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), FrameError> {
        self.frame = FrameBuffer::new(viewport.width, viewport.height)?;
        self.viewport = viewport;
        self.sampler.clear_cache();
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    /// Composite the current frame. With background workers, chunks not yet
    /// rendered are queued and skipped.
    pub fn render(&mut self) -> &FrameBuffer {
        self.draw(false);
        &self.frame
    }

    /// Composite the current frame, rendering any missing chunk in place.
    pub fn render_complete(&mut self) -> &FrameBuffer {
        self.draw(true);
        &self.frame
    }

    /// Report coordinates, biome, time and weather.
    pub fn present(&self, hud: &mut dyn Presentation) {
        let (x, y) = self.walker.tile();
        hud.show_coords(x, y);
        hud.show_biome(self.biome().name());
        hud.show_time(&self.clock.label());
        hud.show_weather(&self.weather.label());
    }

    fn draw(&mut self, wait_for_chunks: bool) {
        if let Some(background) = &self.background {
            background.drain_into(self.sampler.cache_mut());
        }

        self.frame.fill(self.clock.sky_color());

        for visible in self.sampler.visible_chunks(self.walker.position, self.viewport) {
            let coord = visible.coord;
            let chunk = match &self.background {
                Some(background) if !wait_for_chunks => match self.sampler.cache().get(coord) {
                    Some(chunk) => chunk,
                    None => {
                        if background.submit(coord).is_err() {
                            trace!(chunk = %coord, "render queue full");
                        }
                        continue;
                    }
                },
                _ => self.sampler.get_chunk(coord.x, coord.y),
            };
            self.frame.blit(
                &chunk,
                visible.screen_x.floor() as i64,
                visible.screen_y.floor() as i64,
            );
        }

        if let Some(overlay) = self.clock.overlay() {
            self.frame.blend(overlay);
        }
        self.draw_sky_objects();

        for drop in self.weather.drops() {
            self.frame.draw_line(drop.x, drop.y, 1.5, drop.length, RAIN_TINT);
        }
        if let Some(fog) = self.weather.fog_tint() {
            self.frame.blend(fog);
        }

        let w = self.viewport.width as f64;
        let h = self.viewport.height as f64;
        self.frame.draw_disc(w / 2.0, h / 2.0, 3.0, MARKER);
    }

    /// Stars at night, then the sun or moon on its arc.
    fn draw_sky_objects(&mut self) {
        let t = self.clock.time_of_day;
        let w = self.viewport.width as f64;
        let h = self.viewport.height as f64;

        let star_alpha = self.clock.star_alpha();
        if star_alpha > 0.0 {
            for i in 0..STAR_COUNT {
                let seed = i as f64 * 12345.0;
                let sx = (seed.sin() * 50000.0) % w;
                let sy = (seed.cos() * 50000.0) % (h * 0.5);
                let twinkle = (t * 80.0 + i as f64 * 7.0).sin() * 0.3 + 0.7;
                let tint = Tint::new([255, 255, 255], star_alpha * 0.9 * star_alpha * twinkle);
                let radius = 1.0 + (i % 3) as f64 * 0.5;
                self.frame
                    .draw_disc((sx + w) % w, (sy + h * 0.5) % (h * 0.5), radius, tint);
            }
        }

        let cy = (t * TAU - PI / 2.0).sin() * h * 0.3 + h * 0.25;
        let cx = w * 0.5 + (t * TAU).cos() * w * 0.25;
        if t > 0.22 && t < 0.78 {
            self.frame.draw_disc(cx, cy, 16.0, Tint::new(SUN_COLOR, 1.0));
        } else {
            self.frame.draw_disc(cx, cy, 14.0, Tint::new(MOON_COLOR, 1.0));
            self.frame
                .draw_disc(cx + 5.0, cy - 2.0, 11.0, Tint::new(self.clock.sky_color(), 1.0));
        }
    }
}
