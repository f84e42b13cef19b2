//! The world sampler: a chunk renderer paired with its FIFO cache, plus the
//! viewport math a renderer needs to blit cached chunks.

use std::num::NonZeroUsize;
use std::sync::Arc;

use glam::DVec2;
use tracing::debug;

use crate::SamplerConfigError;
use crate::biome::{BiomeClassifier, ClimateSample, EchoClassifier, TerrestrialClassifier};
use crate::cache::ChunkCache;
use crate::chunk::{ChunkCoord, ChunkImage, ChunkLayout, ChunkRenderer};
use crate::perlin::{GradientNoise, GradientSet, NoiseField};

/// Size of the consumer's display surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A chunk that overlaps the viewport, with where its top-left corner lands
/// on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleChunk {
    pub coord: ChunkCoord,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Sampler settings for one of the built-in worlds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerPreset {
    pub layout: ChunkLayout,
    pub max_chunks: NonZeroUsize,
    pub gradients: GradientSet,
}

// Const-evaluated: a zero capacity here fails the build, not a run.
impl SamplerPreset {
    /// 64-tile chunks of 6 px tiles, 25 cached chunks.
    pub const TERRESTRIAL: Self = Self {
        layout: ChunkLayout::preset(64, 6),
        max_chunks: NonZeroUsize::new(25).unwrap(),
        gradients: GradientSet::Swizzled,
    };

    /// 48-tile chunks of 8 px tiles, 31 cached chunks.
    pub const ECHO: Self = Self {
        layout: ChunkLayout::preset(48, 8),
        max_chunks: NonZeroUsize::new(31).unwrap(),
        gradients: GradientSet::Diagonal,
    };
}

pub type TerrestrialSampler = WorldSampler<GradientNoise, TerrestrialClassifier>;
pub type EchoSampler = WorldSampler<GradientNoise, EchoClassifier>;

/// Lazily renders and caches chunks for a deterministic world.
pub struct WorldSampler<N, C> {
    renderer: Arc<ChunkRenderer<N, C>>,
    cache: ChunkCache,
}

impl<N: NoiseField, C: BiomeClassifier> WorldSampler<N, C> {
    /// # Errors
    ///
    /// Returns [`SamplerConfigError::ZeroCapacity`] if `max_chunks` is zero.
    pub fn new(renderer: ChunkRenderer<N, C>, max_chunks: usize) -> Result<Self, SamplerConfigError> {
        Ok(Self {
            renderer: Arc::new(renderer),
            cache: ChunkCache::new(max_chunks)?,
        })
    }

    fn from_preset(noise: N, classifier: C, preset: SamplerPreset) -> Self {
        Self {
            renderer: Arc::new(ChunkRenderer::new(noise, classifier, preset.layout)),
            cache: ChunkCache::with_capacity(preset.max_chunks),
        }
    }

    /// The shared renderer, e.g. for handing to background workers.
    pub fn renderer(&self) -> &Arc<ChunkRenderer<N, C>> {
        &self.renderer
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ChunkCache {
        &mut self.cache
    }

    pub fn layout(&self) -> ChunkLayout {
        self.renderer.layout()
    }

    /// Biome at a world-tile position.
    pub fn biome_at(&self, x: f64, y: f64) -> C::Biome {
        self.renderer.biome_at(x, y)
    }

    pub fn climate_at(&self, x: f64, y: f64) -> ClimateSample {
        self.renderer.climate_at(x, y)
    }

    /// Biome under the camera, sampled at the nearest whole tile.
    pub fn biome_under(&self, camera: DVec2) -> C::Biome {
        self.biome_at(camera.x.round(), camera.y.round())
    }

    /// Render a chunk without touching the cache.
    pub fn generate_chunk(&self, cx: i32, cy: i32) -> ChunkImage {
        self.renderer.render(ChunkCoord::new(cx, cy))
    }

    /// The pixel buffer for chunk `(cx, cy)`, rendered on first request and
    /// shared from the cache afterwards.
    pub fn get_chunk(&mut self, cx: i32, cy: i32) -> Arc<ChunkImage> {
        let coord = ChunkCoord::new(cx, cy);
        let renderer = &self.renderer;
        self.cache.get_or_insert_with(coord, || {
            debug!(chunk = %coord, "chunk cache miss");
            renderer.render(coord)
        })
    }

    /// Chunks overlapping a viewport centred on `camera` (world tiles).
    ///
    /// The range is inclusive on both ends, so one extra row and column may
    /// be listed at the trailing edges.
    pub fn visible_chunks(&self, camera: DVec2, viewport: Viewport) -> Vec<VisibleChunk> {
        visible_chunks(self.layout(), camera, viewport)
    }

    /// Drop every cached chunk, e.g. after the display surface changes.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl TerrestrialSampler {
    /// The terrestrial world with the default chunk settings.
    pub fn terrestrial(seed: u64) -> Self {
        let preset = SamplerPreset::TERRESTRIAL;
        Self::from_preset(
            GradientNoise::from_seed(seed, preset.gradients),
            TerrestrialClassifier::default(),
            preset,
        )
    }
}

impl EchoSampler {
    /// The musical world with the default chunk settings.
    pub fn echo(seed: u64) -> Self {
        let preset = SamplerPreset::ECHO;
        Self::from_preset(
            GradientNoise::from_seed(seed, preset.gradients),
            EchoClassifier::default(),
            preset,
        )
    }
}

/// Chunks overlapping a viewport centred on `camera`, with blit offsets
/// `chunk_origin_px - camera_px + viewport / 2`.
pub fn visible_chunks(layout: ChunkLayout, camera: DVec2, viewport: Viewport) -> Vec<VisibleChunk> {
    let chunk_px = layout.chunk_pixels() as f64;
    let cam_px = camera * layout.tile_size() as f64;
    let half = DVec2::new(viewport.width as f64, viewport.height as f64) / 2.0;

    let start = ((cam_px - half) / chunk_px).floor();
    let end = ((cam_px + half) / chunk_px).ceil();
    let (x0, y0, x1, y1) = (start.x as i32, start.y as i32, end.x as i32, end.y as i32);

    let mut visible = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)).max(0) as usize);
    for cy in y0..=y1 {
        for cx in x0..=x1 {
            visible.push(VisibleChunk {
                coord: ChunkCoord::new(cx, cy),
                screen_x: cx as f64 * chunk_px - cam_px.x + half.x,
                screen_y: cy as f64 * chunk_px - cam_px.y + half.y,
            });
        }
    }
    visible
}
