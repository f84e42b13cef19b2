//! Background chunk rendering on a worker pool.
//!
//! Workers share one immutable [`ChunkRenderer`] and send finished buffers
//! back over a bounded channel. The cache itself stays on the caller's
//! thread: completed chunks are inserted (and old ones evicted) only when the
//! caller drains results, so the cache map needs no lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::biome::BiomeClassifier;
use crate::cache::ChunkCache;
use crate::chunk::{ChunkCoord, ChunkImage, ChunkRenderer};
use crate::perlin::NoiseField;
use crate::sampler::{Viewport, WorldSampler};

/// A chunk rendered off-thread.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub image: ChunkImage,
    /// Render time in microseconds.
    pub generation_time_us: u64,
}

struct QueuedTask {
    coord: ChunkCoord,
    cancelled: Arc<AtomicBool>,
}

/// Renders chunks on background threads.
pub struct AsyncChunkGenerator {
    task_sender: Sender<QueuedTask>,
    result_receiver: Receiver<GeneratedChunk>,
    /// Cancellation flag per pending coordinate.
    active_tasks: Arc<DashMap<ChunkCoord, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl AsyncChunkGenerator {
    /// Spawn `thread_count` workers sharing `renderer`.
    ///
    /// At most `max_concurrent * 2` tasks may be queued; `result_capacity`
    /// bounds the completed-chunk channel.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if a worker thread cannot be spawned.
    pub fn new<N, C>(
        renderer: Arc<ChunkRenderer<N, C>>,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> std::io::Result<Self>
    where
        N: NoiseField + Send + Sync + 'static,
        C: BiomeClassifier + 'static,
    {
        let (task_sender, task_receiver) = bounded::<QueuedTask>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity);
        let in_flight = Arc::new(AtomicU64::new(0));

        for i in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let renderer = Arc::clone(&renderer);

            std::thread::Builder::new()
                .name(format!("chunk-render-{i}"))
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        if task.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let image = renderer.render(task.coord);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !task.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                coord: task.coord,
                                image,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        debug!(threads = thread_count, "chunk render workers started");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Queue a chunk for rendering.
    ///
    /// Submitting a coordinate that is already pending is a no-op. Returns
    /// `Err(coord)` if the queue is full.
    pub fn submit(&self, coord: ChunkCoord) -> Result<(), ChunkCoord> {
        if self.active_tasks.contains_key(&coord) {
            return Ok(());
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(coord, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedTask { coord, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let coord = e.into_inner().coord;
                self.active_tasks.remove(&coord);
                coord
            })
    }

    /// Queue every chunk visible from `camera` that is neither cached nor
    /// pending. Returns how many were queued before the queue filled up.
    pub fn submit_visible<N: NoiseField, C: BiomeClassifier>(
        &self,
        sampler: &WorldSampler<N, C>,
        camera: glam::DVec2,
        viewport: Viewport,
    ) -> usize {
        let mut queued = 0;
        for visible in sampler.visible_chunks(camera, viewport) {
            if sampler.cache().contains(visible.coord) || self.is_pending(visible.coord) {
                continue;
            }
            if self.submit(visible.coord).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Cancel a pending or running task. No-op once the result is delivered.
    pub fn cancel(&self, coord: ChunkCoord) {
        if let Some((_, cancelled)) = self.active_tasks.remove(&coord) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collect all chunks finished so far.
    ///
    /// Results for coordinates cancelled after the render finished are
    /// discarded here.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            if self.active_tasks.remove(&chunk.coord).is_some() {
                results.push(chunk);
            } else {
                trace!(chunk = %chunk.coord, "dropped cancelled chunk");
            }
        }
        results
    }

    /// Move finished chunks into `cache`, skipping any the cache already
    /// holds. Returns how many were inserted.
    pub fn drain_into(&self, cache: &mut ChunkCache) -> usize {
        let mut inserted = 0;
        for chunk in self.drain_results() {
            if cache.contains(chunk.coord) {
                continue;
            }
            trace!(chunk = %chunk.coord, us = chunk.generation_time_us, "background chunk ready");
            cache.insert(Arc::new(chunk.image));
            inserted += 1;
        }
        inserted
    }

    /// Tasks queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.active_tasks.contains_key(&coord)
    }
}
