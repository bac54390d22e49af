//! The edge-processing engine.
//!
//! An [`Engine`] binds one shared [`GraphPartition`] to a dedicated worker pool
//! and a table of message channels. Jobs drive it through two primitives:
//! - [`Engine::process_vertices`]: parallel map-reduce over a [`VertexSubset`]
//! - [`Engine::process_edges`]: one direction-optimizing traversal round
//!
//! The vertex range is split into 64-aligned *lanes*. A lane is the unit of
//! parallel work and owns one emit buffer per channel, so lanes never contend
//! on bitmap words or buffers.

mod array;
mod edges;
mod subset;
mod vertices;

pub use array::VertexArray;
pub use edges::Emitter;
pub use subset::VertexSubset;

use core::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::concurrency::atomic::bitset::WORD_BITS;
use crate::concurrency::{AtomicValue, ChannelId, ChannelTable};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::GraphPartition;

/// Traversal direction of one `process_edges` round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sparse mode: active sources walk their outgoing runs.
    Push,
    /// Dense mode: every destination walks its incoming run.
    Pull,
}

/// Per-call options of [`Engine::process_edges`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeOptions {
    /// Channel whose buffers carry this traversal's messages.
    pub channel: ChannelId,
    /// Forces a direction instead of choosing by frontier density.
    pub direction: Option<Direction>,
    /// Overrides [`EngineConfig::dense_threshold`] for this call.
    pub density_threshold: Option<f64>,
}

impl EdgeOptions {
    /// Options for `channel` with density-based direction choice.
    pub fn on_channel(channel: ChannelId) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    /// Forces `direction`.
    #[must_use]
    pub fn force(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Overrides the density threshold.
    #[must_use]
    pub fn threshold(mut self, fraction: f64) -> Self {
        self.density_threshold = Some(fraction);
        self
    }
}

/// Shared traversal engine over one graph partition.
///
/// `Engine` is `Sync`: several threads may issue rounds against one engine
/// concurrently as long as each uses its own channel.
pub struct Engine {
    graph: Arc<GraphPartition>,
    config: EngineConfig,
    pool: rayon::ThreadPool,
    channels: ChannelTable,
    lanes: Box<[Range<usize>]>,
}

impl Engine {
    /// Starts a worker pool for `graph`.
    ///
    /// # Errors
    /// Fails if `config` is invalid or the pool cannot be spawned.
    pub fn new(graph: Arc<GraphPartition>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("fusegraph-{i}"))
            .build()?;
        let threads = pool.current_num_threads();
        let lanes = partition_lanes(graph.vertices(), threads * config.lanes_per_thread);
        debug!(
            vertices = graph.vertices(),
            edges = graph.edges(),
            threads,
            lanes = lanes.len(),
            channels = config.channels,
            "engine ready"
        );
        Ok(Self {
            graph,
            config,
            pool,
            channels: ChannelTable::new(config.channels),
            lanes,
        })
    }

    /// The graph partition.
    #[inline(always)]
    pub fn graph(&self) -> &GraphPartition {
        &self.graph
    }

    /// The shared handle to the graph partition.
    pub fn shared_graph(&self) -> &Arc<GraphPartition> {
        &self.graph
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn vertices(&self) -> usize {
        self.graph.vertices()
    }

    /// Effective configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Number of message channels.
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Vertex ranges of the lanes, in ascending order.
    pub fn lanes(&self) -> &[Range<usize>] {
        &self.lanes
    }

    /// Runs `op` inside the engine's worker pool.
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }

    /// Allocates a state array initialised to `T::default()`.
    pub fn alloc_vertex_array<T: AtomicValue + Default>(&self) -> VertexArray<T> {
        self.alloc_vertex_array_with(T::default())
    }

    /// Allocates a state array initialised to `value`.
    pub fn alloc_vertex_array_with<T: AtomicValue>(&self, value: T) -> VertexArray<T> {
        self.install(|| VertexArray::new(self.vertices(), value))
    }

    /// Overwrites every slot of `array`.
    ///
    /// # Panics
    /// Panics if `array` was sized for another graph.
    pub fn fill_vertex_array<T: AtomicValue>(&self, array: &VertexArray<T>, value: T) {
        assert_eq!(array.len(), self.vertices(), "array size does not match the graph");
        self.install(|| array.fill(value));
    }

    /// Allocates an empty subset.
    pub fn alloc_vertex_subset(&self) -> VertexSubset {
        VertexSubset::new(self.vertices())
    }

    /// Allocates a subset with every vertex active.
    pub fn all_vertices(&self) -> VertexSubset {
        let subset = self.alloc_vertex_subset();
        self.install(|| subset.fill());
        subset
    }

    /// Collects `array` for reporting.
    ///
    /// A single-process engine owns every vertex, so this is a snapshot.
    pub fn gather_vertex_array<T: AtomicValue>(&self, array: &VertexArray<T>) -> Vec<T> {
        self.install(|| array.snapshot())
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("vertices", &self.graph.vertices())
            .field("edges", &self.graph.edges())
            .field("config", &self.config)
            .field("lanes", &self.lanes.len())
            .finish_non_exhaustive()
    }
}

/// Splits `0..vertices` into at most `lanes` word-aligned ranges.
fn partition_lanes(vertices: usize, lanes: usize) -> Box<[Range<usize>]> {
    let step = vertices
        .div_ceil(lanes.max(1))
        .next_multiple_of(WORD_BITS)
        .max(WORD_BITS);
    (0..vertices)
        .step_by(step)
        .map(|start| start..(start + step).min(vertices))
        .collect()
}

#[cfg(test)]
mod tests;
