use std::sync::Arc;

use dlstream_frame::ReaderConfig;
use dlstream_sample::ZoneCache;

/// Default capacity of every inter-stage queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 512;

/// Configuration for a pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Items each bounded queue holds before the producer waits. Default: 512.
    pub queue_capacity: usize,
    /// Settings for the blocking byte source.
    pub reader: ReaderConfig,
    /// Zone cache handed to the decode stage. Share one between pipelines
    /// to reuse zones across runs.
    pub zones: Arc<ZoneCache>,
}

impl PipelineConfig {
    /// Queue capacity, never below one.
    pub fn capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            reader: ReaderConfig::default(),
            zones: Arc::new(ZoneCache::new()),
        }
    }
}
