/*!
    Filter stage configuration.
*/

use serde::{Deserialize, Serialize};

use ffmpeg_transform::DEFAULT_QUEUE_CAPACITY;

/**
    Default number of seconds a timestamp may jump between two consecutive
    frames before the stream is treated as discontinuous.
*/
pub const DEFAULT_PTS_INCREMENT_LIMIT: i64 = 15;

/**
    Configuration for a [`TranscodeFilter`](crate::TranscodeFilter).

    Missing fields fall back to their defaults when deserialized.
*/
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Tolerated PTS jump, in seconds of the input track's timescale.
    pub pts_increment_limit: i64,
    /// Depth of each engine's frame queue.
    pub queue_capacity: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            pts_increment_limit: DEFAULT_PTS_INCREMENT_LIMIT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl FilterConfig {
    /**
        Create a config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pts_increment_limit(mut self, seconds: i64) -> Self {
        self.pts_increment_limit = seconds;
        self
    }

    /**
        Set the engine queue depth. Values below one are raised to one.
    */
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /**
        Threshold in time base units for a track with the given timescale.
    */
    pub fn threshold_for(&self, timescale: i64) -> i64 {
        timescale.saturating_mul(self.pts_increment_limit)
    }
}
