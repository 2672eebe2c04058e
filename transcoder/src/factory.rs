/*!
    Construction of filter engines.
*/

use ffmpeg_transform::{DEFAULT_QUEUE_CAPACITY, FilterEngine, FilterResampler, FilterRescaler};

/**
    Creates unconfigured engines for a [`TranscodeFilter`](crate::TranscodeFilter).

    The filter decides which variant it needs from the input media type;
    the factory only decides how each variant is built.
*/
pub trait EngineFactory: Send + Sync {
    /// A fresh engine for audio tracks.
    fn resampler(&self) -> Box<dyn FilterEngine>;

    /// A fresh engine for video tracks.
    fn rescaler(&self) -> Box<dyn FilterEngine>;
}

/**
    Builds the engines from `ffmpeg-transform`.
*/
#[derive(Clone, Debug)]
pub struct DefaultEngineFactory {
    queue_capacity: usize,
}

impl DefaultEngineFactory {
    pub fn new(queue_capacity: usize) -> Self {
        Self { queue_capacity }
    }
}

impl Default for DefaultEngineFactory {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl EngineFactory for DefaultEngineFactory {
    fn resampler(&self) -> Box<dyn FilterEngine> {
        Box::new(FilterResampler::with_queue_capacity(self.queue_capacity))
    }

    fn rescaler(&self) -> Box<dyn FilterEngine> {
        Box::new(FilterRescaler::with_queue_capacity(self.queue_capacity))
    }
}
