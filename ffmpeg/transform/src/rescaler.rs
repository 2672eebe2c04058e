/*!
    Video filter engine.
*/

use std::sync::Arc;

use ffmpeg_types::{Error, MediaFrame, MediaTrack, MediaType, Rational, Result};

use crate::engine::{CompleteHandler, DEFAULT_QUEUE_CAPACITY, EngineCore, FilterEngine};
use crate::urn::QueueUrn;
use crate::video::{ScalingAlgorithm, VideoTransform, VideoTransformConfig};
use crate::worker::FrameProcessor;

/**
    Scales video frames to the output track's resolution and pixel format.

    The input resolution is taken from the input track when the engine is
    configured and reported back through `input_width` / `input_height`, so
    the owner can tell when incoming frames no longer match it.
*/
pub struct FilterRescaler {
    core: EngineCore,
    algorithm: ScalingAlgorithm,
    config: Option<VideoTransformConfig>,
    input_size: (u32, u32),
    input_time_base: Rational,
    output_time_base: Rational,
}

impl FilterRescaler {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            core: EngineCore::new(queue_capacity),
            algorithm: ScalingAlgorithm::default(),
            config: None,
            input_size: (0, 0),
            input_time_base: Rational::new(1, 1),
            output_time_base: Rational::new(1, 1),
        }
    }

    pub fn with_algorithm(mut self, algorithm: ScalingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl Default for FilterRescaler {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine for FilterRescaler {
    fn set_queue_urn(&mut self, urn: QueueUrn) {
        self.core.set_urn(urn);
    }

    fn set_complete_handler(&mut self, handler: CompleteHandler) {
        self.core.set_handler(handler);
    }

    fn configure(&mut self, input: &Arc<MediaTrack>, output: &Arc<MediaTrack>) -> Result<()> {
        if input.media_type() != MediaType::Video || output.media_type() != MediaType::Video {
            return Err(Error::invalid_config(format!(
                "rescaler needs video tracks, got {} -> {}",
                input.media_type(),
                output.media_type()
            )));
        }
        let (Some(input_format), Some(output_format)) =
            (input.pixel_format(), output.pixel_format())
        else {
            return Err(Error::invalid_config(format!(
                "track {} or {} has no pixel format",
                input.id(),
                output.id()
            )));
        };

        let (width, height) = output.resolution();
        let config =
            VideoTransformConfig::new(width, height, output_format).with_algorithm(self.algorithm);
        if !config.supports_input(input_format) {
            return Err(Error::unsupported_format(format!(
                "{input_format:?} -> {output_format:?}"
            )));
        }

        self.config = Some(config);
        self.input_size = input.resolution();
        self.input_time_base = input.time_base();
        self.output_time_base = output.time_base();

        tracing::debug!(
            urn = %self.core.urn(),
            input_track = input.id(),
            output_track = output.id(),
            input_width = self.input_size.0,
            input_height = self.input_size.1,
            "rescaler configured"
        );
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let config = self
            .config
            .ok_or_else(|| Error::invalid_config("rescaler started before configure"))?;
        self.core.start(RescaleProcessor {
            transform: VideoTransform::new(config),
            output_time_base: self.output_time_base,
        })?;
        tracing::info!(urn = %self.core.urn(), "rescaler started");
        Ok(())
    }

    fn stop(&mut self) {
        self.core.stop();
    }

    fn send_buffer(&self, frame: MediaFrame) -> Result<()> {
        self.core.send(frame)
    }

    fn input_width(&self) -> u32 {
        self.input_size.0
    }

    fn input_height(&self) -> u32 {
        self.input_size.1
    }

    fn input_time_base(&self) -> Rational {
        self.input_time_base
    }

    fn output_time_base(&self) -> Rational {
        self.output_time_base
    }
}

struct RescaleProcessor {
    transform: VideoTransform,
    output_time_base: Rational,
}

impl FrameProcessor for RescaleProcessor {
    fn process(&mut self, frame: MediaFrame) -> Result<MediaFrame> {
        let MediaFrame::Video(frame) = frame else {
            return Err(Error::invalid_data("rescaler received an audio frame"));
        };
        let mut output = self.transform.transform(&frame)?;
        output.pts = output
            .pts
            .map(|pts| pts.rescale(output.time_base, self.output_time_base));
        output.time_base = self.output_time_base;
        Ok(output.into())
    }
}

static_assertions::assert_impl_all!(FilterRescaler: Send, Sync);
