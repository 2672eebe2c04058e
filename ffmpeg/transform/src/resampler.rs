/*!
    Audio filter engine.
*/

use std::sync::Arc;

use ffmpeg_types::{Error, MediaFrame, MediaTrack, MediaType, Rational, Result};

use crate::audio::{AudioTransform, AudioTransformConfig};
use crate::engine::{CompleteHandler, DEFAULT_QUEUE_CAPACITY, EngineCore, FilterEngine};
use crate::urn::QueueUrn;
use crate::worker::FrameProcessor;

/**
    Resamples audio frames to the output track's rate, layout and sample format.
*/
pub struct FilterResampler {
    core: EngineCore,
    config: Option<AudioTransformConfig>,
    input_time_base: Rational,
    output_time_base: Rational,
}

impl FilterResampler {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            core: EngineCore::new(queue_capacity),
            config: None,
            input_time_base: Rational::new(1, 1),
            output_time_base: Rational::new(1, 1),
        }
    }
}

impl Default for FilterResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine for FilterResampler {
    fn set_queue_urn(&mut self, urn: QueueUrn) {
        self.core.set_urn(urn);
    }

    fn set_complete_handler(&mut self, handler: CompleteHandler) {
        self.core.set_handler(handler);
    }

    fn configure(&mut self, input: &Arc<MediaTrack>, output: &Arc<MediaTrack>) -> Result<()> {
        if input.media_type() != MediaType::Audio || output.media_type() != MediaType::Audio {
            return Err(Error::invalid_config(format!(
                "resampler needs audio tracks, got {} -> {}",
                input.media_type(),
                output.media_type()
            )));
        }
        let (Some(channels), Some(format)) = (output.channels(), output.sample_format()) else {
            return Err(Error::invalid_config(format!(
                "output track {} has no channel layout or sample format",
                output.id()
            )));
        };
        if output.sample_rate() == 0 || output.sample_rate() > i32::MAX as u32 {
            return Err(Error::invalid_config(format!(
                "output track {} has an invalid sample rate {}",
                output.id(),
                output.sample_rate()
            )));
        }

        self.config = Some(AudioTransformConfig::new(
            output.sample_rate(),
            channels,
            format,
        ));
        self.input_time_base = input.time_base();
        self.output_time_base = output.time_base();

        tracing::debug!(
            urn = %self.core.urn(),
            input_track = input.id(),
            output_track = output.id(),
            sample_rate = output.sample_rate(),
            "resampler configured"
        );
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let config = self
            .config
            .ok_or_else(|| Error::invalid_config("resampler started before configure"))?;
        self.core.start(ResampleProcessor {
            transform: AudioTransform::new(config),
            output_time_base: self.output_time_base,
        })?;
        tracing::info!(urn = %self.core.urn(), "resampler started");
        Ok(())
    }

    fn stop(&mut self) {
        self.core.stop();
    }

    fn send_buffer(&self, frame: MediaFrame) -> Result<()> {
        self.core.send(frame)
    }

    fn input_width(&self) -> u32 {
        0
    }

    fn input_height(&self) -> u32 {
        0
    }

    fn input_time_base(&self) -> Rational {
        self.input_time_base
    }

    fn output_time_base(&self) -> Rational {
        self.output_time_base
    }
}

struct ResampleProcessor {
    transform: AudioTransform,
    output_time_base: Rational,
}

impl FrameProcessor for ResampleProcessor {
    fn process(&mut self, frame: MediaFrame) -> Result<MediaFrame> {
        let MediaFrame::Audio(frame) = frame else {
            return Err(Error::invalid_data("resampler received a video frame"));
        };
        let mut output = self.transform.transform(&frame)?;
        output.pts = output
            .pts
            .map(|pts| pts.rescale(output.time_base, self.output_time_base));
        output.time_base = self.output_time_base;
        Ok(output.into())
    }
}

static_assertions::assert_impl_all!(FilterResampler: Send, Sync);
