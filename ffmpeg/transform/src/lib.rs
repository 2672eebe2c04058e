/*!
    Media frame transformation for the ffmpeg crate ecosystem.

    This crate converts frames between formats:
    - **Video**: scaling, packed RGB layout conversion
    - **Audio**: resampling, channel layout conversion, sample format conversion

    It offers two layers. The frame transforms ([`VideoTransform`],
    [`AudioTransform`]) convert one frame at a time on the calling thread.
    The filter engines ([`FilterRescaler`], [`FilterResampler`]) wrap a
    transform in a worker thread fed by a bounded queue, and report each
    converted frame through a completion callback.

    # Filter Engines

    ```ignore
    use std::sync::Arc;
    use ffmpeg_transform::{FilterEngine, FilterResampler, QueueUrn};

    let mut engine = FilterResampler::new();
    engine.set_queue_urn(QueueUrn::new("live", "camera1", "trs", "filter_audio"));
    engine.set_complete_handler(Arc::new(|frame| {
        // Runs on the engine's worker thread
    }));
    engine.configure(&input_track, &output_track)?;
    engine.start()?;

    for frame in decoded_frames {
        engine.send_buffer(frame)?;
    }

    // Drains queued frames, then joins the worker
    engine.stop();
    ```

    # Frame Transforms

    ```ignore
    use ffmpeg_transform::{VideoTransform, VideoTransformConfig};

    // Convert any packed RGB frame to 1920x1080 BGRA for display
    let mut transform = VideoTransform::new(VideoTransformConfig::to_bgra(1920, 1080));
    let bgra_frame = transform.transform(&frame)?;
    ```

    # Stateless vs Stateful

    **Video transformation is stateless**: each frame transforms independently.

    **Audio transformation is stateful**: the resampler carries history between
    frames, so frames should be processed in order. Call `reset()` after seeking.
*/

pub use ffmpeg_types::{
    AudioFrame, ChannelLayout, Error, MediaFrame, MediaTrack, PixelFormat, Result, SampleFormat,
    VideoFrame,
};

mod audio;
mod engine;
mod resampler;
mod rescaler;
mod urn;
mod video;
mod worker;

pub use audio::{AudioTransform, AudioTransformConfig};
pub use engine::{CompleteHandler, DEFAULT_QUEUE_CAPACITY, FilterEngine};
pub use resampler::FilterResampler;
pub use rescaler::FilterRescaler;
pub use urn::QueueUrn;
pub use video::{ScalingAlgorithm, VideoTransform, VideoTransformConfig};
