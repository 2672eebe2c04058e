/*!
    Adaptive filter stage of the transcoding pipeline.

    A [`TranscodeFilter`] sits between decode and encode. It owns one filter
    engine from `ffmpeg-transform` (a resampler for audio tracks, a rescaler
    for video tracks) and forwards every decoded frame to it. When the input
    stream breaks continuity the engine is torn down and rebuilt before the
    offending frame is processed:

    - **Timestamp jump**: two consecutive PTS values differ by more than
      `pts_increment_limit` seconds of the input time base (15 by default).
    - **Resolution change**: a video frame's dimensions differ from the ones
      the engine was configured with. The shared input track is updated to
      the new size first.

    Converted frames are delivered to a [`FilterCompleteHandler`] together
    with the filter id given at configure time.

    ```ignore
    use std::sync::Arc;
    use transcoder::{FilterConfig, TranscodeFilter};

    let mut filter = TranscodeFilter::with_config(FilterConfig::default());
    filter.configure(
        1,
        input_stream,
        input_track,
        output_stream,
        output_track,
        Some(Arc::new(|filter_id, frame| {
            // Runs on the engine's worker thread
        })),
    )?;

    for frame in decoded_frames {
        filter.send_buffer(frame)?;
    }
    filter.stop();
    ```
*/

mod config;
mod discontinuity;
mod error;
mod factory;
mod filter;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_PTS_INCREMENT_LIMIT, FilterConfig};
pub use discontinuity::{Discontinuity, PtsTracker};
pub use error::FilterError;
pub use factory::{DefaultEngineFactory, EngineFactory};
pub use filter::{FilterCompleteHandler, TranscodeFilter};
