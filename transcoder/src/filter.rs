/*!
    The adaptive filter stage.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use ffmpeg_transform::{FilterEngine, QueueUrn};
use ffmpeg_types::{MediaFrame, MediaTrack, MediaType, Rational, StreamInfo};

use crate::config::FilterConfig;
use crate::discontinuity::{Discontinuity, PtsTracker};
use crate::error::FilterError;
use crate::factory::{DefaultEngineFactory, EngineFactory};

/**
    Downstream callback receiving `(filter_id, frame)` for every output frame.

    Runs on the engine's worker thread. It may call the accessors of the
    filter that invoked it, but not `stop` or `send_buffer`: both can join
    the worker the handler is running on.
*/
pub type FilterCompleteHandler = Arc<dyn Fn(i32, MediaFrame) + Send + Sync>;

/**
    Routes frames of one input track through a resampler or rescaler,
    rebuilding the engine whenever the stream becomes discontinuous.

    A rebuild is triggered by a timestamp jump larger than
    `pts_increment_limit` seconds, or, for video, by a frame whose
    dimensions differ from the engine's input dimensions. In the latter
    case the input track's resolution is corrected first, so the new engine
    and every other reader of the track see the new size.

    `send_buffer` may run concurrently with completions, `stop` and the
    timebase accessors. Frames must come from a single producer thread:
    the last seen PTS is kept outside the engine lock.
*/
pub struct TranscodeFilter {
    config: FilterConfig,
    factory: Arc<dyn EngineFactory>,
    binding: Option<Binding>,
    tracker: PtsTracker,
    engine: RwLock<Option<Box<dyn FilterEngine>>>,
    builds: AtomicU64,
}

struct Binding {
    filter_id: i32,
    input_stream: Arc<StreamInfo>,
    input_track: Arc<MediaTrack>,
    output_stream: Arc<StreamInfo>,
    output_track: Arc<MediaTrack>,
    relay: Arc<CompletionRelay>,
}

impl Binding {
    fn queue_urn(&self) -> QueueUrn {
        QueueUrn::new(
            self.input_stream.application_name(),
            self.input_stream.name(),
            "trs",
            format!("filter_{}", self.input_track.media_type()),
        )
    }
}

/**
    Forwards engine completions to the registered handler, tagged with the
    filter id. Holds no lock and buffers nothing.
*/
struct CompletionRelay {
    filter_id: i32,
    handler: Option<FilterCompleteHandler>,
}

impl CompletionRelay {
    fn on_complete(&self, frame: MediaFrame) {
        if let Some(handler) = &self.handler {
            handler(self.filter_id, frame);
        }
    }
}

impl TranscodeFilter {
    /**
        Create an unconfigured filter with default settings and engines.
    */
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    /**
        Create an unconfigured filter using the engines from `ffmpeg-transform`.
    */
    pub fn with_config(config: FilterConfig) -> Self {
        let factory = Arc::new(DefaultEngineFactory::new(config.queue_capacity));
        Self::with_factory(config, factory)
    }

    /**
        Create an unconfigured filter that builds its engines through `factory`.
    */
    pub fn with_factory(config: FilterConfig, factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            config,
            factory,
            binding: None,
            tracker: PtsTracker::new(0),
            engine: RwLock::new(None),
            builds: AtomicU64::new(0),
        }
    }

    /**
        Bind the filter to its tracks and build the first engine.

        Calling this again rebinds the filter, replacing any running engine
        and forgetting the last seen PTS. On error the filter is left
        unconfigured and only another `configure` makes it usable.
    */
    pub fn configure(
        &mut self,
        filter_id: i32,
        input_stream: Arc<StreamInfo>,
        input_track: Arc<MediaTrack>,
        output_stream: Arc<StreamInfo>,
        output_track: Arc<MediaTrack>,
        complete_handler: Option<FilterCompleteHandler>,
    ) -> Result<(), FilterError> {
        tracing::debug!(
            filter_id,
            track_id = input_track.id(),
            media_type = %input_track.media_type(),
            "create a transcode filter"
        );

        let threshold = self
            .config
            .threshold_for(input_track.time_base().timescale());
        self.tracker = PtsTracker::new(threshold);
        self.binding = Some(Binding {
            filter_id,
            input_stream,
            input_track,
            output_stream,
            output_track,
            relay: Arc::new(CompletionRelay {
                filter_id,
                handler: complete_handler,
            }),
        });

        if let Err(e) = self.create_filter() {
            self.binding = None;
            return Err(e);
        }
        Ok(())
    }

    /**
        Pass one frame to the engine, rebuilding it first if the frame is
        discontinuous with the previous one.

        Fails if the rebuild fails, if no engine is active, or if the engine
        rejects the frame; in each case the frame is dropped.
    */
    pub fn send_buffer(&self, frame: MediaFrame) -> Result<(), FilterError> {
        let binding = self.binding.as_ref().ok_or(FilterError::NotConfigured)?;

        if let Some(discontinuity) = self.detect_discontinuity(binding, &frame) {
            tracing::debug!(filter_id = binding.filter_id, %discontinuity, "rebuilding filter");
            if let Err(e) = self.create_filter() {
                tracing::error!(
                    filter_id = binding.filter_id,
                    error = %e,
                    "failed to regenerate filter"
                );
                return Err(e);
            }
        }

        let engine = self.engine.read();
        let engine = engine.as_ref().ok_or(FilterError::NoEngine)?;
        engine.send_buffer(frame).map_err(FilterError::Delegation)
    }

    /**
        Stop and release the engine. Does nothing if none is active.
    */
    pub fn stop(&self) {
        let engine = self.engine.write().take();
        if let Some(mut engine) = engine {
            engine.stop();
            tracing::debug!(filter_id = ?self.filter_id(), "transcode filter stopped");
        }
    }

    pub fn input_time_base(&self) -> Result<Rational, FilterError> {
        let engine = self.engine.read();
        engine
            .as_ref()
            .map(|engine| engine.input_time_base())
            .ok_or(FilterError::NoEngine)
    }

    pub fn output_time_base(&self) -> Result<Rational, FilterError> {
        let engine = self.engine.read();
        engine
            .as_ref()
            .map(|engine| engine.output_time_base())
            .ok_or(FilterError::NoEngine)
    }

    /**
        Id given to `configure`, or `None` before the first call.
    */
    pub fn filter_id(&self) -> Option<i32> {
        self.binding.as_ref().map(|binding| binding.filter_id)
    }

    pub fn has_engine(&self) -> bool {
        self.engine.read().is_some()
    }

    pub fn last_pts(&self) -> Option<i64> {
        self.tracker.last_pts()
    }

    /**
        Largest tolerated PTS delta, in input time base units.
    */
    pub fn threshold(&self) -> i64 {
        self.tracker.threshold()
    }

    /**
        Number of engines successfully built, the initial one included.
    */
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn input_track(&self) -> Option<&Arc<MediaTrack>> {
        self.binding.as_ref().map(|binding| &binding.input_track)
    }

    pub fn output_track(&self) -> Option<&Arc<MediaTrack>> {
        self.binding.as_ref().map(|binding| &binding.output_track)
    }

    pub fn output_stream(&self) -> Option<&Arc<StreamInfo>> {
        self.binding.as_ref().map(|binding| &binding.output_stream)
    }

    fn detect_discontinuity(&self, binding: &Binding, frame: &MediaFrame) -> Option<Discontinuity> {
        let jump = frame.pts().and_then(|pts| self.tracker.observe(pts));
        if let Some(Discontinuity::TimestampJump { from, to }) = jump {
            tracing::warn!(
                filter_id = binding.filter_id,
                track_id = binding.input_track.id(),
                from,
                to,
                "timestamp has changed abnormally"
            );
        }

        // checked even after a jump, so the rebuild sees the corrected track
        let resized = self.detect_resize(binding, frame);
        jump.or(resized)
    }

    fn detect_resize(&self, binding: &Binding, frame: &MediaFrame) -> Option<Discontinuity> {
        let track = &binding.input_track;
        if track.media_type() != MediaType::Video {
            return None;
        }
        let size = frame.dimensions()?;

        let engine = self.engine.read();
        let engine = engine.as_ref()?;
        let current = (engine.input_width(), engine.input_height());
        if current == size {
            return None;
        }

        tracing::info!(
            filter_id = binding.filter_id,
            track_id = track.id(),
            from = ?current,
            to = ?size,
            "changed input resolution"
        );
        track.set_resolution(size.0, size.1);
        Some(Discontinuity::ResolutionChange {
            from: current,
            to: size,
        })
    }

    /**
        Replace the engine. The previous one is detached under the write lock
        but stopped after the lock is released, so completion handlers still
        draining on its worker can call back into this filter. It is fully
        drained before `send_buffer` hands anything to its replacement.
    */
    fn create_filter(&self) -> Result<(), FilterError> {
        let binding = self.binding.as_ref().ok_or(FilterError::NotConfigured)?;

        let (previous, result) = {
            let mut slot = self.engine.write();
            let previous = slot.take();
            let result = self.build_engine(binding).map(|engine| {
                *slot = Some(engine);
                self.builds.fetch_add(1, Ordering::Relaxed);
            });
            (previous, result)
        };

        if let Some(mut previous) = previous {
            previous.stop();
        }
        result
    }

    fn build_engine(&self, binding: &Binding) -> Result<Box<dyn FilterEngine>, FilterError> {
        let media_type = binding.input_track.media_type();
        let mut engine = match media_type {
            MediaType::Audio => self.factory.resampler(),
            MediaType::Video => self.factory.rescaler(),
            other => {
                tracing::error!(
                    filter_id = binding.filter_id,
                    media_type = %other,
                    "unsupported media type in filter"
                );
                return Err(FilterError::UnsupportedMediaType(other));
            }
        };

        let urn = binding.queue_urn();
        engine.set_queue_urn(urn.clone());
        let relay = Arc::clone(&binding.relay);
        engine.set_complete_handler(Arc::new(move |frame: MediaFrame| relay.on_complete(frame)));

        if let Err(e) = engine.configure(&binding.input_track, &binding.output_track) {
            tracing::error!(filter_id = binding.filter_id, %urn, error = %e, "could not create filter");
            return Err(FilterError::EngineConfigure(e));
        }
        if let Err(e) = engine.start() {
            tracing::error!(filter_id = binding.filter_id, %urn, error = %e, "could not start filter");
            return Err(FilterError::EngineStart(e));
        }
        Ok(engine)
    }
}

impl Default for TranscodeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TranscodeFilter {
    fn drop(&mut self) {
        self.stop();
    }
}

static_assertions::assert_impl_all!(TranscodeFilter: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    use ffmpeg_types::{AudioFrame, ChannelLayout, PixelFormat, Pts, SampleFormat, VideoFrame};
    use parking_lot::Mutex;

    use crate::testing::{EngineStats, MockFactory};

    fn stream() -> Arc<StreamInfo> {
        Arc::new(StreamInfo::new("live", "camera1"))
    }

    fn audio_track(id: u32, timescale: i32) -> Arc<MediaTrack> {
        Arc::new(MediaTrack::audio(
            id,
            Rational::new(1, timescale),
            48000,
            ChannelLayout::Stereo,
            SampleFormat::F32,
        ))
    }

    fn video_track(id: u32, width: u32, height: u32) -> Arc<MediaTrack> {
        Arc::new(MediaTrack::video(
            id,
            Rational::new(1, 90000),
            width,
            height,
            PixelFormat::Yuv420p,
        ))
    }

    fn audio_frame(pts: i64) -> MediaFrame {
        AudioFrame::new(
            Vec::new(),
            0,
            48000,
            ChannelLayout::Stereo,
            SampleFormat::F32,
            Some(Pts(pts)),
            Rational::new(1, 1000),
        )
        .into()
    }

    fn video_frame(pts: i64, width: u32, height: u32) -> MediaFrame {
        VideoFrame::new(
            Vec::new(),
            width,
            height,
            PixelFormat::Yuv420p,
            Some(Pts(pts)),
            Rational::new(1, 90000),
        )
        .into()
    }

    fn mock_filter() -> (TranscodeFilter, Arc<EngineStats>) {
        let stats = Arc::new(EngineStats::default());
        let factory = Arc::new(MockFactory::new(Arc::clone(&stats)));
        (TranscodeFilter::with_factory(FilterConfig::default(), factory), stats)
    }

    fn configure_audio(filter: &mut TranscodeFilter, timescale: i32) {
        filter
            .configure(
                1,
                stream(),
                audio_track(1, timescale),
                stream(),
                audio_track(2, 48000),
                None,
            )
            .unwrap();
    }

    #[test]
    fn configure_builds_matching_variant() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        assert!(filter.has_engine());
        assert_eq!(filter.build_count(), 1);
        assert_eq!(stats.started(), 1);
        assert_eq!(stats.kinds(), vec![MediaType::Audio]);
        assert_eq!(filter.filter_id(), Some(1));
        assert_eq!(filter.input_track().map(|track| track.id()), Some(1));
        assert_eq!(filter.output_track().map(|track| track.id()), Some(2));
        assert_eq!(
            filter.output_stream().map(|stream| stream.name()),
            Some("camera1")
        );
        assert_eq!(
            stats.last_urn().as_deref(),
            Some("live/camera1/trs/filter_audio")
        );

        let (mut filter, stats) = mock_filter();
        let track = video_track(1, 1280, 720);
        filter
            .configure(2, stream(), Arc::clone(&track), stream(), track, None)
            .unwrap();
        assert_eq!(stats.kinds(), vec![MediaType::Video]);
        assert_eq!(
            stats.last_urn().as_deref(),
            Some("live/camera1/trs/filter_video")
        );
    }

    #[test]
    fn threshold_is_fifteen_timescales() {
        let (mut filter, _) = mock_filter();
        configure_audio(&mut filter, 1000);
        assert_eq!(filter.threshold(), 15_000);

        let (mut filter, _) = mock_filter();
        configure_audio(&mut filter, 48000);
        assert_eq!(filter.threshold(), 720_000);
    }

    #[test]
    fn delta_equal_to_threshold_does_not_rebuild() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);

        filter.send_buffer(audio_frame(0)).unwrap();
        filter.send_buffer(audio_frame(15_000)).unwrap();
        assert_eq!(stats.configured(), 1);

        filter.send_buffer(audio_frame(30_001)).unwrap();
        assert_eq!(stats.configured(), 2);
    }

    #[test]
    fn timestamp_jump_rebuilds_once() {
        // pts 0, 100, 16100 with a 15000 threshold
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);

        for pts in [0, 100, 16_100] {
            filter.send_buffer(audio_frame(pts)).unwrap();
        }
        assert_eq!(stats.configured(), 2);
        assert_eq!(stats.stopped(), 1);
        assert_eq!(filter.build_count(), 2);
        assert_eq!(filter.last_pts(), Some(16_100));

        // continuing from the new timeline does not trigger again
        filter.send_buffer(audio_frame(16_200)).unwrap();
        assert_eq!(stats.configured(), 2);
        assert_eq!(stats.delivered().len(), 4);
    }

    #[test]
    fn resolution_change_updates_track_and_rebuilds() {
        let (mut filter, stats) = mock_filter();
        let input = video_track(1, 1280, 720);
        filter
            .configure(
                3,
                stream(),
                Arc::clone(&input),
                stream(),
                video_track(2, 640, 360),
                None,
            )
            .unwrap();

        filter.send_buffer(video_frame(0, 1280, 720)).unwrap();
        assert_eq!(stats.configured(), 1);

        filter.send_buffer(video_frame(3000, 1920, 1080)).unwrap();
        assert_eq!(input.resolution(), (1920, 1080));
        assert_eq!(stats.configured(), 2);

        // delivered to the rebuilt engine, which now expects 1920x1080
        let delivered = stats.delivered();
        assert_eq!(delivered.last(), Some(&(2, Some((1920, 1080)))));
        filter.send_buffer(video_frame(6000, 1920, 1080)).unwrap();
        assert_eq!(stats.configured(), 2);
    }

    #[test]
    fn audio_filters_ignore_dimensions() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        // a video frame sent to an audio filter never checks resolution
        filter.send_buffer(video_frame(0, 1920, 1080)).unwrap();
        assert_eq!(stats.configured(), 1);
    }

    #[test]
    fn failed_rebuild_leaves_no_engine() {
        let (mut filter, stats) = mock_filter();
        stats.fail_configure_at(2);
        configure_audio(&mut filter, 1000);

        filter.send_buffer(audio_frame(0)).unwrap();
        let result = filter.send_buffer(audio_frame(100_000));
        assert!(matches!(result, Err(FilterError::EngineConfigure(_))));
        assert!(!filter.has_engine());
        assert_eq!(filter.last_pts(), Some(100_000));
        assert!(matches!(
            filter.input_time_base(),
            Err(FilterError::NoEngine)
        ));

        // no retry without a new discontinuity
        assert!(matches!(
            filter.send_buffer(audio_frame(100_100)),
            Err(FilterError::NoEngine)
        ));
        assert_eq!(stats.configured(), 2);

        // the next discontinuity gets one more attempt, which succeeds
        filter.send_buffer(audio_frame(500_000)).unwrap();
        assert!(filter.has_engine());
        assert_eq!(stats.configured(), 3);
    }

    #[test]
    fn failed_start_leaves_no_engine() {
        let (mut filter, stats) = mock_filter();
        stats.fail_start();
        let result = filter.configure(
            1,
            stream(),
            audio_track(1, 1000),
            stream(),
            audio_track(2, 48000),
            None,
        );
        assert!(matches!(result, Err(FilterError::EngineStart(_))));
        assert!(result.as_ref().is_err_and(|e| e.is_build_failure()));
        assert!(!filter.has_engine());
        assert_eq!(filter.build_count(), 0);
    }

    #[test]
    fn failed_configure_stays_unconfigured() {
        let (mut filter, stats) = mock_filter();
        stats.fail_configure_at(1);
        let result = filter.configure(
            1,
            stream(),
            audio_track(1, 1000),
            stream(),
            audio_track(2, 48000),
            None,
        );
        assert!(matches!(result, Err(FilterError::EngineConfigure(_))));
        assert_eq!(filter.filter_id(), None);
        assert!(filter.input_track().is_none());

        // a later jump must not bring an engine back
        for pts in [0, 100_000] {
            assert!(matches!(
                filter.send_buffer(audio_frame(pts)),
                Err(FilterError::NotConfigured)
            ));
        }
        assert!(!filter.has_engine());
        assert_eq!(stats.configured(), 1);

        configure_audio(&mut filter, 1000);
        filter.send_buffer(audio_frame(0)).unwrap();
        assert_eq!(stats.delivered().len(), 1);
    }

    #[test]
    fn unsupported_media_type_fails_configure() {
        let (mut filter, stats) = mock_filter();
        let track = Arc::new(MediaTrack::new(
            9,
            MediaType::Data,
            Rational::new(1, 1000),
        ));
        let result = filter.configure(1, stream(), Arc::clone(&track), stream(), track, None);
        assert!(matches!(
            result,
            Err(FilterError::UnsupportedMediaType(MediaType::Data))
        ));
        assert_eq!(stats.created(), 0);
        assert!(stats.kinds().is_empty());
        assert!(!filter.has_engine());
        assert!(matches!(
            filter.send_buffer(audio_frame(0)),
            Err(FilterError::NotConfigured)
        ));
    }

    #[test]
    fn send_after_stop_fails_without_side_effects() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        filter.send_buffer(audio_frame(0)).unwrap();

        filter.stop();
        assert!(matches!(
            filter.send_buffer(audio_frame(40)),
            Err(FilterError::NoEngine)
        ));
        assert_eq!(stats.delivered().len(), 1);
        assert_eq!(stats.configured(), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        filter.stop();
        filter.stop();
        assert!(!filter.has_engine());
        assert_eq!(stats.stopped(), 1);
    }

    #[test]
    fn send_before_configure_fails() {
        let (filter, _) = mock_filter();
        assert!(matches!(
            filter.send_buffer(audio_frame(0)),
            Err(FilterError::NotConfigured)
        ));
        assert_eq!(filter.filter_id(), None);
    }

    #[test]
    fn completions_carry_filter_id() {
        let (mut filter, _) = mock_filter();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler: FilterCompleteHandler = {
            let seen = Arc::clone(&seen);
            Arc::new(move |filter_id: i32, frame: MediaFrame| {
                seen.lock().push((filter_id, frame.pts()))
            })
        };
        filter
            .configure(
                42,
                stream(),
                audio_track(1, 1000),
                stream(),
                audio_track(2, 48000),
                Some(handler),
            )
            .unwrap();

        for pts in [0, 20, 40] {
            filter.send_buffer(audio_frame(pts)).unwrap();
        }
        // a rebuild keeps routing to the same handler and id
        filter.send_buffer(audio_frame(90_000)).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                (42, Some(0)),
                (42, Some(20)),
                (42, Some(40)),
                (42, Some(90_000))
            ]
        );
    }

    #[test]
    fn time_bases_follow_engine() {
        let (mut filter, _) = mock_filter();
        assert!(matches!(
            filter.output_time_base(),
            Err(FilterError::NoEngine)
        ));
        configure_audio(&mut filter, 1000);
        assert_eq!(filter.input_time_base().unwrap(), Rational::new(1, 1000));
        assert_eq!(filter.output_time_base().unwrap(), Rational::new(1, 48000));
    }

    #[test]
    fn reconfigure_resets_last_pts() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        filter.send_buffer(audio_frame(5_000)).unwrap();
        configure_audio(&mut filter, 1000);
        assert_eq!(filter.last_pts(), None);
        assert_eq!(stats.stopped(), 1);
        assert_eq!(filter.build_count(), 2);
    }

    #[test]
    fn frames_without_pts_skip_timestamp_check() {
        let (mut filter, stats) = mock_filter();
        configure_audio(&mut filter, 1000);
        filter.send_buffer(audio_frame(0)).unwrap();
        let mut frame = audio_frame(0);
        if let MediaFrame::Audio(audio) = &mut frame {
            audio.pts = None;
        }
        filter.send_buffer(frame).unwrap();
        assert_eq!(filter.last_pts(), Some(0));
        assert_eq!(stats.configured(), 1);
    }

    #[test]
    fn jump_with_new_resolution_rebuilds_once() {
        let (mut filter, stats) = mock_filter();
        let input = video_track(1, 1280, 720);
        filter
            .configure(
                3,
                stream(),
                Arc::clone(&input),
                stream(),
                video_track(2, 640, 360),
                None,
            )
            .unwrap();

        filter.send_buffer(video_frame(0, 1280, 720)).unwrap();
        filter
            .send_buffer(video_frame(10_000_000, 1920, 1080))
            .unwrap();
        assert_eq!(input.resolution(), (1920, 1080));
        assert_eq!(filter.build_count(), 2);

        filter
            .send_buffer(video_frame(10_003_000, 1920, 1080))
            .unwrap();
        assert_eq!(filter.build_count(), 2);
        assert_eq!(stats.configured(), 2);
        assert_eq!(
            stats.delivered().last(),
            Some(&(2, Some((1920, 1080))))
        );
    }

    #[test]
    fn stop_races_with_sender() {
        let (mut filter, _) = mock_filter();
        let stopped = Arc::new(AtomicBool::new(false));
        // one entry per delivery: whether `stop` had already returned
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let handler: FilterCompleteHandler = {
            let stopped = Arc::clone(&stopped);
            let delivered = Arc::clone(&delivered);
            Arc::new(move |_: i32, _: MediaFrame| {
                delivered.lock().push(stopped.load(Ordering::SeqCst))
            })
        };
        filter
            .configure(
                1,
                stream(),
                audio_track(1, 1000),
                stream(),
                audio_track(2, 48000),
                Some(handler),
            )
            .unwrap();
        let filter = Arc::new(filter);

        let producer = {
            let filter = Arc::clone(&filter);
            let stopped = Arc::clone(&stopped);
            thread::spawn(move || {
                let mut accepted = 0;
                let mut accepted_after_stop = 0;
                for i in 0..1000 {
                    let after_stop = stopped.load(Ordering::SeqCst);
                    if filter.send_buffer(audio_frame(i)).is_ok() {
                        accepted += 1;
                        if after_stop {
                            accepted_after_stop += 1;
                        }
                    }
                }
                (accepted, accepted_after_stop)
            })
        };
        filter.stop();
        stopped.store(true, Ordering::SeqCst);
        let (accepted, accepted_after_stop) = producer.join().unwrap();

        assert_eq!(accepted_after_stop, 0);
        let delivered = delivered.lock();
        assert_eq!(delivered.len(), accepted);
        assert!(delivered.iter().all(|&late| !late));
        assert!(!filter.has_engine());
        assert!(matches!(
            filter.send_buffer(audio_frame(2000)),
            Err(FilterError::NoEngine)
        ));
    }
}
