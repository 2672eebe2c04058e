/*!
    Decoded frame types.
*/

use crate::{ChannelLayout, MediaType, PixelFormat, Pts, Rational, SampleFormat};

/**
    A decoded video frame.

    Contains raw pixel data in the format specified by `format`, stored
    tightly without row padding. Packed formats have all data in a single
    contiguous buffer, planar formats store their planes back to back.
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format of the data.
    pub format: PixelFormat,
    /// Presentation timestamp (None for frames without timing).
    pub pts: Option<Pts>,
    /// Time base for interpreting the PTS.
    pub time_base: Rational,
}

impl VideoFrame {
    /**
        Create a new video frame.
    */
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data,
            width,
            height,
            format,
            pts,
            time_base,
        }
    }

    /**
        Returns the presentation time as a Duration, if PTS is set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.pts.map(|pts| pts.to_duration(self.time_base))
    }

    /**
        Returns the expected data length in bytes for this frame's size and format.
    */
    pub fn expected_data_len(&self) -> usize {
        self.format.frame_size(self.width, self.height)
    }
}

/**
    A decoded audio frame.

    Contains raw sample data in the format specified by `format`.
    Samples are interleaved for multi-channel audio.
*/
#[derive(Clone, Debug)]
pub struct AudioFrame {
    /**
        Raw sample data as bytes.

        Interpret according to `format` and `channels`.
        For interleaved stereo F32: [L0, R0, L1, R1, ...]
    */
    pub data: Vec<u8>,
    /**
        Number of samples per channel.
    */
    pub samples: usize,
    /**
        Sample rate in Hz.
    */
    pub sample_rate: u32,
    /**
        Channel layout.
    */
    pub channels: ChannelLayout,
    /**
        Sample format.
    */
    pub format: SampleFormat,
    /**
        Presentation timestamp (None for frames without timing).
    */
    pub pts: Option<Pts>,
    /**
        Time base for interpreting the PTS.
    */
    pub time_base: Rational,
}

impl AudioFrame {
    /**
        Create a new audio frame.
    */
    pub fn new(
        data: Vec<u8>,
        samples: usize,
        sample_rate: u32,
        channels: ChannelLayout,
        format: SampleFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data,
            samples,
            sample_rate,
            channels,
            format,
            pts,
            time_base,
        }
    }

    /**
        Returns the presentation time as a Duration, if PTS is set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.pts.map(|pts| pts.to_duration(self.time_base))
    }

    /**
        Returns the duration of this frame based on sample count and rate.
    */
    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.samples as f64 / self.sample_rate as f64)
    }

    /**
        Returns the total number of samples (samples per channel * channels).
    */
    pub fn total_samples(&self) -> usize {
        self.samples * self.channels.channels() as usize
    }

    /**
        Returns the expected data length in bytes.
    */
    pub fn expected_data_len(&self) -> usize {
        self.total_samples() * self.format.bytes_per_sample()
    }
}

/**
    A decoded frame of either kind, as it travels between pipeline stages.
*/
#[derive(Clone, Debug)]
pub enum MediaFrame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

impl MediaFrame {
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Video(_) => MediaType::Video,
            Self::Audio(_) => MediaType::Audio,
        }
    }

    /**
        Raw presentation timestamp, if the frame carries one.
    */
    pub fn pts(&self) -> Option<i64> {
        match self {
            Self::Video(frame) => frame.pts,
            Self::Audio(frame) => frame.pts,
        }
        .map(i64::from)
    }

    pub fn time_base(&self) -> Rational {
        match self {
            Self::Video(frame) => frame.time_base,
            Self::Audio(frame) => frame.time_base,
        }
    }

    /**
        `(width, height)` of a video frame, `None` for audio.
    */
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Video(frame) => Some((frame.width, frame.height)),
            Self::Audio(_) => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoFrame> {
        match self {
            Self::Video(frame) => Some(frame),
            Self::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioFrame> {
        match self {
            Self::Audio(frame) => Some(frame),
            Self::Video(_) => None,
        }
    }
}

impl From<VideoFrame> for MediaFrame {
    fn from(frame: VideoFrame) -> Self {
        Self::Video(frame)
    }
}

impl From<AudioFrame> for MediaFrame {
    fn from(frame: AudioFrame) -> Self {
        Self::Audio(frame)
    }
}

// Ensure frames are Send + Sync
static_assertions::assert_impl_all!(VideoFrame: Send, Sync);
static_assertions::assert_impl_all!(AudioFrame: Send, Sync);
static_assertions::assert_impl_all!(MediaFrame: Send, Sync);
