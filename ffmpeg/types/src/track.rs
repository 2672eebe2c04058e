/*!
    Shared per-track descriptor.
*/

use parking_lot::RwLock;

use crate::{ChannelLayout, MediaType, PixelFormat, Rational, SampleFormat};

/**
    Descriptor of one media track.

    Tracks are shared between pipeline stages behind an `Arc`. Everything is
    fixed at construction except the resolution, which a filter stage may
    correct in place through [`MediaTrack::set_resolution`] when the decoded
    frames no longer match the advertised dimensions.
*/
#[derive(Debug)]
pub struct MediaTrack {
    id: u32,
    media_type: MediaType,
    time_base: Rational,
    // (width, height), written together so readers never see a torn pair
    resolution: RwLock<(u32, u32)>,
    pixel_format: Option<PixelFormat>,
    sample_rate: u32,
    channels: Option<ChannelLayout>,
    sample_format: Option<SampleFormat>,
}

impl MediaTrack {
    /**
        Create a track with no audio or video parameters.
    */
    pub fn new(id: u32, media_type: MediaType, time_base: Rational) -> Self {
        Self {
            id,
            media_type,
            time_base,
            resolution: RwLock::new((0, 0)),
            pixel_format: None,
            sample_rate: 0,
            channels: None,
            sample_format: None,
        }
    }

    /**
        Create a video track.
    */
    pub fn video(
        id: u32,
        time_base: Rational,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
    ) -> Self {
        Self {
            resolution: RwLock::new((width, height)),
            pixel_format: Some(pixel_format),
            ..Self::new(id, MediaType::Video, time_base)
        }
    }

    /**
        Create an audio track.
    */
    pub fn audio(
        id: u32,
        time_base: Rational,
        sample_rate: u32,
        channels: ChannelLayout,
        sample_format: SampleFormat,
    ) -> Self {
        Self {
            sample_rate,
            channels: Some(channels),
            sample_format: Some(sample_format),
            ..Self::new(id, MediaType::Audio, time_base)
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn width(&self) -> u32 {
        self.resolution.read().0
    }

    pub fn height(&self) -> u32 {
        self.resolution.read().1
    }

    /**
        Current `(width, height)`, read atomically.
    */
    pub fn resolution(&self) -> (u32, u32) {
        *self.resolution.read()
    }

    /**
        Replace the advertised resolution.

        This is the only mutation a shared track accepts.
    */
    pub fn set_resolution(&self, width: u32, height: u32) {
        *self.resolution.write() = (width, height);
    }

    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.pixel_format
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> Option<ChannelLayout> {
        self.channels
    }

    pub fn sample_format(&self) -> Option<SampleFormat> {
        self.sample_format
    }
}

static_assertions::assert_impl_all!(MediaTrack: Send, Sync);
