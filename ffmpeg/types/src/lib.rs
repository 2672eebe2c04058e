/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases
    - [`Pts`] - Timestamps in time_base units
    - [`VideoFrame`], [`AudioFrame`] and [`MediaFrame`] - Raw frame data

    # Format Types

    - [`PixelFormat`] - Video pixel formats
    - [`SampleFormat`] - Audio sample formats
    - [`ChannelLayout`] - Audio channel layouts

    # Track and Stream Metadata

    - [`MediaType`] - Kind of media carried by a track
    - [`MediaTrack`] - Shared per-track descriptor (time base, dimensions, audio params)
    - [`StreamInfo`] - Owning application and stream names

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod error;
mod format;
mod frame;
mod media;
mod rational;
mod stream;
mod timestamp;
mod track;

pub use error::{Error, Result};
pub use format::{ChannelLayout, PixelFormat, SampleFormat};
pub use frame::{AudioFrame, MediaFrame, VideoFrame};
pub use media::MediaType;
pub use rational::Rational;
pub use stream::StreamInfo;
pub use timestamp::Pts;
pub use track::MediaTrack;
