/*!
    Media type of a track or frame.
*/

use std::fmt;

/**
    Kind of media carried by a track.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video track
    Video,
    /// Audio track
    Audio,
    /// Timed data track (metadata, id3, etc.)
    Data,
    /// Subtitle track
    Subtitle,
}

impl MediaType {
    /**
        Lowercase name, used in identifiers and log fields.
    */
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Data => "data",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
