/*!
    Errors reported by the filter stage.
*/

use ffmpeg_types::MediaType;
use thiserror::Error;

/**
    Why a filter operation failed.

    Build failures (`UnsupportedMediaType`, `EngineConfigure`, `EngineStart`)
    leave the filter without an engine. `Delegation` means the frame was
    dropped; the engine stays in place.
*/
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter has not been configured")]
    NotConfigured,
    #[error("unsupported media type in filter: {0}")]
    UnsupportedMediaType(MediaType),
    #[error("could not configure filter engine")]
    EngineConfigure(#[source] ffmpeg_types::Error),
    #[error("could not start filter engine")]
    EngineStart(#[source] ffmpeg_types::Error),
    #[error("no filter engine is active")]
    NoEngine,
    #[error("filter engine rejected the frame")]
    Delegation(#[source] ffmpeg_types::Error),
}

impl FilterError {
    /**
        Returns true for errors raised while building an engine.
    */
    pub fn is_build_failure(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType(_) | Self::EngineConfigure(_) | Self::EngineStart(_)
        )
    }
}
