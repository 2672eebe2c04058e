/*!
    Pixel and sample format types.
*/

/**
    Video pixel formats.

    This is a subset of formats commonly encountered in media pipelines.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
    /// Semi-planar YUV 4:2:0, 12bpp (common hardware decoder output)
    Nv12,
    /// Packed BGRA, 32bpp
    Bgra,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
}

impl PixelFormat {
    /**
        Returns the number of bits per pixel for this format.

        For planar formats, this is the average bits per pixel.
    */
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Yuv420p | Self::Nv12 => 12,
            Self::Rgb24 | Self::Bgr24 => 24,
            Self::Bgra | Self::Rgba => 32,
        }
    }

    /**
        Returns true if this is a planar format.
    */
    pub const fn is_planar(self) -> bool {
        match self {
            Self::Yuv420p | Self::Nv12 => true,
            Self::Bgra | Self::Rgba | Self::Rgb24 | Self::Bgr24 => false,
        }
    }

    /**
        For packed RGB formats, the byte offsets of the red, green, blue and
        (optional) alpha components within one pixel.
    */
    pub const fn rgb_layout(self) -> Option<([usize; 3], Option<usize>)> {
        match self {
            Self::Rgba => Some(([0, 1, 2], Some(3))),
            Self::Bgra => Some(([2, 1, 0], Some(3))),
            Self::Rgb24 => Some(([0, 1, 2], None)),
            Self::Bgr24 => Some(([2, 1, 0], None)),
            Self::Yuv420p | Self::Nv12 => None,
        }
    }

    /**
        Returns the number of bytes a frame of the given size occupies
        when stored tightly (no row padding).

        Chroma planes of 4:2:0 formats round odd dimensions up.
    */
    pub const fn frame_size(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            Self::Yuv420p | Self::Nv12 => {
                let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
                w * h + 2 * cw * ch
            }
            Self::Rgb24 | Self::Bgr24 => w * h * 3,
            Self::Bgra | Self::Rgba => w * h * 4,
        }
    }
}

/**
    Audio sample formats.

    All formats are interleaved and little-endian.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleFormat {
    /// 32-bit floating point, range [-1.0, 1.0]
    F32,
    /// 64-bit floating point
    F64,
    /// Signed 16-bit integer
    S16,
    /// Signed 32-bit integer
    S32,
    /// Unsigned 8-bit integer
    U8,
}

impl SampleFormat {
    /**
        Returns the number of bytes per sample.
    */
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /**
        Returns true if this is a floating-point format.
    */
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/**
    Audio channel layout.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChannelLayout {
    /// Single channel
    Mono,
    /// Left and right channels
    Stereo,
}

impl ChannelLayout {
    /**
        Returns the number of channels.
    */
    pub const fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}
