/*!
    Video scaling and packed pixel format conversion.
*/

use ffmpeg_types::{Error, PixelFormat, Result, VideoFrame};

/**
    Interpolation used when scaling.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Nearest neighbor, fastest.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
}

/**
    Target format for [`VideoTransform`].

    A width or height of zero keeps the input dimension.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoTransformConfig {
    /// Output width in pixels (0 = same as input).
    pub width: u32,
    /// Output height in pixels (0 = same as input).
    pub height: u32,
    /// Output pixel format.
    pub format: PixelFormat,
    /// Scaling algorithm.
    pub algorithm: ScalingAlgorithm,
}

impl VideoTransformConfig {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            algorithm: ScalingAlgorithm::default(),
        }
    }

    /**
        Scale to the given size and convert to BGRA for display.
    */
    pub fn to_bgra(width: u32, height: u32) -> Self {
        Self::new(width, height, PixelFormat::Bgra)
    }

    pub fn with_algorithm(mut self, algorithm: ScalingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /**
        Returns true if frames in `input` can be converted to this config's format.

        Planar formats can only be scaled within the same format; packed RGB
        formats convert freely between each other.
    */
    pub fn supports_input(&self, input: PixelFormat) -> bool {
        input == self.format
            || (input.rgb_layout().is_some() && self.format.rgb_layout().is_some())
    }

    fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        let w = if self.width == 0 { width } else { self.width };
        let h = if self.height == 0 { height } else { self.height };
        (w, h)
    }
}

/**
    Scales video frames and converts between packed RGB layouts.

    Sampling maps are computed for the first frame and reused until the
    input size or format changes.
*/
pub struct VideoTransform {
    config: VideoTransformConfig,
    plan: Option<ScalePlan>,
}

struct ScalePlan {
    input: (u32, u32, PixelFormat),
    output: (u32, u32),
    planes: Vec<PlanePlan>,
}

struct PlanePlan {
    src: (usize, usize),
    components: usize,
    xs: Vec<AxisSample>,
    ys: Vec<AxisSample>,
}

#[derive(Clone, Copy)]
struct AxisSample {
    lo: usize,
    hi: usize,
    frac: f32,
}

impl VideoTransform {
    pub fn new(config: VideoTransformConfig) -> Self {
        Self { config, plan: None }
    }

    pub fn config(&self) -> &VideoTransformConfig {
        &self.config
    }

    /**
        Transform one frame. Timing information is carried over unchanged.
    */
    pub fn transform(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        if frame.width == 0 || frame.height == 0 {
            return Err(Error::invalid_data("video frame has a zero dimension"));
        }
        if !self.config.supports_input(frame.format) {
            return Err(Error::unsupported_format(format!(
                "{:?} -> {:?}",
                frame.format, self.config.format
            )));
        }
        let expected = frame.expected_data_len();
        if frame.data.len() < expected {
            return Err(Error::invalid_data(format!(
                "video frame holds {} bytes, expected {expected}",
                frame.data.len()
            )));
        }

        let input = (frame.width, frame.height, frame.format);
        let plan = match &mut self.plan {
            Some(plan) if plan.input == input => plan,
            slot => slot.insert(ScalePlan::new(input, &self.config)),
        };

        let mut offset = 0;
        let mut scaled = Vec::with_capacity(frame.format.frame_size(plan.output.0, plan.output.1));
        for plane in &plan.planes {
            let len = plane.src.0 * plane.src.1 * plane.components;
            scale_plane(&frame.data[offset..offset + len], plane, &mut scaled);
            offset += len;
        }

        let data = if frame.format == self.config.format {
            scaled
        } else {
            convert_packed(&scaled, frame.format, self.config.format)?
        };

        Ok(VideoFrame::new(
            data,
            plan.output.0,
            plan.output.1,
            self.config.format,
            frame.pts,
            frame.time_base,
        ))
    }
}

impl ScalePlan {
    fn new(input: (u32, u32, PixelFormat), config: &VideoTransformConfig) -> Self {
        let (width, height, format) = input;
        let output = config.output_size(width, height);
        let planes = plane_shapes(format, width, height)
            .into_iter()
            .zip(plane_shapes(format, output.0, output.1))
            .map(|((sw, sh, components), (dw, dh, _))| PlanePlan {
                src: (sw, sh),
                components,
                xs: axis_samples(sw, dw, config.algorithm),
                ys: axis_samples(sh, dh, config.algorithm),
            })
            .collect();
        Self {
            input,
            output,
            planes,
        }
    }
}

// (width, height, components) of each plane, in storage order
fn plane_shapes(format: PixelFormat, width: u32, height: u32) -> Vec<(usize, usize, usize)> {
    let (w, h) = (width as usize, height as usize);
    let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
    match format {
        PixelFormat::Yuv420p => vec![(w, h, 1), (cw, ch, 1), (cw, ch, 1)],
        PixelFormat::Nv12 => vec![(w, h, 1), (cw, ch, 2)],
        packed => vec![(w, h, packed.bits_per_pixel() as usize / 8)],
    }
}

fn axis_samples(src: usize, dst: usize, algorithm: ScalingAlgorithm) -> Vec<AxisSample> {
    let ratio = src as f32 / dst as f32;
    let max = (src - 1) as f32;
    (0..dst)
        .map(|i| {
            let pos = ((i as f32 + 0.5) * ratio - 0.5).clamp(0.0, max);
            match algorithm {
                ScalingAlgorithm::Nearest => {
                    let idx = pos.round() as usize;
                    AxisSample {
                        lo: idx,
                        hi: idx,
                        frac: 0.0,
                    }
                }
                ScalingAlgorithm::Bilinear => {
                    let lo = pos.floor() as usize;
                    AxisSample {
                        lo,
                        hi: (lo + 1).min(src - 1),
                        frac: pos - lo as f32,
                    }
                }
            }
        })
        .collect()
}

fn scale_plane(src: &[u8], plane: &PlanePlan, out: &mut Vec<u8>) {
    let stride = plane.src.0 * plane.components;
    let c = plane.components;
    for y in &plane.ys {
        let top = &src[y.lo * stride..(y.lo + 1) * stride];
        let bottom = &src[y.hi * stride..(y.hi + 1) * stride];
        for x in &plane.xs {
            for k in 0..c {
                let p00 = top[x.lo * c + k] as f32;
                let p01 = top[x.hi * c + k] as f32;
                let p10 = bottom[x.lo * c + k] as f32;
                let p11 = bottom[x.hi * c + k] as f32;
                let upper = p00 + (p01 - p00) * x.frac;
                let lower = p10 + (p11 - p10) * x.frac;
                out.push((upper + (lower - upper) * y.frac).round() as u8);
            }
        }
    }
}

fn convert_packed(data: &[u8], from: PixelFormat, to: PixelFormat) -> Result<Vec<u8>> {
    let (Some((src_rgb, src_alpha)), Some((dst_rgb, dst_alpha))) =
        (from.rgb_layout(), to.rgb_layout())
    else {
        return Err(Error::unsupported_format(format!("{from:?} -> {to:?}")));
    };
    let src_bpp = from.bits_per_pixel() as usize / 8;
    let dst_bpp = to.bits_per_pixel() as usize / 8;

    let mut out = vec![0u8; data.len() / src_bpp * dst_bpp];
    for (src, dst) in data
        .chunks_exact(src_bpp)
        .zip(out.chunks_exact_mut(dst_bpp))
    {
        for (s, d) in src_rgb.iter().zip(dst_rgb.iter()) {
            dst[*d] = src[*s];
        }
        if let Some(d) = dst_alpha {
            dst[d] = src_alpha.map_or(255, |s| src[s]);
        }
    }
    Ok(out)
}
