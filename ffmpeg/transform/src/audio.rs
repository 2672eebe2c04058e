/*!
    Audio resampling, channel layout and sample format conversion.
*/

use ffmpeg_types::{AudioFrame, ChannelLayout, Error, Rational, Result, SampleFormat};

/**
    Target format for [`AudioTransform`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioTransformConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel layout.
    pub channels: ChannelLayout,
    /// Output sample format.
    pub format: SampleFormat,
}

impl AudioTransformConfig {
    /**
        Create a config for the given output format.
    */
    pub fn new(sample_rate: u32, channels: ChannelLayout, format: SampleFormat) -> Self {
        Self {
            sample_rate,
            channels,
            format,
        }
    }

    /**
        48kHz stereo F32, the usual playback format.
    */
    pub fn playback() -> Self {
        Self::new(48000, ChannelLayout::Stereo, SampleFormat::F32)
    }

    /**
        Time base of the frames this transform produces (one unit per sample).
    */
    pub fn time_base(&self) -> Rational {
        Rational::new(1, self.sample_rate as i32)
    }
}

/**
    Converts audio frames to a fixed output format.

    Resampling uses linear interpolation and carries the last input sample
    of each frame over to the next, so frames must be passed in order.
    The resampler state is created from the first frame and recreated if
    the input rate or channel layout changes; call [`AudioTransform::reset`]
    after a seek.
*/
pub struct AudioTransform {
    config: AudioTransformConfig,
    state: Option<ResampleState>,
}

struct ResampleState {
    input_rate: u32,
    input_channels: ChannelLayout,
    // input samples advanced per output sample
    step: f64,
    // position of the next output sample, in input samples; the previous
    // frame's last sample sits at index -1
    position: f64,
    last: Vec<f32>,
    primed: bool,
}

impl ResampleState {
    fn new(input_rate: u32, input_channels: ChannelLayout, config: &AudioTransformConfig) -> Self {
        Self {
            input_rate,
            input_channels,
            step: input_rate as f64 / config.sample_rate as f64,
            position: 0.0,
            last: vec![0.0; config.channels.channels() as usize],
            primed: false,
        }
    }

    fn matches(&self, frame: &AudioFrame) -> bool {
        self.input_rate == frame.sample_rate && self.input_channels == frame.channels
    }

    fn process(&mut self, input: &[f32], channels: usize) -> Vec<f32> {
        let frames = input.len() / channels;
        if frames == 0 {
            return Vec::new();
        }
        if !self.primed {
            self.last.copy_from_slice(&input[..channels]);
            self.primed = true;
        }

        let mut output = Vec::with_capacity(((frames as f64 / self.step) as usize + 1) * channels);
        while self.position < frames as f64 {
            let idx = self.position as usize;
            let fract = (self.position - idx as f64) as f32;
            for c in 0..channels {
                let s1 = if idx == 0 {
                    self.last[c]
                } else {
                    input[(idx - 1) * channels + c]
                };
                let s2 = input[idx * channels + c];
                output.push(s1 + (s2 - s1) * fract);
            }
            self.position += self.step;
        }
        self.position -= frames as f64;
        self.last
            .copy_from_slice(&input[(frames - 1) * channels..frames * channels]);

        output
    }
}

impl AudioTransform {
    /**
        Create a new transform. No state is allocated until the first frame.
    */
    pub fn new(config: AudioTransformConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &AudioTransformConfig {
        &self.config
    }

    /**
        Convert one frame to the output format.

        The returned frame's PTS is expressed in the output time base
        (`1/sample_rate`).
    */
    pub fn transform(&mut self, frame: &AudioFrame) -> Result<AudioFrame> {
        if frame.sample_rate == 0 {
            return Err(Error::invalid_data("audio frame has a zero sample rate"));
        }
        if frame.data.len() < frame.expected_data_len() {
            return Err(Error::invalid_data(format!(
                "audio frame holds {} bytes, expected {}",
                frame.data.len(),
                frame.expected_data_len()
            )));
        }

        if !self.state.as_ref().is_some_and(|state| state.matches(frame)) {
            if self.state.is_some() {
                tracing::debug!(
                    sample_rate = frame.sample_rate,
                    channels = frame.channels.channels(),
                    "audio input format changed, reinitializing resampler"
                );
            }
            self.state = Some(ResampleState::new(
                frame.sample_rate,
                frame.channels,
                &self.config,
            ));
        }

        let decoded = decode_samples(&frame.data[..frame.expected_data_len()], frame.format)?;
        let remixed = remix(decoded, frame.channels, self.config.channels);
        let channels = self.config.channels.channels() as usize;

        let samples = if frame.sample_rate == self.config.sample_rate {
            remixed
        } else {
            match self.state.as_mut() {
                Some(state) => state.process(&remixed, channels),
                None => remixed,
            }
        };

        let time_base = self.config.time_base();
        Ok(AudioFrame::new(
            encode_samples(&samples, self.config.format)?,
            samples.len() / channels,
            self.config.sample_rate,
            self.config.channels,
            self.config.format,
            frame.pts.map(|pts| pts.rescale(frame.time_base, time_base)),
            time_base,
        ))
    }

    /**
        Drop the resampler history, e.g. after seeking.
    */
    pub fn reset(&mut self) {
        self.state = None;
    }
}

fn decode_samples(data: &[u8], format: SampleFormat) -> Result<Vec<f32>> {
    let samples = match format {
        SampleFormat::U8 => data.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect(),
        SampleFormat::S16 => data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect(),
        SampleFormat::S32 => data
            .chunks_exact(4)
            .map(|b| (i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64 / 2_147_483_648.0) as f32)
            .collect(),
        SampleFormat::F32 => data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        SampleFormat::F64 => data
            .chunks_exact(8)
            .map(|b| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(b);
                f64::from_le_bytes(bytes) as f32
            })
            .collect(),
        other => {
            return Err(Error::unsupported_format(format!(
                "cannot decode {other:?} samples"
            )));
        }
    };
    Ok(samples)
}

fn encode_samples(samples: &[f32], format: SampleFormat) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(samples.len() * format.bytes_per_sample());
    for &s in samples {
        let s = s.clamp(-1.0, 1.0);
        match format {
            SampleFormat::U8 => out.push((s * 127.0 + 128.0).round() as u8),
            SampleFormat::S16 => out.extend_from_slice(&((s * 32767.0).round() as i16).to_le_bytes()),
            SampleFormat::S32 => out.extend_from_slice(
                &((s as f64 * 2_147_483_647.0).round() as i32).to_le_bytes(),
            ),
            SampleFormat::F32 => out.extend_from_slice(&s.to_le_bytes()),
            SampleFormat::F64 => out.extend_from_slice(&(s as f64).to_le_bytes()),
            other => {
                return Err(Error::unsupported_format(format!(
                    "cannot encode {other:?} samples"
                )));
            }
        }
    }
    Ok(out)
}

fn remix(samples: Vec<f32>, from: ChannelLayout, to: ChannelLayout) -> Vec<f32> {
    match (from, to) {
        (ChannelLayout::Mono, ChannelLayout::Stereo) => {
            samples.iter().flat_map(|&s| [s, s]).collect()
        }
        (ChannelLayout::Stereo, ChannelLayout::Mono) => samples
            .chunks_exact(2)
            .map(|lr| (lr[0] + lr[1]) * 0.5)
            .collect(),
        _ => samples,
    }
}
