//! Audio output: waveform type, WAV encoding and file writing

mod encoder;
mod writer;

pub use encoder::{decode_wav, AudioEncoder, WavEncoding};
pub use writer::WavFileWriter;

/// Mono waveform produced by the synthesis model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waveform {
    /// Samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
