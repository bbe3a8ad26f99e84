//! WAV encoding and decoding of synthesized waveforms

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use super::Waveform;
use crate::error::{Error, Result};

/// Sample encoding inside the WAV container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavEncoding {
    /// 32-bit IEEE float, samples written as produced by the model
    #[default]
    Float32,
    /// 16-bit signed PCM, samples clamped to [-1.0, 1.0]
    Pcm16,
}

/// Mono WAV encoder
#[derive(Debug, Clone, Default)]
pub struct AudioEncoder {
    encoding: WavEncoding,
}

impl AudioEncoder {
    pub fn new(encoding: WavEncoding) -> Self {
        Self { encoding }
    }

    /// Encode a waveform to WAV bytes
    pub fn encode(&self, waveform: &Waveform) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate,
            bits_per_sample: match self.encoding {
                WavEncoding::Float32 => 32,
                WavEncoding::Pcm16 => 16,
            },
            sample_format: match self.encoding {
                WavEncoding::Float32 => SampleFormat::Float,
                WavEncoding::Pcm16 => SampleFormat::Int,
            },
        };

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buffer, spec)?;

            for &sample in &waveform.samples {
                match self.encoding {
                    WavEncoding::Float32 => writer.write_sample(sample)?,
                    WavEncoding::Pcm16 => {
                        // Convert f32 [-1.0, 1.0] to i16
                        let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                        writer.write_sample(sample_i16)?;
                    }
                }
            }

            writer.finalize()?;
        }

        debug!(
            "Encoded {} samples to WAV ({} bytes)",
            waveform.samples.len(),
            buffer.get_ref().len()
        );
        Ok(buffer.into_inner())
    }
}

/// Parse WAV bytes into a mono waveform. Multi-channel input keeps only the
/// first channel.
pub fn decode_wav(wav_bytes: &[u8]) -> Result<Waveform> {
    let mut reader = WavReader::new(Cursor::new(wav_bytes))
        .map_err(|e| Error::AudioError(format!("Failed to parse WAV: {}", e)))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<_, _>>()?
        }
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
    };

    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok(Waveform::new(samples, spec.sample_rate))
}
