//! Writes one WAV file per synthesized utterance

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{AudioEncoder, Waveform};
use crate::error::Result;
use crate::synthesis::OutputWriter;

/// Writes `{out_dir}/{utt_name}{identifier}.wav`
#[derive(Debug, Clone)]
pub struct WavFileWriter {
    out_dir: PathBuf,
    utt_name: String,
    encoder: AudioEncoder,
}

impl WavFileWriter {
    pub fn new(out_dir: impl Into<PathBuf>, utt_name: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            utt_name: utt_name.into(),
            encoder: AudioEncoder::default(),
        }
    }

    pub fn with_encoder(mut self, encoder: AudioEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of the file written for `identifier`
    pub fn output_path(&self, identifier: &str) -> PathBuf {
        self.out_dir
            .join(format!("{}{}.wav", self.utt_name, identifier))
    }
}

impl OutputWriter for WavFileWriter {
    fn write(&mut self, identifier: &str, waveform: &Waveform) -> Result<()> {
        if !self.out_dir.exists() {
            info!("Creating output directory {:?}", self.out_dir);
            fs::create_dir_all(&self.out_dir)?;
        }

        let path = self.output_path(identifier);
        let bytes = self.encoder.encode(waveform)?;
        fs::write(&path, bytes)?;

        debug!(
            "Wrote {:?} ({:.2}s at {} Hz)",
            path,
            waveform.duration_secs(),
            waveform.sample_rate
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{decode_wav, WavEncoding};

    #[test]
    fn test_output_path() {
        let writer = WavFileWriter::new("/tmp/out", "utt");
        assert_eq!(writer.output_path("007"), PathBuf::from("/tmp/out/utt007.wav"));
        assert_eq!(writer.out_dir(), Path::new("/tmp/out"));
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("wavs");
        let mut writer = WavFileWriter::new(&out_dir, "sample")
            .with_encoder(AudioEncoder::new(WavEncoding::Pcm16));

        let waveform = Waveform::new(vec![0.0, 0.25, -0.25], 22050);
        writer.write("1", &waveform).unwrap();

        let bytes = fs::read(out_dir.join("sample1.wav")).unwrap();
        let decoded = decode_wav(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.len(), 3);
    }
}
