//! Batch synthesis driver
//!
//! Utterances are processed strictly in order: each one is encoded,
//! synthesized and written before the next begins. The first synthesis or
//! write failure aborts the batch; nothing is retried.

mod bridge;

pub use bridge::{BridgeRequest, BridgeResponse, CommandSynthesizer};

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::audio::Waveform;
use crate::error::{Error, Result};
use crate::text::{encode_cleaned, encode_raw, intersperse, CleanerChain, SymbolId, SymbolTable};

/// Tuning knobs passed to the model unchanged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    pub noise_scale: f32,
    pub noise_scale_w: f32,
    pub length_scale: f32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            length_scale: 1.0,
        }
    }
}

/// The synthesis model: symbol ids in, waveform out. A call either returns
/// a complete waveform or fails.
pub trait Synthesizer {
    fn synthesize(
        &mut self,
        sequence: &[SymbolId],
        length: usize,
        params: &ControlParams,
    ) -> Result<Waveform>;
}

impl<F> Synthesizer for F
where
    F: FnMut(&[SymbolId], usize, &ControlParams) -> Result<Waveform>,
{
    fn synthesize(
        &mut self,
        sequence: &[SymbolId],
        length: usize,
        params: &ControlParams,
    ) -> Result<Waveform> {
        self(sequence, length, params)
    }
}

/// Destination for synthesized audio, keyed by the formatted batch index
pub trait OutputWriter {
    fn write(&mut self, identifier: &str, waveform: &Waveform) -> Result<()>;
}

impl<F> OutputWriter for F
where
    F: FnMut(&str, &Waveform) -> Result<()>,
{
    fn write(&mut self, identifier: &str, waveform: &Waveform) -> Result<()> {
        self(identifier, waveform)
    }
}

/// How utterance text becomes a sequence
#[derive(Debug, Clone, Copy)]
pub enum TextMode<'a> {
    /// Input is already cleaned; unknown symbols are reported
    Cleaned,
    /// Input is raw text run through the chain; unknown symbols are dropped silently
    Raw(&'a CleanerChain),
}

/// Drives synthesis over a batch of utterances
#[derive(Debug, Clone)]
pub struct BatchSynthesis<'a> {
    table: &'a SymbolTable,
    mode: TextMode<'a>,
    add_blank: bool,
    params: ControlParams,
}

impl<'a> BatchSynthesis<'a> {
    /// Cleaned-text mode, no blanks, default control parameters
    pub fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            mode: TextMode::Cleaned,
            add_blank: false,
            params: ControlParams::default(),
        }
    }

    /// Treat utterances as raw text and clean them with `chain`
    pub fn with_cleaners(mut self, chain: &'a CleanerChain) -> Self {
        self.mode = TextMode::Raw(chain);
        self
    }

    /// Intersperse the pad id around every symbol
    pub fn with_blank(mut self, add_blank: bool) -> Self {
        self.add_blank = add_blank;
        self
    }

    pub fn with_params(mut self, params: ControlParams) -> Self {
        self.params = params;
        self
    }

    /// Sequence handed to the model for one utterance
    pub fn encode(&self, utterance: &str) -> Result<Vec<SymbolId>> {
        let sequence = match self.mode {
            TextMode::Cleaned => encode_cleaned(utterance, self.table),
            TextMode::Raw(chain) => encode_raw(utterance, chain, self.table),
        };

        if !self.add_blank {
            return Ok(sequence);
        }
        let pad = self.table.pad_id().ok_or_else(|| {
            Error::ConfigError("add_blank requires a pad symbol".to_string())
        })?;
        intersperse(&sequence, pad)
    }

    /// Synthesize and write every utterance in order. Returns the number of
    /// outputs written.
    pub fn run<S, W>(&self, utterances: &[String], synth: &mut S, writer: &mut W) -> Result<usize>
    where
        S: Synthesizer + ?Sized,
        W: OutputWriter + ?Sized,
    {
        let width = index_width(utterances.len());
        info!(
            "Synthesizing {} utterances (add_blank={})",
            utterances.len(),
            self.add_blank
        );

        for (i, utterance) in utterances.iter().enumerate() {
            let identifier = format_index(i + 1, width);
            let sequence = self.encode(utterance)?;
            debug!("Utterance {}: {} symbols", identifier, sequence.len());

            let waveform = synth
                .synthesize(&sequence, sequence.len(), &self.params)
                .map_err(|e| Error::SynthesisFailed {
                    index: identifier.clone(),
                    reason: e.to_string(),
                })?;

            writer
                .write(&identifier, &waveform)
                .map_err(|e| Error::WriteFailed {
                    name: identifier.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(utterances.len())
    }
}

/// Number of decimal digits in `count`, at least 1
pub fn index_width(count: usize) -> usize {
    count.to_string().len()
}

/// 1-based index zero-padded to `width` digits
pub fn format_index(index: usize, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// One utterance per line with trailing whitespace removed. Blank lines are
/// kept as empty utterances.
pub fn parse_utterances(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_string()).collect()
}

pub fn read_utterances(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let utterances = parse_utterances(&text);
    debug!("Read {} utterances from {:?}", utterances.len(), path);
    Ok(utterances)
}
