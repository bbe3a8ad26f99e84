//! VITS2 Core - text frontend and batch synthesis driver
//!
//! This crate turns utterance text into the symbol-id sequences a VITS2
//! model consumes, and drives batch synthesis over a file of utterances.
//!
//! # Architecture
//!
//! - Cleaner registry: named text normalizers, resolved into chains up front
//! - Symbol table: immutable symbol <-> id bijection built from configuration
//! - Sequence codec: encode/decode with explicit drop policies, blank interspersing
//! - Batch driver: sequential encode -> synthesize -> write, one output per line
//!
//! The model itself is behind the [`Synthesizer`] trait; [`CommandSynthesizer`]
//! runs it as an external inference script.
//!
//! # Example
//!
//! ```ignore
//! use vits2_core::{BatchSynthesis, HParams, SymbolTable, WavFileWriter};
//!
//! let hps = HParams::from_file("config.json")?;
//! let table = SymbolTable::from_config(&hps.data.symbols())?;
//! let utterances = vits2_core::read_utterances("lines.txt")?;
//!
//! let mut writer = WavFileWriter::new("out", "utt");
//! BatchSynthesis::new(&table)
//!     .with_blank(hps.data.add_blank)
//!     .run(&utterances, &mut my_model, &mut writer)?;
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod synthesis;
pub mod text;

pub use audio::{AudioEncoder, WavEncoding, WavFileWriter, Waveform};
pub use config::{DataConfig, HParams, InferenceConfig, SymbolConfig, SymbolList};
pub use error::{Error, Result};
pub use synthesis::{
    format_index, index_width, parse_utterances, read_utterances, BatchSynthesis,
    CommandSynthesizer, ControlParams, OutputWriter, Synthesizer, TextMode,
};
pub use text::{
    decode, encode_cleaned, encode_raw, intersperse, text_to_sequence, BuiltinCleaner,
    CleanerChain, CleanerRegistry, DropPolicy, SymbolId, SymbolTable,
};
