//! Configuration types for the VITS2 frontend
//!
//! Hyper-parameters are read from the same `config.json` the model was
//! trained with. Only the `data` and `inference` sections are interpreted;
//! everything else (`train`, `model`, ...) belongs to the model and is
//! ignored here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::synthesis::ControlParams;

/// Environment prefix for overrides, e.g. `VITS2__DATA__ADD_BLANK=true`
pub const ENV_PREFIX: &str = "VITS2";

/// Top-level hyper-parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HParams {
    pub data: DataConfig,

    #[serde(default)]
    pub inference: InferenceConfig,
}

impl HParams {
    /// Load from a JSON or TOML file (format chosen by extension), applying
    /// `VITS2__*` environment overrides on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let hparams: HParams = settings.try_deserialize()?;
        debug!(
            "Loaded hyper-parameters from {:?} ({} symbols)",
            path,
            hparams.data.symbols().ordered().len()
        );
        Ok(hparams)
    }
}

/// Symbol set definition. The table is `[pad] + punctuation + characters`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolConfig {
    pub pad: String,
    pub punctuation: SymbolList,
    pub characters: SymbolList,
}

impl SymbolConfig {
    pub fn new(pad: impl Into<String>, punctuation: SymbolList, characters: SymbolList) -> Self {
        Self {
            pad: pad.into(),
            punctuation,
            characters,
        }
    }

    /// Symbols in id order
    pub fn ordered(&self) -> Vec<String> {
        std::iter::once(self.pad.clone())
            .chain(self.punctuation.to_symbols())
            .chain(self.characters.to_symbols())
            .collect()
    }
}

/// A symbol group written either as one string (one symbol per character)
/// or as an explicit list of tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SymbolList {
    Chars(String),
    Tokens(Vec<String>),
}

impl SymbolList {
    pub fn to_symbols(&self) -> Vec<String> {
        match self {
            SymbolList::Chars(s) => s.chars().map(String::from).collect(),
            SymbolList::Tokens(tokens) => tokens.clone(),
        }
    }
}

impl From<&str> for SymbolList {
    fn from(s: &str) -> Self {
        SymbolList::Chars(s.to_string())
    }
}

impl From<Vec<&str>> for SymbolList {
    fn from(tokens: Vec<&str>) -> Self {
        SymbolList::Tokens(tokens.into_iter().map(String::from).collect())
    }
}

/// The `data` section of the hyper-parameter file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub pad: String,
    pub punctuation: SymbolList,
    pub characters: SymbolList,

    /// Intersperse the pad id around every symbol before synthesis
    #[serde(default)]
    pub add_blank: bool,

    /// Output sample rate in Hz
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,

    /// Cleaners applied when the input is raw text
    #[serde(default)]
    pub text_cleaners: Vec<String>,

    /// Whether input files are already cleaned (phonemized)
    #[serde(default = "default_cleaned_text")]
    pub cleaned_text: bool,
}

impl DataConfig {
    pub fn symbols(&self) -> SymbolConfig {
        SymbolConfig::new(
            self.pad.clone(),
            self.punctuation.clone(),
            self.characters.clone(),
        )
    }
}

fn default_sampling_rate() -> u32 {
    22050
}

fn default_cleaned_text() -> bool {
    true
}

/// Control knobs handed to the model untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,

    #[serde(default = "default_noise_scale_w")]
    pub noise_scale_w: f32,

    #[serde(default = "default_length_scale")]
    pub length_scale: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            noise_scale: default_noise_scale(),
            noise_scale_w: default_noise_scale_w(),
            length_scale: default_length_scale(),
        }
    }
}

impl InferenceConfig {
    pub fn control_params(&self) -> ControlParams {
        ControlParams {
            noise_scale: self.noise_scale,
            noise_scale_w: self.noise_scale_w,
            length_scale: self.length_scale,
        }
    }
}

fn default_noise_scale() -> f32 {
    0.667
}

fn default_noise_scale_w() -> f32 {
    0.8
}

fn default_length_scale() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_symbol_order() {
        let symbols = SymbolConfig::new("_", vec![",", "."].into(), "abc".into());
        assert_eq!(symbols.ordered(), vec!["_", ",", ".", "a", "b", "c"]);
    }

    #[test]
    fn test_load_vits_json() {
        let file = write_config(
            r#"{
                "train": {"segment_size": 8192},
                "data": {
                    "text_cleaners": ["english_cleaners"],
                    "sampling_rate": 24000,
                    "add_blank": true,
                    "pad": "_",
                    "punctuation": ";:,.!? ",
                    "characters": "abc"
                },
                "model": {"hidden_channels": 192}
            }"#,
            ".json",
        );

        let hps = HParams::from_file(file.path()).unwrap();
        assert!(hps.data.add_blank);
        assert_eq!(hps.data.sampling_rate, 24000);
        assert_eq!(hps.data.text_cleaners, vec!["english_cleaners"]);
        assert!(hps.data.cleaned_text);
        assert_eq!(hps.data.symbols().ordered().len(), 1 + 7 + 3);
        assert_eq!(hps.data.symbols().ordered()[7], " ");
        assert!((hps.inference.noise_scale - 0.667).abs() < 1e-6);
    }

    #[test]
    fn test_load_token_lists_from_toml() {
        let file = write_config(
            r#"
            [data]
            pad = "<pad>"
            punctuation = [",", "."]
            characters = ["a", "ə"]

            [inference]
            length_scale = 1.2
            "#,
            ".toml",
        );

        let hps = HParams::from_file(file.path()).unwrap();
        assert_eq!(hps.data.symbols().ordered(), vec!["<pad>", ",", ".", "a", "ə"]);
        assert!(!hps.data.add_blank);
        assert!((hps.inference.length_scale - 1.2).abs() < 1e-6);
        assert!((hps.inference.noise_scale_w - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_missing_pad_is_config_error() {
        let file = write_config(
            r#"{"data": {"punctuation": ".", "characters": "ab"}}"#,
            ".json",
        );

        let err = HParams::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigError(_)), "got {err:?}");
    }
}
