//! Subprocess bridge to the synthesis model
//!
//! The model runs in an external inference script. Each call spawns
//! `<program> <script>`, writes one JSON request to its stdin and reads one
//! JSON response from its stdout:
//!
//! ```text
//! -> {"command":"infer","model_path":"G.pth","config_path":"config.json",
//!     "sequence":[0,3,0],"length":3,
//!     "noise_scale":0.667,"noise_scale_w":0.8,"length_scale":1.0}
//! <- {"audio_base64":"UklGR...","sample_rate":22050}
//! ```
//!
//! A `{"command":"check"}` request must answer `{"status":"ok"}`.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::{ControlParams, Synthesizer};
use crate::audio::{decode_wav, Waveform};
use crate::error::{Error, Result};
use crate::text::SymbolId;

/// Request written to the inference script
#[derive(Debug, Serialize)]
pub struct BridgeRequest<'a> {
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<&'a [SymbolId]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(flatten)]
    pub params: Option<ControlParams>,
}

/// Response read from the inference script
#[derive(Debug, Deserialize)]
pub struct BridgeResponse {
    pub audio_base64: Option<String>,
    pub sample_rate: Option<u32>,
    pub error: Option<String>,
    pub status: Option<String>,
}

/// Synthesizer backed by an external inference script
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    script_path: PathBuf,
    model_path: PathBuf,
    config_path: Option<PathBuf>,
    sample_rate: Option<u32>,
}

impl CommandSynthesizer {
    pub fn new(
        program: impl Into<String>,
        script_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            script_path: script_path.into(),
            model_path: model_path.into(),
            config_path: None,
            sample_rate: None,
        }
    }

    /// Hyper-parameter file forwarded to the script
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Output sample rate. When set it overrides whatever the script
    /// reports, matching the rate the model was trained at.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Verify the script starts and reports ready
    pub fn check(&self) -> Result<()> {
        let request = BridgeRequest {
            command: "check",
            model_path: None,
            config_path: None,
            sequence: None,
            length: None,
            params: None,
        };
        let response = self.call(&serde_json::to_string(&request)?)?;

        if let Some(err) = response.error {
            warn!("Inference backend not available: {}", err);
            return Err(Error::InferenceError(format!(
                "Backend check failed: {}",
                err
            )));
        }
        match response.status.as_deref() {
            Some("ok") => {
                info!("Inference backend ready ({} {:?})", self.program, self.script_path);
                Ok(())
            }
            other => Err(Error::InferenceError(format!(
                "Backend check returned unexpected status {:?}",
                other
            ))),
        }
    }

    fn call(&self, request_json: &str) -> Result<BridgeResponse> {
        let mut child = Command::new(&self.program)
            .arg(&self.script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::InferenceError(format!("Failed to start {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request_json.as_bytes()).map_err(|e| {
                Error::InferenceError(format!("Failed to write request: {}", e))
            })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::InferenceError(format!("Inference process failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InferenceError(format!(
                "Inference script exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_response(&stdout)
    }
}

impl Synthesizer for CommandSynthesizer {
    fn synthesize(
        &mut self,
        sequence: &[SymbolId],
        length: usize,
        params: &ControlParams,
    ) -> Result<Waveform> {
        let request = BridgeRequest {
            command: "infer",
            model_path: Some(self.model_path.to_string_lossy().to_string()),
            config_path: self
                .config_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            sequence: Some(sequence),
            length: Some(length),
            params: Some(*params),
        };
        let response = self.call(&serde_json::to_string(&request)?)?;

        if let Some(err) = response.error {
            return Err(Error::InferenceError(format!("Model error: {}", err)));
        }

        let audio_b64 = response
            .audio_base64
            .ok_or_else(|| Error::InferenceError("No audio in response".to_string()))?;
        let wav_bytes = base64::engine::general_purpose::STANDARD
            .decode(audio_b64.trim())
            .map_err(|e| Error::InferenceError(format!("Failed to decode audio: {}", e)))?;

        let mut waveform = decode_wav(&wav_bytes)?;
        let reported = response.sample_rate.unwrap_or(waveform.sample_rate);
        waveform.sample_rate = resolve_sample_rate(self.sample_rate, reported);

        debug!(
            "Synthesized {} samples at {} Hz from {} symbols",
            waveform.len(),
            waveform.sample_rate,
            length
        );
        Ok(waveform)
    }
}

/// Configured rate wins over the one the script reports
fn resolve_sample_rate(configured: Option<u32>, reported: u32) -> u32 {
    match configured {
        Some(rate) if rate != reported => {
            warn!(
                "Inference script reported {} Hz; writing at configured {} Hz",
                reported, rate
            );
            rate
        }
        Some(rate) => rate,
        None => reported,
    }
}

/// Take the first JSON object line; libraries in the script may print
/// banners to stdout before it.
fn parse_response(stdout: &str) -> Result<BridgeResponse> {
    let json_str = stdout
        .lines()
        .find(|line| line.trim_start().starts_with('{'))
        .unwrap_or(stdout);

    serde_json::from_str(json_str).map_err(|e| {
        Error::InferenceError(format!(
            "Failed to parse inference response: {} - {}",
            e, json_str
        ))
    })
}
