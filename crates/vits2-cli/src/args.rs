//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Synthesize one WAV file per line of a text file with a VITS2 model
#[derive(Parser, Debug)]
#[command(name = "vits2", version, about, long_about = None)]
pub struct Args {
    /// Input text file, one utterance per line
    pub text_file: PathBuf,

    /// Model checkpoint, passed to the inference script
    pub model_path: PathBuf,

    /// Hyper-parameter file (config.json or .toml)
    #[arg(short = 'c', long)]
    pub config_path: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, default_value = "./")]
    pub out_dir: PathBuf,

    /// Base name of output files; the line index is appended
    #[arg(short = 'u', long, default_value = "utt")]
    pub utt_name: String,

    /// Treat input lines as raw text and run them through the cleaners
    #[arg(long)]
    pub raw: bool,

    /// Cleaners for raw text (defaults to data.text_cleaners); implies --raw
    #[arg(long, value_delimiter = ',')]
    pub cleaners: Option<Vec<String>>,

    /// Override data.add_blank
    #[arg(long)]
    pub add_blank: Option<bool>,

    /// Override inference.noise_scale
    #[arg(long)]
    pub noise_scale: Option<f32>,

    /// Override inference.noise_scale_w
    #[arg(long)]
    pub noise_scale_w: Option<f32>,

    /// Override inference.length_scale
    #[arg(long)]
    pub length_scale: Option<f32>,

    /// Write 16-bit PCM instead of 32-bit float WAV
    #[arg(long)]
    pub pcm16: bool,

    /// Interpreter used to run the inference script
    #[arg(long, default_value = "python3")]
    pub python: String,

    /// Inference script speaking the JSON bridge protocol
    #[arg(long)]
    pub script: PathBuf,

    /// Skip the backend readiness check
    #[arg(long)]
    pub skip_check: bool,
}

impl Args {
    /// Whether input lines are raw text to be cleaned
    pub fn raw_mode(&self, cleaned_text: bool) -> bool {
        self.raw || self.cleaners.is_some() || !cleaned_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from([
            "vits2",
            "lines.txt",
            "G.pth",
            "-c",
            "config.json",
            "--script",
            "infer.py",
        ]);
        assert_eq!(args.out_dir, PathBuf::from("./"));
        assert_eq!(args.utt_name, "utt");
        assert!(!args.raw);
        assert!(args.cleaners.is_none());
        assert!(args.add_blank.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "vits2",
            "lines.txt",
            "G.pth",
            "--config-path",
            "config.json",
            "--script",
            "infer.py",
            "-o",
            "out",
            "-u",
            "sample",
            "--raw",
            "--cleaners",
            "transliteration_cleaners,basic_cleaners",
            "--add-blank",
            "false",
            "--length-scale",
            "1.5",
        ]);
        assert!(args.raw);
        assert_eq!(
            args.cleaners.unwrap(),
            vec!["transliteration_cleaners", "basic_cleaners"]
        );
        assert_eq!(args.add_blank, Some(false));
        assert_eq!(args.length_scale, Some(1.5));
        assert_eq!(args.utt_name, "sample");
    }

    #[test]
    fn test_config_path_required() {
        assert!(Args::try_parse_from(["vits2", "lines.txt", "G.pth", "--script", "infer.py"]).is_err());
    }

    #[test]
    fn test_script_required() {
        assert!(Args::try_parse_from(["vits2", "lines.txt", "G.pth", "-c", "config.json"]).is_err());
    }

    #[test]
    fn test_raw_mode() {
        let base = ["vits2", "lines.txt", "G.pth", "-c", "config.json", "--script", "infer.py"];

        let args = Args::parse_from(base);
        assert!(!args.raw_mode(true));
        assert!(args.raw_mode(false));

        let args = Args::parse_from(base.iter().copied().chain(["--raw"]));
        assert!(args.raw_mode(true));

        let args = Args::parse_from(base.iter().copied().chain(["--cleaners", "basic_cleaners"]));
        assert!(args.raw_mode(true));
    }
}
