//! VITS2 CLI - batch text-to-speech over a file of utterances

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;

use args::Args;
use vits2_core::{
    read_utterances, AudioEncoder, BatchSynthesis, CleanerChain, CleanerRegistry,
    CommandSynthesizer, HParams, OutputWriter, SymbolTable, WavEncoding, WavFileWriter, Waveform,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vits2=info,vits2_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    // Everything that can fail on configuration happens before the first
    // synthesis call.
    let hps = HParams::from_file(&args.config_path)
        .with_context(|| format!("Failed to load config {:?}", args.config_path))?;
    let table = SymbolTable::from_config(&hps.data.symbols())
        .context("Invalid symbol configuration")?;
    info!("Symbol table: {} symbols", table.len());

    let chain = if args.raw_mode(hps.data.cleaned_text) {
        Some(build_chain(&args, &hps)?)
    } else {
        None
    };

    let utterances = read_utterances(&args.text_file)
        .with_context(|| format!("Failed to read {:?}", args.text_file))?;

    let mut params = hps.inference.control_params();
    if let Some(v) = args.noise_scale {
        params.noise_scale = v;
    }
    if let Some(v) = args.noise_scale_w {
        params.noise_scale_w = v;
    }
    if let Some(v) = args.length_scale {
        params.length_scale = v;
    }
    let add_blank = args.add_blank.unwrap_or(hps.data.add_blank);

    let mut synth = CommandSynthesizer::new(&args.python, &args.script, &args.model_path)
        .with_config_path(&args.config_path)
        .with_sample_rate(hps.data.sampling_rate);
    info!("Model: {:?}", synth.model_path());
    if args.skip_check {
        warn!("Skipping inference backend check");
    } else {
        synth.check().context("Inference backend is not ready")?;
    }

    let encoding = if args.pcm16 {
        WavEncoding::Pcm16
    } else {
        WavEncoding::Float32
    };
    let mut wav_writer =
        WavFileWriter::new(&args.out_dir, &args.utt_name).with_encoder(AudioEncoder::new(encoding));

    let progress = ProgressBar::new(utterances.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    let mut output = |identifier: &str, waveform: &Waveform| -> vits2_core::Result<()> {
        wav_writer.write(identifier, waveform)?;
        progress.set_message(format!("{}{}", args.utt_name, identifier));
        progress.inc(1);
        Ok(())
    };

    let mut batch = BatchSynthesis::new(&table)
        .with_blank(add_blank)
        .with_params(params);
    if let Some(chain) = chain.as_ref() {
        batch = batch.with_cleaners(chain);
    }

    let result = batch.run(&utterances, &mut synth, &mut output);
    match result {
        Ok(written) => {
            progress.finish_with_message("done");
            info!("Wrote {} files to {:?}", written, wav_writer.out_dir());
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e).context("Batch synthesis aborted")
        }
    }
}

fn build_chain(args: &Args, hps: &HParams) -> anyhow::Result<CleanerChain> {
    let names = args.cleaners.as_ref().unwrap_or(&hps.data.text_cleaners);
    let registry = CleanerRegistry::with_builtins();
    let chain = registry
        .chain(names.as_slice())
        .with_context(|| format!("Available cleaners: {}", registry.names().join(", ")))?;
    if chain.is_empty() {
        warn!("Raw text mode with no cleaners; text is encoded as-is");
    } else {
        info!("Cleaners: {:?}", chain);
    }
    Ok(chain)
}
