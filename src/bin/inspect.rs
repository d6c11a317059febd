//! travelog-inspect - headless run inspection.
//!
//! Prints the per-channel series, sag and histogram summaries of a run
//! document or logger capture. With `--convert`, a capture is written out as
//! a run document instead.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use travelog::analysis::{analyze_run, ChannelAnalysis};
use travelog::parsers::run_json::extract_telemetry;
use travelog::parsers::{parse_document, Capture, RunDocument, SuspensionChannel};
use travelog::settings::TelemetryConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a suspension run document or logger capture", long_about = None)]
struct Args {
    /// Run document (.json) or logger capture (.txt)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Write the input as a run document to this path instead of analysing it
    #[arg(long, value_hint = ValueHint::FilePath)]
    convert: Option<PathBuf>,

    /// Raw reading at full compression
    #[arg(long, default_value_t = 1024.0, value_parser = positive_f64)]
    max_travel: f64,

    /// Sag moving-average window in milliseconds
    #[arg(long, default_value_t = 500.0, value_parser = positive_f64)]
    window_ms: f64,

    /// Number of travel histogram bins
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    bins: u16,
}

impl Args {
    fn config(&self) -> TelemetryConfig {
        TelemetryConfig {
            max_travel: self.max_travel,
            window_ms: self.window_ms,
            bin_count: self.bins as usize,
            ..Default::default()
        }
    }
}

fn positive_f64(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("must be a positive number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn is_json(path: &Path, bytes: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    by_extension || matches!(first, Some(b'{'))
}

fn load_document(path: &Path) -> Result<RunDocument> {
    let bytes = travelog::source::read_file(path)?;
    if is_json(path, &bytes) {
        return parse_document(&bytes)
            .with_context(|| format!("failed to parse run document {}", path.display()));
    }

    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("{} is neither JSON nor a text capture", path.display()))?;
    let capture = Capture::parse(text)
        .with_context(|| format!("failed to parse capture {}", path.display()))?;
    if capture.skipped_rows > 0 {
        tracing::warn!("Skipped {} malformed capture rows", capture.skipped_rows);
    }
    Ok(capture.to_document())
}

fn print_channel(channel: SuspensionChannel, samples: usize, frequency: f64, analysis: &ChannelAnalysis) {
    let metadata = &analysis.metadata;
    println!("{}", channel.label());
    println!("  samples:    {} @ {} Hz", samples, frequency);
    if let (Some(first), Some(last)) = (analysis.series.first(), analysis.series.last()) {
        println!(
            "  series:     {:.3}s .. {:.3}s, travel {:.1}% .. {:.1}%",
            first.x, last.x, first.y, last.y
        );
    }
    println!("  sag points: {}", analysis.sag.len());
    println!(
        "  histogram:  {} binned of {} ({} non-finite, {} out of range)",
        analysis.summary.binned(),
        analysis.summary.total,
        analysis.summary.non_finite,
        analysis.summary.out_of_domain
    );
    for bin in analysis.bins.iter().filter(|b| b.count > 0) {
        println!(
            "    [{:>5.1}, {:>5.1}) {:>8} {:>4}%",
            bin.x0, bin.x1, bin.count, bin.percent
        );
    }
    println!(
        "  analysis:   {} ({}) in {} ms",
        metadata.algorithm,
        metadata.parameter_summary(),
        metadata.computation_time_ms
    );
    for warning in &metadata.warnings {
        println!("  warning:    {}", warning);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = args.config();
    let document = load_document(&args.input)?;

    if let Some(out) = &args.convert {
        let json = serde_json::to_vec_pretty(&document)?;
        std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;
        println!("Wrote {}", out.display());
        return Ok(());
    }

    let telemetry = extract_telemetry(document, &config);
    let analysis = analyze_run(&telemetry, &config);

    println!("{}", args.input.display());
    for channel in [SuspensionChannel::Front, SuspensionChannel::Rear] {
        let data = telemetry.channel(channel);
        print_channel(channel, data.data.len(), data.frequency, analysis.channel(channel));
    }
    Ok(())
}
