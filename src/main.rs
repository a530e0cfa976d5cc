//! BOLT Extract CLI
//!
//! Command-line tool for extracting BOLT archives from game binaries.

use anyhow::Context;
use bolt_extract::{extract_bytes, Algorithm, ExtractOptions, ExtractReport, NoteLevel};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Extract Mass Media's BOLT archive from game binaries.
///
/// Locates the embedded archive, walks its directory tree, and writes
/// every file under a synthetic index-based path, decompressing with
/// the platform's algorithm.
#[derive(Parser, Debug)]
#[command(name = "bolt-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (host binary containing a BOLT archive)
    input: PathBuf,

    /// Output directory (defaults to the input file's directory/stem)
    output: Option<PathBuf>,

    /// Use big-endian byte order for entry fields (N64, CD-i)
    #[arg(short, long)]
    big: bool,

    /// Algorithm to use; inferred from the input extension when absent
    #[arg(short, long, value_name = "cdi|dos|n64|gba|z64|win|xbox")]
    algo: Option<String>,

    /// Output format for the run summary
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress per-file diagnostics)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON report
    Json,
}

/// Resolve the algorithm from the flag or the input file extension.
fn determine_algorithm(input: &Path, algo: Option<&str>) -> Algorithm {
    match algo {
        Some(name) => Algorithm::from_name(name),
        None => input
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Algorithm::Unknown, Algorithm::from_name),
    }
}

/// Default output directory: `<input_dir>/<input_stem>/`.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_else(|| "bolt".as_ref());
    input.parent().unwrap_or_else(|| ".".as_ref()).join(stem)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging if verbose
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("bolt_extract=debug")
            .init();
    }

    let algorithm = determine_algorithm(&args.input, args.algo.as_deref());
    if algorithm == Algorithm::Unknown {
        eprintln!("Please choose a supported algorithm (cdi, dos, n64, gba, z64, win, xbox).");
        return ExitCode::FAILURE;
    }

    let mut options = ExtractOptions::new(algorithm);
    if args.big {
        options = options.force_big_endian();
    }
    let out_root = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    match run(&args, &options, &out_root) {
        Ok(report) => {
            match args.format {
                OutputFormat::Human => print_human(&report, &args, &out_root),
                OutputFormat::Json => print_json(&report),
            }
            // Per-file failures do not change the exit code; a located
            // container counts as success.
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error extracting {}: {e:#}", args.input.display());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, options: &ExtractOptions, out_root: &Path) -> anyhow::Result<ExtractReport> {
    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let report = extract_bytes(&data, out_root, options)
        .with_context(|| format!("extracting {}", args.input.display()))?;
    Ok(report)
}

fn print_human(report: &ExtractReport, args: &Args, out_root: &Path) {
    if !args.quiet {
        for note in &report.notes {
            if note.level != NoteLevel::Info {
                eprintln!("{}", note.message);
            }
        }
    }

    if args.quiet {
        println!("{}: {} files", out_root.display(), report.files.len());
        return;
    }

    println!("File: {}", args.input.display());
    println!("  Algorithm:  {} ({})", report.algorithm, report.algorithm.name());
    println!("  Endianness: {}", report.endianness);
    println!("  Bolt base:  0x{:X}", report.bolt_base);
    println!("  Built:      {}", report.timestamp);
    println!("  Entries:    {} at root", report.root_entries);
    println!("  Extracted:  {} files -> {}", report.files.len(), out_root.display());
    if report.problem_count() > 0 {
        println!("  Problems:   {}", report.problem_count());
    }

    if args.verbose {
        for file in &report.files {
            println!(
                "  {} ({} bytes{})",
                file.path.display(),
                file.written_size,
                if file.stored { ", stored" } else { "" }
            );
        }
    }
}

fn print_json(report: &ExtractReport) {
    println!(
        "{}",
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from(["bolt-extract", "game.z64"]).unwrap();
        assert_eq!(args.input, PathBuf::from("game.z64"));
        assert!(args.output.is_none());
        assert!(!args.big);
    }

    #[test]
    fn test_positional_output() {
        let args = Args::try_parse_from(["bolt-extract", "game.z64", "outdir"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("outdir")));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(Args::try_parse_from(["bolt-extract"]).is_err());
    }

    #[test]
    fn test_format_options() {
        let args = Args::try_parse_from(["bolt-extract", "-f", "json", "a.bin"]).unwrap();
        assert!(matches!(args.format, OutputFormat::Json));
    }

    #[test]
    fn test_algorithm_from_flag() {
        let algo = determine_algorithm(Path::new("whatever.bin"), Some("gba"));
        assert_eq!(algo, Algorithm::N64);
    }

    #[test]
    fn test_algorithm_inferred_from_extension() {
        assert_eq!(
            determine_algorithm(Path::new("game.z64"), None),
            Algorithm::N64
        );
        assert_eq!(
            determine_algorithm(Path::new("GAME.CDI"), None),
            Algorithm::Cdi
        );
        assert_eq!(
            determine_algorithm(Path::new("setup.exe"), None),
            Algorithm::Unknown
        );
        assert_eq!(
            determine_algorithm(Path::new("noextension"), None),
            Algorithm::Unknown
        );
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output(Path::new("roms/game.z64")),
            PathBuf::from("roms/game")
        );
    }
}
