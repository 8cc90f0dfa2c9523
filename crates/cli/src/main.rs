//! Command-line interface for batch ZIP extraction.
//!
//! Extracts a single `.zip` file, or every `.zip` file in a directory, into
//! one output directory and prints the extraction log.

use clap::Parser;
use extractor::{extract_zips_blocking, ExtractReport, ExtractRequest};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "unzipper")]
#[command(version, about = "Extract a ZIP file or a folder of ZIP files", long_about = None)]
#[command(after_help = "Examples:\n  \
  unzipper downloads/ out/              extract every .zip in downloads/ into out/\n  \
  unzipper downloads/ out/ mods_        only archives whose name starts with mods_\n  \
  unzipper bundle.zip out/ --keep-structure")]
struct Cli {
    /// ZIP file or directory containing ZIP files
    input: PathBuf,

    /// Output directory (created if missing)
    output: PathBuf,

    /// Only extract archives whose file name starts with this prefix
    prefix: Option<String>,

    /// Recreate folders from inside the archives instead of flattening
    #[arg(short, long)]
    keep_structure: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn request(&self) -> ExtractRequest {
        ExtractRequest::new(&self.input, &self.output)
            .keep_structure(self.keep_structure)
            .with_prefix(self.prefix.clone())
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output_for_handler = cli.output.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!(
            "\nInterrupted. Files already written to {} were left in place.",
            output_for_handler.display()
        );
        process::exit(130);
    }) {
        tracing::warn!(error = %e, "Could not install Ctrl-C handler");
    }

    match handle_extract(&cli) {
        Ok(report) => print_report(&report, cli.quiet),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_extract(cli: &Cli) -> Result<ExtractReport, extractor::ExtractError> {
    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let spinner_for_progress = spinner.clone();
    let progress_cb = move |message: &str| spinner_for_progress.set_message(message.to_string());

    let result = extract_zips_blocking(&cli.request(), Some(&progress_cb));
    spinner.finish_and_clear();
    result
}

fn print_report(report: &ExtractReport, quiet: bool) {
    if !quiet {
        for line in &report.logs {
            println!("{}", line);
        }
    }

    let stats = &report.stats;
    println!(
        "Done in {:.1}s: {} extracted, {} overwritten, {} duplicates skipped, {} failed files, {} failed archives",
        stats.duration.as_secs_f64(),
        stats.files_extracted,
        stats.files_overwritten,
        stats.files_skipped,
        stats.files_failed,
        stats.archives_failed,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_positional_prefix() {
        let cli = Cli::try_parse_from(["unzipper", "in", "out", "mods_"]).unwrap();
        let request = cli.request();
        assert_eq!(request.input_path, PathBuf::from("in"));
        assert_eq!(request.prefix.as_deref(), Some("mods_"));
        assert!(!request.keep_structure);
    }

    #[test]
    fn test_parse_keep_structure() {
        let cli = Cli::try_parse_from(["unzipper", "in.zip", "out", "--keep-structure"]).unwrap();
        assert!(cli.request().keep_structure);
        assert!(cli.request().prefix.is_none());
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["unzipper", "in.zip"]).is_err());
    }

    #[test]
    fn test_handle_extract_quiet() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("bundle.zip");
        let file = File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("nested/readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();

        let output = temp_dir.path().join("out");
        let cli = Cli::try_parse_from([
            OsStr::new("unzipper"),
            archive_path.as_os_str(),
            output.as_os_str(),
            OsStr::new("--quiet"),
        ])
        .unwrap();

        let report = handle_extract(&cli).unwrap();
        assert_eq!(report.stats.files_extracted, 1);
        assert!(output.join("readme.txt").exists());
    }
}
