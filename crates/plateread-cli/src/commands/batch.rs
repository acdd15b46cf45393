//! Batch command - extract label fields from many OCR text files.

use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use plateread_core::label::LabelParser;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for OCR text files
    #[arg(required = true)]
    input: String,

    /// Summary CSV (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let parser = LabelParser::from_config(&config.extraction);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No files match pattern: {}", args.input);
    }

    info!("Found {} files to process", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["file", "brand", "catalogue", "orderNum"])?;

    let mut failed = 0usize;
    for path in &files {
        pb.set_message(path.display().to_string());

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                failed += 1;
                pb.inc(1);
                continue;
            }
            Err(e) => {
                pb.abandon();
                anyhow::bail!("Failed to read {}: {}", path.display(), e);
            }
        };

        let fields = parser.parse(&text);
        wtr.write_record([
            path.display().to_string(),
            fields.brand,
            fields.catalogue,
            fields.order_num,
        ])?;
        pb.inc(1);
    }

    pb.finish_and_clear();

    let summary = String::from_utf8(wtr.into_inner()?)?;
    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &summary)?;
        eprintln!(
            "{} Processed {} files ({} failed), summary written to {}",
            style("✓").green(),
            files.len() - failed,
            failed,
            output_path.display()
        );
    } else {
        print!("{}", summary);
    }

    Ok(())
}
