//! Handle command - run the upload handler on one storage event.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::ProgressBar;
use tracing::debug;

use plateread_core::models::config::OcrEngineKind;
use plateread_core::models::fields::LabelRecord;
use plateread_core::{engine_from_config, ImageHandler, JsonFileStore, Outcome, StorageEvent};

/// Arguments for the handle command.
#[derive(Args)]
pub struct HandleArgs {
    /// Event JSON file, bare or wrapped in {"data": ...} ("-" for stdin)
    #[arg(default_value = "-")]
    event: PathBuf,

    /// OCR engine (overrides config)
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

    /// Directory holding buckets (overrides config)
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// Record document path (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum EngineArg {
    /// pure-onnx-ocr over the image
    Pure,
    /// Pre-transcribed text next to the image
    Sidecar,
}

impl From<EngineArg> for OcrEngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Pure => OcrEngineKind::Pure,
            EngineArg::Sidecar => OcrEngineKind::Sidecar,
        }
    }
}

pub async fn run(args: HandleArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(engine) = args.engine {
        config.ocr.engine = engine.into();
    }
    if let Some(root) = args.storage_root {
        config.storage.root = root;
    }
    if let Some(store) = args.store {
        config.store.path = store;
    }

    let event = StorageEvent::from_json(&read_event(&args.event)?)?;
    debug!("Parsed event: {:?}", event);

    // Deletions and invalid events resolve without loading an OCR engine.
    if event.is_deletion() {
        print_ignored();
        return Ok(());
    }
    event.location()?;

    let ocr = engine_from_config(&config)?;
    let store = Arc::new(JsonFileStore::new(&config.store.path));
    let handler = ImageHandler::from_config(&config, ocr, store);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Processing event...");

    let outcome = handler.process_image(&event).await;
    pb.finish_and_clear();

    match outcome? {
        Outcome::Ignored => print_ignored(),
        Outcome::Processed(fields) => {
            eprintln!(
                "{} Record written to {} in {}",
                style("✓").green(),
                config.store.record_path,
                config.store.path.display()
            );
            println!("{}", serde_json::to_string_pretty(&LabelRecord::from(fields))?);
        }
    }

    Ok(())
}

fn print_ignored() {
    eprintln!("{} Deletion event, nothing to do.", style("ℹ").blue());
    println!("ignored");
}

fn read_event(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        return Ok(json);
    }

    if !path.exists() {
        anyhow::bail!("Event file not found: {}", path.display());
    }

    Ok(fs::read_to_string(path)?)
}
