//! Extract command - derive label fields from OCR text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use plateread_core::label::{BrandBoundary, LabelParser};
use plateread_core::models::fields::ExtractedFields;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file holding the OCR output ("-" for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Start the brand at the boundary nearest to "TM"
    #[arg(long)]
    nearest_boundary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let text = read_input(&args.input)?;
    debug!("Read {} bytes of OCR text", text.len());

    let mut parser = LabelParser::from_config(&config.extraction);
    if args.nearest_boundary {
        parser = parser.with_brand_boundary(BrandBoundary::Nearest);
    }

    let fields = parser.parse(&text);
    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

pub fn format_fields(fields: &ExtractedFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &ExtractedFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["brand", "catalogue", "orderNum"])?;
    wtr.write_record([&fields.brand, &fields.catalogue, &fields.order_num])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(fields: &ExtractedFields) -> String {
    format!(
        "Brand:     {}\nCatalogue: {}\nOrder:     {}\n",
        fields.brand, fields.catalogue, fields.order_num
    )
}
