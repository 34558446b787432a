//! `parcel-label` — check digits and print-ready shipping labels.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use label_raster::LabelPipeline;

use parcel_label_lib::{AppConfig, commands};

#[derive(Parser, Debug)]
#[command(version, about = "Tracking number check digits and thermal label rendering")]
struct CliArguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the check digit for a tracking number prefix
    CheckDigit { prefix: String },
    /// Print the prefix followed by its check digit
    Complete { prefix: String },
    /// Check that the last digit of a tracking number is correct
    Validate { number: String },
    /// Rasterize a PDF label and write the print-ready PNG
    Label {
        #[arg(value_name = "INPUT_PDF")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT_PNG")]
        output: PathBuf,
    },
    /// Crop, threshold and compose an already rasterized label
    Process {
        #[arg(value_name = "INPUT_PNG")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT_PNG")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let arguments = CliArguments::parse();

    parcel_label_lib::load_dotenv();
    let config = AppConfig::from_env()?;
    parcel_label_lib::init_tracing(&config.log_filter);
    tracing::debug!(?config, ?arguments, "Starting parcel-label");

    match arguments.command {
        Command::CheckDigit { prefix } => {
            println!("{}", commands::check_digit(&prefix)?);
        }
        Command::Complete { prefix } => {
            println!("{}", commands::complete(&prefix)?);
        }
        Command::Validate { number } => match commands::validate(&number) {
            Ok(_) => println!("valid"),
            Err(e) => {
                println!("invalid");
                tracing::warn!("{number}: {e}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Label { input, output } => {
            let pipeline = build_pipeline(&config);
            commands::render_label(&pipeline, &input, &output).await?;
        }
        Command::Process { input, output } => {
            let pipeline = build_pipeline(&config);
            commands::process_label(&pipeline, &input, &output).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_pipeline(config: &AppConfig) -> LabelPipeline<label_raster::CommandRasterizer> {
    tracing::info!(
        rasterizer = %config.rasterizer,
        dpi = config.dpi,
        processing = %config.processing,
        threshold = config.threshold,
        "Building label pipeline"
    );
    LabelPipeline::new(config.build_rasterizer(), config.processing)
        .with_options(config.label_options())
}
