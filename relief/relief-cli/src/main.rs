//! Command line entry point for the relief pipeline.
//!
//! ```text
//! relief --input photo.jpg --mode image
//! relief --input "a weathered brick wall" --mode text --format stl
//! ```
//!
//! Progress is logged through `tracing`; set `RUST_LOG=relief_pipeline=info`
//! (or `debug` for per-stage detail) to see it.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use relief_pipeline::{run_pipeline, PipelineMode, PipelineParams};

#[derive(Parser)]
#[command(name = "relief")]
#[command(version, about = "Generate 3D models from images or text")]
struct Cli {
    /// Input image path or text prompt.
    #[arg(long)]
    input: String,

    /// Input mode: image or text.
    #[arg(long, value_enum)]
    mode: Mode,

    /// Output directory.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Obj)]
    format: Format,

    /// Cap the longest image side at this many pixels before the depth stage.
    #[arg(long)]
    max_size: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Treat the input as a path to a photo.
    Image,
    /// Treat the input as a text prompt.
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Obj,
    Stl,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("Error: {error}");
        let mut cause = error.source();
        while let Some(inner) = cause {
            eprintln!("  caused by: {inner}");
            cause = inner.source();
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mode = match cli.mode {
        Mode::Image => PipelineMode::Image,
        Mode::Text => PipelineMode::Text,
    };
    let format = match cli.format {
        Format::Obj => "obj",
        Format::Stl => "stl",
    };

    let mut params = PipelineParams::new(cli.input, mode)
        .with_output_dir(cli.output)
        .with_format(format);
    if let Some(max_size) = cli.max_size {
        params = params.with_max_size(max_size);
    }

    let summary = run_pipeline(&params)?;
    println!("{summary}");
    Ok(())
}
