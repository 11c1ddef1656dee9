use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nlgraph::{ConversionConfig, Converter, NameStyle};

/// Convert Neurolucida XML morphologies into UGX/OBJ graphs.
#[derive(Parser, Debug)]
#[command(name = "nlgraph", version, about)]
struct Cli {
    /// Neurolucida XML files to convert.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Factor applied to coordinates and diameters.
    #[arg(long, default_value_t = 1e-6)]
    scaling: f64,

    /// Separator inserted into verbose subset names.
    #[arg(long, default_value = "")]
    separator: String,

    /// Use verbose subset names instead of slugs.
    #[arg(long)]
    verbose_names: bool,

    /// Distance below which vertices are merged.
    #[arg(long, default_value_t = 1e-6)]
    dedup_threshold: f64,

    /// Also write a Wavefront OBJ file.
    #[arg(long)]
    obj: bool,

    /// Do not write a UGX file.
    #[arg(long)]
    no_ugx: bool,
}

impl Cli {
    fn config(&self) -> ConversionConfig {
        let name_style = if self.verbose_names {
            NameStyle::Verbose
        } else {
            NameStyle::Slug
        };
        ConversionConfig::default()
            .with_scaling(self.scaling)
            .with_separator(self.separator.clone())
            .with_name_style(name_style)
            .with_dedup_threshold(self.dedup_threshold)
            .with_exports(self.obj, !self.no_ugx)
    }
}

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for nlgraph.
    // Override with RUST_LOG env var (e.g. RUST_LOG=nlgraph=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("nlgraph=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let converter = Converter::new(cli.config());

    let mut failed = false;
    for input in &cli.inputs {
        match converter.convert_file(input) {
            Ok(Some(conversion)) => {
                for path in &conversion.written {
                    println!("{}", path.display());
                }
            }
            Ok(None) => failed = true,
            Err(err) => {
                tracing::error!(path = %input.display(), "{err}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
