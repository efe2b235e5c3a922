use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use formtag::forms::registry;
use formtag::{
    Color, CompileReport, CompilerConfig, FieldCategory, FormCompiler, SourceDocument,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "formtag",
    about = "Turns {{type:name|options}} placeholder tags into form widgets",
    version,
    author
)]
struct Cli {
    /// Log every pipeline stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the tags of a layout into a fillable form description
    Compile {
        /// Layout JSON file
        input: PathBuf,

        /// Output file (defaults to <input>_fillable.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the run report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Parse, resolve and check names without emitting widgets
    Check {
        /// Layout JSON file
        input: PathBuf,

        #[command(flatten)]
        settings: Settings,
    },

    /// List the supported tag types by category
    Types,
}

#[derive(Args)]
struct Settings {
    /// Compiler configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gap between a widget and its cell borders, in points
    #[arg(long)]
    cell_margin: Option<f64>,

    /// Border color of required fields (e.g. "1,0,0" or "255,0,0")
    #[arg(long)]
    required_border_color: Option<Color>,

    /// Border color of other fields
    #[arg(long)]
    default_border_color: Option<Color>,

    #[arg(long)]
    required_border_width: Option<f64>,

    #[arg(long)]
    default_border_width: Option<f64>,

    /// Do not annotate tags that could not be converted
    #[arg(long)]
    no_annotate: bool,
}

impl Settings {
    fn load(&self) -> Result<CompilerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => CompilerConfig::default(),
        };

        if let Some(margin) = self.cell_margin {
            config.placement.cell_margin = margin;
        }
        if let Some(color) = self.required_border_color {
            config.style.required_border_color = color;
        }
        if let Some(color) = self.default_border_color {
            config.style.default_border_color = color;
        }
        if let Some(width) = self.required_border_width {
            config.style.required_border_width = width;
        }
        if let Some(width) = self.default_border_width {
            config.style.default_border_width = width;
        }
        if self.no_annotate {
            config.annotate_failures = false;
        }
        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "formtag=debug" } else { "formtag=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_layout(path: &Path) -> Result<SourceDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    SourceDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read layout {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "form".to_string());
    input.with_file_name(format!("{stem}_fillable.json"))
}

fn print_problems(report: &CompileReport) {
    for failure in &report.failures {
        println!("  ✗ page {}: {} ({})", failure.page + 1, failure.tag, failure.message);
    }
    for notice in &report.notices {
        println!("  • page {}: {}: {}", notice.page + 1, notice.field, notice.message);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile {
            input,
            output,
            report,
            settings,
        } => {
            let config = settings.load()?;
            let document = read_layout(&input)?;
            let (form, run) = FormCompiler::new(config)
                .compile_document(&document)
                .with_context(|| format!("Failed to compile {}", input.display()))?;

            let output = output.unwrap_or_else(|| default_output(&input));
            write_json(&output, &form)?;
            if let Some(report_path) = report {
                write_json(&report_path, &run)?;
            }

            println!("{}", run.summary());
            print_problems(&run);
            println!("✓ Form written to {}", output.display());
        }

        Commands::Check { input, settings } => {
            let config = settings.load()?;
            let document = read_layout(&input)?;
            let plan = FormCompiler::new(config)
                .plan(&document)
                .with_context(|| format!("Check failed for {}", input.display()))?;

            for field in &plan.fields {
                let rect = field.placement.rect;
                println!(
                    "page {}: {} '{}' at ({:.1}, {:.1}) {:.1}x{:.1}",
                    field.occurrence.page + 1,
                    field.spec.keyword(),
                    field.spec.name(),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
            }
            let mut run = CompileReport::new();
            run.occurrences = plan.occurrences;
            run.failures = plan.failures;
            run.notices = plan.notices;
            print_problems(&run);
            println!(
                "✓ {} tag(s), {} field(s) ready, {} failure(s)",
                plan.occurrences,
                plan.fields.len(),
                run.failures.len()
            );
        }

        Commands::Types => {
            for category in FieldCategory::ALL {
                let keywords: Vec<&str> = registry::kinds()
                    .iter()
                    .filter(|kind| kind.category == category)
                    .map(|kind| kind.keyword)
                    .collect();
                println!("{category}: {}", keywords.join(", "));
            }
        }
    }

    Ok(())
}
