use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use diagram_converter::config::ConverterConfig;
use diagram_converter::convert::Converter;
use diagram_converter::output::JsonWriter;
use diagram_converter::parse::ProcessSchema;
use diagram_converter::source::MemoryDatabase;
use diagram_converter::trivial::TrivialChemicals;
use diagram_converter::verify;

#[derive(Parser)]
#[command(author, version, about = "Convert stored pathway diagrams into layout and graph JSON", long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `diagram_converter=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every pathway diagram in the database dump.
    Convert {
        /// JSON configuration file; flags below take precedence.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        database: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        schema: Option<PathBuf>,
        #[arg(long)]
        trivial_chemicals: Option<PathBuf>,
        /// Check the output directory after converting.
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Check that an output directory holds the expected number of documents.
    Verify {
        #[arg(long)]
        output: PathBuf,
        /// Expected number of files (two per pathway).
        #[arg(long)]
        expected: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when verification fails.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Convert {
            config,
            database,
            output,
            schema,
            trivial_chemicals,
            verify,
        } => {
            let from_file = match config {
                Some(path) => ConverterConfig::from_json_file(&path)?,
                None => ConverterConfig::default(),
            };
            let config = from_file.merge(ConverterConfig {
                database,
                output_dir: output,
                schema,
                trivial_chemicals,
            });
            convert(&config, verify)
        }
        Command::Verify { output, expected } => {
            let report = verify::verify_output(&output, expected)?;
            println!(
                "{} diagram(s), {} graph(s), {} expected",
                report.diagrams, report.graphs, report.expected
            );
            Ok(report.is_ok())
        }
    }
}

fn convert(config: &ConverterConfig, check: bool) -> Result<bool> {
    let schema = match &config.schema {
        Some(path) => ProcessSchema::load(path)?,
        None => ProcessSchema::builtin()?,
    };
    let trivial = match &config.trivial_chemicals {
        Some(path) => TrivialChemicals::load(path)?,
        None => TrivialChemicals::builtin(),
    };
    let db = MemoryDatabase::load(config.require_database()?)?;
    let writer = JsonWriter::new(config.require_output_dir()?)?;
    info!(
        records = db.len(),
        trivial_chemicals = trivial.len(),
        "initialized"
    );

    let report = Converter::new(&db, &schema, &trivial).convert_all(&writer);
    if report.cancelled {
        bail!("conversion cancelled");
    }
    if !check {
        return Ok(true);
    }

    let verified = verify::verify_output(writer.dir(), report.expected_files())
        .context("verifying output")?;
    Ok(verified.is_ok())
}
