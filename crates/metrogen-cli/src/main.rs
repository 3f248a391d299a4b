mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use metrogen_generate::{GenerateOptions, GenerationError, ReportGenerator};
use registry::{
    DocumentSummary, GenerationSummary, RunPaths, RunRecord, common_prefix_len,
    init_run_logging, start_run, write_document, write_generation_summary,
};
use settings::{Settings, SettingsError, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Parser, Debug)]
#[command(name = "metrogen", version, about = "Synthetic metrology report generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one single-part report.
    Part(PartArgs),
    /// Generate two near-identical reports differing by one measurement.
    Pair(PartArgs),
    /// Generate a keyed multi-part assembly.
    Assembly(AssemblyArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TOML settings file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Instant treated as "now" (RFC 3339).
    #[arg(long, value_name = "RFC3339")]
    anchor: Option<DateTime<Utc>>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Also write the generated document to this path.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Pretty-print JSON documents.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct PartArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Number of measurements in the report.
    #[arg(long)]
    report_size: Option<usize>,
}

#[derive(Args, Debug)]
struct AssemblyArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Number of part reports.
    #[arg(long)]
    assembly_size: Option<usize>,
    /// Smallest part report size.
    #[arg(long)]
    min_report_size: Option<usize>,
    /// Largest part report size.
    #[arg(long)]
    max_report_size: Option<usize>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Part(args) => run_part(args, false),
        Command::Pair(args) => run_part(args, true),
        Command::Assembly(args) => run_assembly(args),
    }
}

struct Session {
    record: RunRecord,
    paths: RunPaths,
    generator: ReportGenerator,
    out: Option<PathBuf>,
    timer: Instant,
}

fn run_part(args: PartArgs, pair: bool) -> Result<(), CliError> {
    let PartArgs {
        common,
        report_size,
    } = args;
    let mut settings = load_settings(common.config.as_deref())?;
    if let Some(report_size) = report_size {
        settings.part.report_size = report_size;
    }
    let command = if pair { "pair" } else { "part" };
    let mut session = open_session(common, settings, command)?;
    let config = session.record.settings.part.config();
    let pretty = session.record.settings.pretty;

    tracing::info!(event = "generation_started", report_size = config.report_size);

    let (documents, common_prefix_bytes) = if pair {
        let reports = session.generator.part_reports(&config)?;
        let (one, one_summary) = write_document(
            &session.paths,
            "part_reports.one.json",
            &reports.one,
            pretty,
            None,
        )?;
        let (two, two_summary) = write_document(
            &session.paths,
            "part_reports.two.json",
            &reports.two,
            pretty,
            None,
        )?;
        let mut documents = vec![one_summary, two_summary];
        if let Some(out) = session.out.as_deref() {
            let (_, pair_summary) = write_document(
                &session.paths,
                "part_reports.json",
                &reports,
                pretty,
                Some(out),
            )?;
            documents.push(pair_summary);
        }
        (documents, Some(common_prefix_len(&one, &two)))
    } else {
        let report = session.generator.part_report(&config)?;
        let (_, summary) = write_document(
            &session.paths,
            "part_report.json",
            &report,
            pretty,
            session.out.as_deref(),
        )?;
        (vec![summary], None)
    };

    finish_session(session, documents, common_prefix_bytes)
}

fn run_assembly(args: AssemblyArgs) -> Result<(), CliError> {
    let AssemblyArgs {
        common,
        assembly_size,
        min_report_size,
        max_report_size,
    } = args;
    let mut settings = load_settings(common.config.as_deref())?;
    if let Some(value) = assembly_size {
        settings.assembly.assembly_size = value;
    }
    if let Some(value) = min_report_size {
        settings.assembly.min_report_size = value;
    }
    if let Some(value) = max_report_size {
        settings.assembly.max_report_size = value;
    }
    let config = settings.assembly.config();
    config.validate()?;

    let mut session = open_session(common, settings, "assembly")?;
    let pretty = session.record.settings.pretty;

    tracing::info!(
        event = "generation_started",
        assembly_size = config.assembly_size,
        min_report_size = config.min_report_size,
        max_report_size = config.max_report_size
    );

    let assembly = session.generator.multipart_report(&config)?;
    let (_, summary) = write_document(
        &session.paths,
        "multipart_report.json",
        &assembly,
        pretty,
        session.out.as_deref(),
    )?;

    finish_session(session, vec![summary], None)
}

fn open_session(
    common: CommonArgs,
    mut settings: Settings,
    command: &'static str,
) -> Result<Session, CliError> {
    let CommonArgs {
        config: _,
        seed,
        anchor,
        run_dir,
        out,
        pretty,
    } = common;
    if seed.is_some() {
        settings.seed = seed;
    }
    if anchor.is_some() {
        settings.anchor = anchor;
    }
    if let Some(run_dir) = run_dir {
        settings.run_dir = run_dir;
    }
    settings.pretty |= pretty;

    let options = GenerateOptions {
        seed: settings.seed,
        anchor: settings.anchor,
    }
    .resolve();
    let seed = options.seed.unwrap_or_default();
    let anchor = options.anchor.unwrap_or_else(Utc::now);

    let record = RunRecord {
        run_id: Uuid::new_v4().to_string(),
        started_at: Utc::now(),
        command,
        seed,
        anchor,
        settings,
    };
    let paths = start_run(&record)?;
    init_run_logging(&paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %record.run_id,
        command,
        seed,
        anchor = %anchor
    );

    Ok(Session {
        generator: ReportGenerator::new(options),
        record,
        paths,
        out,
        timer: Instant::now(),
    })
}

fn finish_session(
    session: Session,
    documents: Vec<DocumentSummary>,
    common_prefix_bytes: Option<usize>,
) -> Result<(), CliError> {
    for document in &documents {
        tracing::info!(
            event = "document_written",
            name = %document.name,
            byte_size = document.byte_size,
            sha256 = %document.sha256
        );
    }

    let duration_ms = u64::try_from(session.timer.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = GenerationSummary {
        run_id: session.record.run_id.clone(),
        command: session.record.command.to_string(),
        seed: session.record.seed,
        anchor: session.record.anchor.to_rfc3339(),
        duration_ms,
        documents,
        common_prefix_bytes,
    };
    write_generation_summary(&session.paths, &summary)?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        duration_ms,
        path = %session.paths.root.display()
    );
    println!("{}", session.paths.root.display());

    Ok(())
}
