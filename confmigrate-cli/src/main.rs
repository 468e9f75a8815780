mod config;
mod files;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use confmigrate_core::{DiffEntry, DiffKind, MigrateError, MigrationEngine};
use files::{LineFile, render_patch};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "confmigrate",
    version,
    about = "Keeps a user's config file in step with a shipped reference config."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest missing keys as comments (default: dry-run preview).
    Migrate(MigrateArgs),
    /// List keys that are missing or customized relative to the reference.
    Diff(DiffArgs),
    /// Print the reference fingerprint and, optionally, the current marker.
    Fingerprint(FingerprintArgs),
}

#[derive(Debug, Parser)]
struct MigrateArgs {
    /// The user's config file.
    #[arg(long)]
    current: Utf8PathBuf,

    /// The reference config shipped with the application.
    #[arg(long)]
    reference: Utf8PathBuf,

    /// Write the updated file. If omitted, prints a unified diff and writes nothing.
    #[arg(long, default_value_t = false)]
    apply: bool,

    /// Do not copy the original file aside before writing.
    #[arg(long, default_value_t = false)]
    no_backup: bool,

    /// chrono format for the UPDATE banner (overrides confmigrate.toml).
    #[arg(long)]
    timestamp_format: Option<String>,

    /// Explicit confmigrate.toml (default: next to --current).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Write a JSON report of the run to this path.
    #[arg(long)]
    report: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct DiffArgs {
    #[arg(long)]
    current: Utf8PathBuf,

    #[arg(long)]
    reference: Utf8PathBuf,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct FingerprintArgs {
    #[arg(long)]
    reference: Utf8PathBuf,

    /// Also read the marker from this file and report whether a migration would run.
    #[arg(long)]
    current: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let code = e
            .downcast_ref::<MigrateError>()
            .map_or(1, MigrateError::exit_code);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Migrate(args) => cmd_migrate(args),
        Command::Diff(args) => cmd_diff(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
    }
}

fn cmd_migrate(args: MigrateArgs) -> anyhow::Result<()> {
    let file_config = config::load_or_default(args.config.as_deref(), &args.current)
        .context("load confmigrate.toml config")?;
    let merged = ConfigMerger::new(file_config)
        .merge_migrate_args(args.no_backup, args.timestamp_format.as_deref());

    debug!(
        "merged config: timestamp_format={:?}, backups={:?}",
        merged.settings.timestamp_format, merged.backups
    );

    let current = LineFile::read(&args.current)?;
    let reference = read_text(&args.reference)?;

    let engine = MigrationEngine::new().with_settings(merged.settings);
    let outcome = engine
        .migrate_with_report(&current.lines, &reference)
        .with_context(|| format!("migrate {}", args.current))?;

    if let Some(path) = &args.report {
        write_json(path, &outcome.report)?;
    }

    let Some(lines) = outcome.lines else {
        println!("{} is up to date", args.current);
        return Ok(());
    };
    let updated = current.render(&lines);

    if !args.apply {
        print!("{}", render_patch(&args.current, &current.text(), &updated));
        return Ok(());
    }

    if merged.backups.enabled {
        let backup = merged.backups.backup_path(&args.current);
        fs::copy(&args.current, &backup)
            .with_context(|| format!("back up {} to {}", args.current, backup))?;
        debug!("backed up {} to {}", args.current, backup);
    }
    fs::write(&args.current, updated).with_context(|| format!("write {}", args.current))?;

    info!("wrote {}", args.current);
    println!(
        "updated {}: {} inline, {} trailing",
        args.current,
        outcome.report.inline_count(),
        outcome.report.trailing_count()
    );
    Ok(())
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let current = read_text(&args.current)?;
    let reference = read_text(&args.reference)?;

    let entries = MigrationEngine::new()
        .diff_texts(&current, &reference)
        .with_context(|| format!("diff {} against {}", args.current, args.reference))?;

    match args.format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("no differences");
            }
            for entry in &entries {
                println!("{}", describe(entry)?);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn cmd_fingerprint(args: FingerprintArgs) -> anyhow::Result<()> {
    let reference = read_text(&args.reference)?;
    let engine = MigrationEngine::new();

    let Some(current_path) = &args.current else {
        println!("{}", engine.fingerprint(&reference)?);
        return Ok(());
    };

    let current = LineFile::read(current_path)?;
    let decision = engine.gate(&current.lines, &reference)?;
    println!("reference: {}", decision.digest);
    println!("marker:    {}", decision.existing.as_deref().unwrap_or("none"));
    println!(
        "migration: {}",
        if decision.needed { "needed" } else { "up to date" }
    );
    Ok(())
}

fn describe(entry: &DiffEntry) -> anyhow::Result<String> {
    let kind = match entry.kind {
        DiffKind::Missing => "missing",
        DiffKind::Differs => "differs",
    };
    let payload = serde_json::to_string(&entry.payload).context("serialize value")?;
    Ok(format!("{:<8} {} = {}", kind, entry.path, payload))
}

fn read_text(path: &Utf8Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path))
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}
