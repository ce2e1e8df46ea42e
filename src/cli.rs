use crate::config::Config;
use crate::error::LaunchError;
use crate::invocation;
use crate::model::Platform;
use crate::runner;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "sd-runner",
    version,
    about = "Run stable-diffusion.cpp with settings from a per-platform INI file"
)]
pub struct Cli {
    /// Config file to read instead of `<name>.ini` next to the executable
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the command line and exit without running sd
    #[arg(long)]
    pub dry_run: bool,

    /// Print the planned invocation as JSON (requires --dry-run)
    #[arg(long)]
    pub json: bool,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Canonical path of the running executable.
fn program_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locate running executable")?;
    std::fs::canonicalize(&exe).with_context(|| format!("resolve {}", exe.display()))
}

/// `<dir>/<stem>.ini` for the executable at `program`.
pub fn default_config_path(program: &std::path::Path) -> Result<PathBuf> {
    let dir = program
        .parent()
        .context("executable has no parent directory")?;
    let stem = program
        .file_stem()
        .context("executable has no file name")?
        .to_string_lossy();
    Ok(dir.join(format!("{stem}.ini")))
}

/// Local wall-clock time, UTC when the local offset is unavailable.
fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|e| {
        tracing::debug!("local offset unavailable ({e}), using UTC");
        OffsetDateTime::now_utc()
    })
}

pub fn run(args: Cli) -> Result<(), LaunchError> {
    if args.json && !args.dry_run {
        return Err(anyhow::anyhow!(
            "--json can only be used with --dry-run. Use --dry-run --json together."
        )
        .into());
    }

    let now = local_now();
    let program = program_path()?;
    let program_dir = program
        .parent()
        .context("executable has no parent directory")?
        .to_path_buf();
    let config_path = match args.config.clone() {
        Some(p) => p,
        None => default_config_path(&program)?,
    };

    let config = Config::load(&config_path, Platform::current())?;
    let settings = config.settings().context("resolve settings")?;
    tracing::debug!(
        section = config.platform().section_name(),
        ?settings,
        "resolved settings"
    );

    let model = invocation::resolve_model(&settings)?;

    let output_dir = invocation::output_dir(&program_dir, &settings);
    if !args.dry_run {
        runner::ensure_output_dir(&output_dir)?;
    }
    let output_path = output_dir.join(invocation::output_file_name(now)?);
    let planned = invocation::build_invocation(&settings, &model, &output_path)?;

    if args.dry_run {
        if args.json {
            let out = serde_json::to_string_pretty(&planned).context("serialize invocation")?;
            println!("{out}");
        } else {
            for line in crate::text_summary::build_text_summary(&planned).lines {
                println!("{line}");
            }
        }
        return Ok(());
    }

    runner::execute(&planned)?;
    Ok(())
}
