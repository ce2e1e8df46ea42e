//! Filesystem preparation and child process execution.

use crate::model::Invocation;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Instant;

/// Create `dir` if it is not already a directory.
///
/// Only the last component is created; a missing parent is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "created output directory");
    Ok(())
}

/// Run the child to completion with inherited stdio.
///
/// A non-zero exit status is logged and returned, never turned into an error.
pub fn execute(invocation: &Invocation) -> Result<ExitStatus> {
    let mut cmd = Command::new(invocation.program());
    cmd.args(invocation.args());
    if let Some(dir) = invocation.working_dir.as_deref() {
        cmd.current_dir(dir);
    }

    tracing::info!(
        program = %invocation.program().to_string_lossy(),
        working_dir = ?invocation.working_dir,
        output = %invocation.output_path.display(),
        "launching"
    );
    let started = Instant::now();
    let status = cmd
        .status()
        .with_context(|| format!("launch {}", invocation.program().to_string_lossy()))?;
    // whole milliseconds
    let elapsed = std::time::Duration::from_millis(started.elapsed().as_millis() as u64);

    if status.success() {
        tracing::info!(elapsed = %humantime::format_duration(elapsed), "sd finished");
    } else {
        tracing::warn!(
            %status,
            elapsed = %humantime::format_duration(elapsed),
            "sd exited unsuccessfully"
        );
    }
    Ok(status)
}
