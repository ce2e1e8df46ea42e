//! Turning resolved settings into a command line for the `sd` binary.

use crate::error::LaunchError;
use crate::model::{Invocation, Settings};
use crate::paths;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

pub const OUTPUT_EXTENSION: &str = "png";

/// Check that a model is configured and points at a regular file.
///
/// Returns the absolute, symlink-free model path. A path that does not exist
/// is still resolved as far as possible so the error can name it.
pub fn resolve_model(settings: &Settings) -> Result<PathBuf, LaunchError> {
    let model = settings.model.as_deref().ok_or(LaunchError::MissingModel)?;
    let resolved =
        paths::realpath(Path::new(model)).with_context(|| format!("resolve model path {model}"))?;
    if !resolved.is_file() {
        return Err(LaunchError::ModelNotFound(resolved));
    }
    Ok(resolved)
}

/// `DDMMYY_HHMMSS_ffffff.png`
pub fn output_file_name(now: OffsetDateTime) -> Result<String> {
    let stamp = now
        .format(format_description!(
            "[day][month][year repr:last_two]_[hour][minute][second]_[subsecond digits:6]"
        ))
        .context("format output timestamp")?;
    Ok(format!("{stamp}.{OUTPUT_EXTENSION}"))
}

/// Directory the images land in: `output_dir` relative to the launcher's own directory.
pub fn output_dir(program_dir: &Path, settings: &Settings) -> PathBuf {
    program_dir.join(&settings.output_dir)
}

/// Directory part of the configured binary path, `None` when there is none.
pub fn working_dir(sd_bin: &str) -> Option<PathBuf> {
    Some(paths::dirname(sd_bin))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Assemble the argument vector in the order `sd` expects.
pub fn build_invocation(
    settings: &Settings,
    model: &Path,
    output_path: &Path,
) -> Result<Invocation> {
    let binary = paths::absolute_normalized(Path::new(&settings.sd_bin))
        .with_context(|| format!("resolve sd binary path {}", settings.sd_bin))?;

    let mut argv = vec![binary.into_os_string()];
    let required: [(&str, OsString); 12] = [
        ("--height", OsString::from(&settings.height)),
        ("--width", OsString::from(&settings.width)),
        ("--cfg-scale", OsString::from(&settings.cfg_scale)),
        ("--strength", OsString::from(&settings.strength)),
        ("--sampling-method", OsString::from(&settings.sampling_method)),
        ("--steps", OsString::from(&settings.steps)),
        ("--seed", OsString::from(&settings.seed)),
        ("--clip-skip", OsString::from(&settings.clip_skip)),
        ("--model", model.as_os_str().to_owned()),
        ("--prompt", OsString::from(&settings.prompt)),
        ("--negative-prompt", OsString::from(&settings.negative_prompt)),
        ("--output", output_path.as_os_str().to_owned()),
    ];
    for (flag, value) in required {
        argv.push(flag.into());
        argv.push(value);
    }

    let optional = [
        ("--batch-count", &settings.batch_count),
        ("--lora-model-dir", &settings.lora_dir),
        ("--upscale-model", &settings.upscale_model),
        ("--vae", &settings.vae),
    ];
    for (flag, value) in optional {
        if let Some(value) = value {
            argv.push(flag.into());
            argv.push(value.into());
        }
    }

    // control-strength only means something alongside a control net
    if let Some(control_net) = &settings.control_net {
        argv.push("--control-net".into());
        argv.push(control_net.into());
        argv.push("--control-strength".into());
        argv.push((&settings.control_strength).into());
    }

    Ok(Invocation {
        argv,
        working_dir: working_dir(&settings.sd_bin),
        output_path: output_path.to_path_buf(),
    })
}
