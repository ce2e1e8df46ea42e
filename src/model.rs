use serde::{Serialize, Serializer};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Host platform, selecting which INI section overrides `DEFAULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Win32,
    Osx,
    Linux,
}

impl Platform {
    /// Platform of the running host. Anything that is neither Windows nor macOS is `Linux`.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Win32
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    pub fn section_name(self) -> &'static str {
        match self {
            Platform::Win32 => "WIN32",
            Platform::Osx => "OSX",
            Platform::Linux => "LINUX",
        }
    }
}

/// Every setting the launcher knows about, after resolution against the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: String,
    pub height: String,
    pub width: String,
    pub cfg_scale: String,
    pub strength: String,
    pub control_strength: String,
    pub sampling_method: String,
    pub steps: String,
    pub seed: String,
    pub clip_skip: String,
    pub sd_bin: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub model: Option<String>,
    pub lora_dir: Option<String>,
    pub upscale_model: Option<String>,
    pub vae: Option<String>,
    pub control_net: Option<String>,
    pub batch_count: Option<String>,
}

/// A fully built command line for the `sd` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// argv, with the absolute binary path first.
    #[serde(serialize_with = "serialize_lossy")]
    pub argv: Vec<OsString>,
    /// Working directory for the child; `None` inherits ours.
    pub working_dir: Option<PathBuf>,
    /// Where the child is asked to write the image.
    pub output_path: PathBuf,
}

impl Invocation {
    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }
}

/// JSON output is text; non-UTF-8 bytes become U+FFFD there and only there.
fn serialize_lossy<S: Serializer>(argv: &[OsString], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(argv.iter().map(|a| a.to_string_lossy()))
}
