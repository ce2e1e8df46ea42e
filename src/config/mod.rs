//! Layered settings lookup.
//!
//! A lookup checks the platform section first, then `DEFAULT`, then the
//! built-in fallback. A missing config file behaves like an empty one.

mod ini;

pub use ini::IniError;
use ini::Ini;

use crate::model::{Platform, Settings};
use anyhow::{Context, Result};
use std::path::Path;

pub struct Config {
    ini: Ini,
    platform: Platform,
}

impl Config {
    /// Load `path`; a file that does not exist yields an empty config.
    pub fn load(path: &Path, platform: Platform) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "config file not found, using built-in defaults");
            return Ok(Self::empty(platform));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_ini_str(&text, platform)
            .with_context(|| format!("parse config {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            section = platform.section_name(),
            has_section = config.ini.has_section(platform.section_name()),
            "loaded config"
        );
        Ok(config)
    }

    pub fn from_ini_str(text: &str, platform: Platform) -> Result<Self, IniError> {
        Ok(Self {
            ini: Ini::parse(text)?,
            platform,
        })
    }

    pub fn empty(platform: Platform) -> Self {
        Self {
            ini: Ini::default(),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Value of `key`, or `None` when neither section defines it.
    pub fn resolve_optional(&self, key: &str) -> Result<Option<String>, IniError> {
        Ok(self
            .ini
            .get(self.platform.section_name(), key)?
            .map(|v| v.trim_matches('"').to_string()))
    }

    /// Value of `key`, or `fallback` when neither section defines it.
    pub fn resolve(&self, key: &str, fallback: &str) -> Result<String, IniError> {
        Ok(self
            .resolve_optional(key)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// Resolve every known setting.
    pub fn settings(&self) -> Result<Settings, IniError> {
        Ok(Settings {
            output_dir: self.resolve("output_dir", "sd_img_out")?,
            height: self.resolve("height", "512")?,
            width: self.resolve("width", "512")?,
            cfg_scale: self.resolve("cfg-scale", "7.0")?,
            strength: self.resolve("strength", "0.9")?,
            control_strength: self.resolve("control-strength", "0.9")?,
            sampling_method: self.resolve("sampling-method", "euler_a")?,
            steps: self.resolve("steps", "30")?,
            seed: self.resolve("seed", "-1")?,
            clip_skip: self.resolve("clip-skip", "-1")?,
            sd_bin: self.resolve("sd_bin", "sd")?,
            prompt: self.resolve("prompt", "cute girl")?,
            negative_prompt: self.resolve("negative-prompt", "")?,
            model: self.resolve_optional("model")?,
            lora_dir: self.resolve_optional("lora_dir")?,
            upscale_model: self.resolve_optional("upscale-model")?,
            vae: self.resolve_optional("vae")?,
            control_net: self.resolve_optional("control-net")?,
            batch_count: self.resolve_optional("batch-count")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERED: &str = "\
[DEFAULT]
steps = 30
prompt = \"a red fox\"
model = /models/base.ckpt

[WIN32]
steps = 10

[OSX]
steps = 20

[LINUX]
steps = 40
vae = /models/vae.pt
";

    #[test]
    fn platform_section_overrides_default() {
        for (platform, expected) in [
            (Platform::Win32, "10"),
            (Platform::Osx, "20"),
            (Platform::Linux, "40"),
        ] {
            let cfg = Config::from_ini_str(LAYERED, platform).unwrap();
            assert_eq!(cfg.resolve("steps", "30").unwrap(), expected);
        }
    }

    #[test]
    fn default_section_used_when_platform_lacks_key() {
        let cfg = Config::from_ini_str(LAYERED, Platform::Osx).unwrap();
        assert_eq!(
            cfg.resolve_optional("model").unwrap().as_deref(),
            Some("/models/base.ckpt")
        );
        assert_eq!(cfg.resolve_optional("vae").unwrap(), None);
    }

    #[test]
    fn default_section_used_without_platform_section() {
        let cfg = Config::from_ini_str("[DEFAULT]\nseed = 7\n", Platform::Linux).unwrap();
        assert_eq!(cfg.resolve("seed", "-1").unwrap(), "7");
    }

    #[test]
    fn fallbacks_when_key_absent_everywhere() {
        let cfg = Config::from_ini_str(LAYERED, Platform::Win32).unwrap();
        let s = cfg.settings().unwrap();
        assert_eq!(s.height, "512");
        assert_eq!(s.width, "512");
        assert_eq!(s.cfg_scale, "7.0");
        assert_eq!(s.strength, "0.9");
        assert_eq!(s.control_strength, "0.9");
        assert_eq!(s.sampling_method, "euler_a");
        assert_eq!(s.seed, "-1");
        assert_eq!(s.clip_skip, "-1");
        assert_eq!(s.sd_bin, "sd");
        assert_eq!(s.negative_prompt, "");
        assert_eq!(s.output_dir, "sd_img_out");
        assert_eq!(s.lora_dir, None);
        assert_eq!(s.upscale_model, None);
        assert_eq!(s.control_net, None);
        assert_eq!(s.batch_count, None);
    }

    #[test]
    fn empty_config_returns_only_fallbacks() {
        let cfg = Config::empty(Platform::Linux);
        let s = cfg.settings().unwrap();
        assert_eq!(s.prompt, "cute girl");
        assert_eq!(s.steps, "30");
        assert_eq!(s.model, None);
        assert_eq!(s.vae, None);
    }

    #[test]
    fn surrounding_quotes_are_stripped_only() {
        let text = "[DEFAULT]\nprompt = \"a \"quoted\" word\"\nvae = \"\"\nsd_bin = '/opt/sd'\n";
        let cfg = Config::from_ini_str(text, Platform::Linux).unwrap();
        assert_eq!(cfg.resolve("prompt", "").unwrap(), "a \"quoted\" word");
        assert_eq!(cfg.resolve_optional("vae").unwrap().as_deref(), Some(""));
        assert_eq!(cfg.resolve("sd_bin", "sd").unwrap(), "'/opt/sd'");
        let layered = Config::from_ini_str(LAYERED, Platform::Linux).unwrap();
        assert_eq!(layered.resolve("prompt", "").unwrap(), "a red fox");
    }

    #[test]
    fn annotated_platform_header_still_applies() {
        let cfg = Config::from_ini_str("[LINUX] ; paths\nmodel = /m\n", Platform::Linux).unwrap();
        assert_eq!(cfg.resolve_optional("model").unwrap().as_deref(), Some("/m"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.ini"), Platform::Osx).unwrap();
        assert_eq!(cfg.platform(), Platform::Osx);
        assert_eq!(cfg.resolve("height", "512").unwrap(), "512");
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ini");
        std::fs::write(&path, "seed = 1\n").unwrap();
        let err = Config::load(&path, Platform::Linux).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("broken.ini"), "{msg}");
        assert!(msg.contains("before any section header"), "{msg}");
    }
}
