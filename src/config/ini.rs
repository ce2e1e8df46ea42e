//! Minimal INI reader.
//!
//! Supports `[SECTION]` headers (text after the closing `]` is ignored), `key = value` / `key: value` pairs, full-line
//! `#`/`;` comments, indented continuation lines and `%(name)s` interpolation.
//! Keys are case-insensitive; section names are not. Keys in `DEFAULT` are
//! visible through every other section.

use std::collections::HashMap;

pub const DEFAULT_SECTION: &str = "DEFAULT";

const MAX_INTERPOLATION_DEPTH: usize = 10;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IniError {
    #[error("line {line}: key/value pair before any section header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: expected `key = value`, got {text:?}")]
    Syntax { line: usize, text: String },

    #[error("line {line}: section [{section}] already exists")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: option '{key}' in section [{section}] already exists")]
    DuplicateOption {
        line: usize,
        section: String,
        key: String,
    },

    #[error("bad interpolation syntax in '{key}' of [{section}]: {rest:?}")]
    InterpolationSyntax {
        section: String,
        key: String,
        rest: String,
    },

    #[error("'{key}' in [{section}] references missing option '{reference}'")]
    InterpolationMissing {
        section: String,
        key: String,
        reference: String,
    },

    #[error("'{key}' in [{section}] nests interpolation too deeply")]
    InterpolationDepth { section: String, key: String },
}

/// Parsed INI document, values stored raw (not yet interpolated).
#[derive(Debug, Clone, Default)]
pub struct Ini {
    sections: HashMap<String, HashMap<String, String>>,
}

/// Value being accumulated across continuation lines.
struct Pending {
    section: String,
    key: String,
    indent: usize,
    lines: Vec<String>,
    blank_run: usize,
}

impl Pending {
    fn finish(mut self) -> (String, String, String) {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        (self.section, self.key, self.lines.join("\n"))
    }
}

impl Ini {
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut ini = Ini::default();
        let mut current: Option<String> = None;
        let mut pending: Option<Pending> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();
            let indent = raw.len() - raw.trim_start().len();

            if trimmed.is_empty() {
                if let Some(p) = pending.as_mut() {
                    p.blank_run += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(p) = pending.as_mut() {
                if indent > p.indent {
                    for _ in 0..p.blank_run {
                        p.lines.push(String::new());
                    }
                    p.blank_run = 0;
                    p.lines.push(trimmed.to_string());
                    continue;
                }
            }
            if let Some(p) = pending.take() {
                ini.insert(p.finish());
            }

            // Header runs to the last `]`; anything after it is ignored.
            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.rfind(']').map(|end| &rest[..end]))
                .filter(|name| !name.is_empty())
            {
                let name = name.to_string();
                if name == DEFAULT_SECTION {
                    // DEFAULT may be reopened; its keys merge.
                    ini.sections.entry(name.clone()).or_default();
                } else if ini.sections.contains_key(&name) {
                    return Err(IniError::DuplicateSection {
                        line: line_no,
                        section: name,
                    });
                } else {
                    ini.sections.insert(name.clone(), HashMap::new());
                }
                current = Some(name);
                continue;
            }

            let Some(section) = current.clone() else {
                return Err(IniError::MissingSectionHeader { line: line_no });
            };
            let Some(pos) = trimmed.find(['=', ':']) else {
                return Err(IniError::Syntax {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            };
            let key = trimmed[..pos].trim().to_lowercase();
            if key.is_empty() {
                return Err(IniError::Syntax {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            }
            let value = trimmed[pos + 1..].trim().to_string();
            if ini
                .sections
                .get(&section)
                .is_some_and(|s| s.contains_key(&key))
            {
                return Err(IniError::DuplicateOption {
                    line: line_no,
                    section,
                    key,
                });
            }
            // Reserve the key now so a later duplicate in the same section is caught.
            ini.sections
                .entry(section.clone())
                .or_default()
                .insert(key.clone(), String::new());
            pending = Some(Pending {
                section,
                key,
                indent,
                lines: vec![value],
                blank_run: 0,
            });
        }

        if let Some(p) = pending.take() {
            ini.insert(p.finish());
        }
        Ok(ini)
    }

    fn insert(&mut self, (section, key, value): (String, String, String)) {
        self.sections.entry(section).or_default().insert(key, value);
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Raw value of `key` in `section`, falling back to `DEFAULT`.
    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .or_else(|| self.sections.get(DEFAULT_SECTION).and_then(|s| s.get(key)))
            .map(String::as_str)
    }

    /// Interpolated value of `key` as seen from `section`.
    ///
    /// `Ok(None)` when neither `section` nor `DEFAULT` defines the key. The
    /// section itself does not have to exist.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<String>, IniError> {
        let key = key.to_lowercase();
        match self.raw(section, &key) {
            Some(raw) => self.interpolate(section, &key, raw, 1).map(Some),
            None => Ok(None),
        }
    }

    fn interpolate(
        &self,
        section: &str,
        key: &str,
        raw: &str,
        depth: usize,
    ) -> Result<String, IniError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(IniError::InterpolationDepth {
                section: section.to_string(),
                key: key.to_string(),
            });
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            if let Some(after) = rest.strip_prefix("%%") {
                out.push('%');
                rest = after;
                continue;
            }
            let reference = rest
                .strip_prefix("%(")
                .and_then(|r| r.find(")s").map(|end| (&r[..end], &r[end + 2..])));
            let Some((name, after)) = reference else {
                return Err(IniError::InterpolationSyntax {
                    section: section.to_string(),
                    key: key.to_string(),
                    rest: rest.to_string(),
                });
            };
            let name = name.to_lowercase();
            let Some(value) = self.raw(section, &name) else {
                return Err(IniError::InterpolationMissing {
                    section: section.to_string(),
                    key: key.to_string(),
                    reference: name,
                });
            };
            out.push_str(&self.interpolate(section, &name, value, depth + 1)?);
            rest = after;
        }
        out.push_str(rest);
        Ok(out)
    }
}
