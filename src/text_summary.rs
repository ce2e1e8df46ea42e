//! Text summary builder for dry-run output.
//!
//! Renders a planned invocation as human-readable lines, quoting arguments
//! that would not survive being pasted into a shell as-is.

use crate::model::Invocation;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && !arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '`'));
    if plain {
        arg.to_string()
    } else {
        format!("{arg:?}")
    }
}

/// Single-line, shell-style rendering of the argument vector.
pub(crate) fn command_line(invocation: &Invocation) -> String {
    invocation
        .argv
        .iter()
        .map(|a| quote(&a.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn build_text_summary(invocation: &Invocation) -> TextSummary {
    let working_dir = invocation
        .working_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(inherited)".to_string());
    TextSummary {
        lines: vec![
            format!("Command: {}", command_line(invocation)),
            format!("Working directory: {working_dir}"),
            format!("Output: {}", invocation.output_path.display()),
        ],
    }
}
