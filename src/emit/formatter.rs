// SPDX-License-Identifier: PMPL-1.0-or-later

//! External source formatter invocation (`v -w fmt <dir>` by default)
//!
//! Formatting is best-effort: the generated modules are already on disk and
//! stay valid whatever the formatter does.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// What happened when the formatter was run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatterOutcome {
    Formatted,
    /// No formatter configured, or the executable is not installed
    Skipped { reason: String },
    /// The formatter ran and reported a problem
    Failed { code: Option<i32>, stderr: String },
}

impl FormatterOutcome {
    pub fn is_formatted(&self) -> bool {
        matches!(self, FormatterOutcome::Formatted)
    }
}

/// Run `command` with `dir` appended as the final argument.
pub fn run_formatter(command: &[String], dir: &Path) -> FormatterOutcome {
    let Some((program, args)) = command.split_first() else {
        return FormatterOutcome::Skipped {
            reason: "no formatter configured".to_string(),
        };
    };

    debug!(%program, ?args, dir = %dir.display(), "running formatter");
    let output = Command::new(program)
        .args(args)
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) if output.status.success() => FormatterOutcome::Formatted,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(%program, code = ?output.status.code(), %stderr, "formatter failed");
            FormatterOutcome::Failed {
                code: output.status.code(),
                stderr,
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(%program, "formatter not installed; leaving output unformatted");
            FormatterOutcome::Skipped {
                reason: format!("{program} not found"),
            }
        }
        Err(err) => {
            warn!(%program, error = %err, "could not start formatter");
            FormatterOutcome::Skipped {
                reason: err.to_string(),
            }
        }
    }
}
