//! Terminal output for the one-shot commands
//!
//! Human-facing lines go to stdout, errors to stderr. Nothing here is used by
//! `serve`, whose stdout belongs to the protocol.

use crate::report::{RunOutcome, RunReport};
use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    /// Print a category header
    pub fn category(&self, category: &str) {
        if !self.quiet {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {}", item);
        }
    }

    /// Print an indented block, one line at a time
    pub fn indent(&self, block: &str) {
        if !self.quiet {
            for line in block.lines() {
                println!("    {}", style(line).dim());
            }
        }
    }

    /// Print the status line of a report
    pub fn status_indicator(&self, status: RunOutcome, message: &str) {
        if !self.quiet {
            let label = match status {
                RunOutcome::Success => style(status.as_str()).green(),
                RunOutcome::HooksFailed => style(status.as_str()).red(),
                RunOutcome::SystemError | RunOutcome::Timeout => style(status.as_str()).yellow(),
            };
            let icon = if status == RunOutcome::Success { "✓" } else { "✗" };
            println!("{} {} {}", style(icon).bold(), label.bold(), message);
        }
    }

    /// Render a report for a terminal reader
    pub fn report(&self, report: &RunReport) {
        self.status_indicator(report.status, report.message.as_deref().unwrap_or(""));

        let summary = &report.summary;
        self.key_value("Hooks:", &summary.total_hooks.to_string(), false);
        self.key_value("Passed:", &summary.passed.to_string(), summary.passed > 0);
        self.key_value("Failed:", &summary.failed.to_string(), false);
        self.key_value("Skipped:", &summary.skipped.to_string(), false);
        self.key_value("Time:", &format!("{:.2}s", report.execution_time), false);

        if !report.failures.is_empty() {
            self.category("Failures");
            for hook_id in report.failures.hook_ids() {
                self.list_item(hook_id);
                for result in report.failures.get(hook_id).unwrap_or_default() {
                    if let Some(detail) = &result.detail {
                        self.indent(detail);
                    }
                }
            }
        }

        if !report.modified_files.is_empty() {
            self.category("Modified files");
            for path in report.modified_files.iter() {
                self.list_item(path);
            }
        }

        for warning in &report.warnings {
            self.warning(warning);
        }
    }
}
