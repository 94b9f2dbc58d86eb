//! Runner output normalization
//!
//! The runner prints one header per hook, `<name>.....<marker>`, where the
//! marker is `Passed`, `Failed` or `Skipped` (optionally preceded by a
//! parenthesised note such as `(no files to check)`). A failed header opens a
//! block of detail lines that runs until the next header:
//!
//! ```text
//! Check Yaml...............................................................Failed
//! - hook id: check-yaml
//! - exit code: 1
//!
//! while parsing a block mapping
//! ```
//!
//! Each line is first classified into a [`LineKind`], then fed to a two-state
//! machine (`AwaitingHeader`, `InDetailBlock`).
//! Output with no recognizable headers yields an empty result, never an error.

use super::{FailureGroup, HookResult, HookStatus, ModifiedFileSet, Summary};
use crate::config::ReportConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref ANSI_ESCAPE: Regex =
        Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid ANSI pattern");
    static ref HOOK_HEADER: Regex = Regex::new(
        r"^(?P<name>\S.*?)\.+(?:\([^)]*\))?(?P<status>Passed|Failed|Skipped)$"
    )
    .expect("valid header pattern");
    static ref MODIFIED_PATH: Regex =
        Regex::new(r"^(?:Fixing|reformatted) (?P<path>\S.*)$").expect("valid path pattern");
}

const HOOK_ID_PREFIX: &str = "- hook id:";
const FILES_MODIFIED: &str = "- files were modified by this hook";
const METADATA_PREFIXES: &[&str] = &["- exit code:", "- duration:"];
const NOTICE_PREFIXES: &[&str] = &["[WARNING]", "[INFO]"];

/// Remove ANSI escape sequences
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Cap `text` at `max_chars` characters, marking what was dropped
pub fn truncate_detail(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}\n… [truncated {} chars]", total - max_chars)
}

/// What a single output line means in the runner's grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `<name>....<marker>`
    Header { name: &'a str, status: HookStatus },
    /// `- hook id: <id>`
    HookId(&'a str),
    /// `- files were modified by this hook`
    FilesModified,
    /// `- exit code: N`, `- duration: Ns`
    Metadata,
    /// Runner notices (`[INFO]`, `[WARNING]`)
    Notice(&'a str),
    Blank,
    Text(&'a str),
}

impl<'a> LineKind<'a> {
    pub fn of(line: &'a str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Self::Blank;
        }

        if let Some(caps) = HOOK_HEADER.captures(trimmed) {
            let status = match &caps["status"] {
                "Passed" => HookStatus::Passed,
                "Failed" => HookStatus::Failed,
                _ => HookStatus::Skipped,
            };
            if let Some(name) = caps.name("name") {
                return Self::Header {
                    name: name.as_str().trim(),
                    status,
                };
            }
        }

        if let Some(id) = trimmed.strip_prefix(HOOK_ID_PREFIX) {
            return Self::HookId(id.trim());
        }

        if trimmed == FILES_MODIFIED {
            return Self::FilesModified;
        }

        if METADATA_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return Self::Metadata;
        }

        if NOTICE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return Self::Notice(trimmed);
        }

        Self::Text(line.trim_end())
    }
}

/// A failed hook whose detail block is still being read
#[derive(Debug)]
struct OpenFailure {
    hook_id: String,
    lines: Vec<String>,
    modifies_files: bool,
}

impl OpenFailure {
    fn new(name: &str) -> Self {
        Self {
            hook_id: name.to_string(),
            lines: Vec::new(),
            modifies_files: false,
        }
    }

    fn absorb(&mut self, kind: LineKind<'_>, modified_files: &mut ModifiedFileSet) {
        match kind {
            LineKind::HookId(id) if !id.is_empty() => self.hook_id = id.to_string(),
            LineKind::FilesModified => self.modifies_files = true,
            LineKind::Text(text) => {
                if self.modifies_files {
                    if let Some(caps) = MODIFIED_PATH.captures(text.trim()) {
                        modified_files.insert(caps["path"].trim());
                    }
                }
                self.lines.push(text.to_string());
            }
            LineKind::Blank => self.lines.push(String::new()),
            _ => {}
        }
    }

    fn finish(self, max_detail_chars: usize) -> HookResult {
        let joined = self.lines.join("\n");
        let detail = joined.trim_matches('\n');
        let detail = (!detail.is_empty()).then(|| truncate_detail(detail, max_detail_chars));

        HookResult::failed(self.hook_id, detail)
    }
}

#[derive(Debug)]
enum ParseState {
    AwaitingHeader,
    InDetailBlock(OpenFailure),
}

/// Structured view of one run's output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub summary: Summary,
    pub failures: FailureGroup,
    pub modified_files: ModifiedFileSet,
    pub warnings: Vec<String>,
}

/// Turns captured runner text into [`Normalized`] results
#[derive(Debug, Clone)]
pub struct Normalizer {
    max_detail_chars: usize,
    max_warnings: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl Normalizer {
    pub fn new(max_detail_chars: usize, max_warnings: usize) -> Self {
        Self {
            max_detail_chars,
            max_warnings,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.max_detail_chars, config.max_warnings)
    }

    pub fn normalize(&self, output: &str) -> Normalized {
        let clean = strip_ansi(output);
        let mut result = Normalized::default();
        let mut state = ParseState::AwaitingHeader;

        for line in clean.lines() {
            let kind = LineKind::of(line);

            state = match (state, kind) {
                (previous, LineKind::Header { name, status }) => {
                    self.close(previous, &mut result);
                    result.summary.record(status);
                    match status {
                        HookStatus::Failed => ParseState::InDetailBlock(OpenFailure::new(name)),
                        HookStatus::Passed | HookStatus::Skipped => ParseState::AwaitingHeader,
                    }
                }
                (current, LineKind::Notice(text)) => {
                    if result.warnings.len() < self.max_warnings {
                        result.warnings.push(text.to_string());
                    }
                    current
                }
                (ParseState::AwaitingHeader, _) => ParseState::AwaitingHeader,
                (ParseState::InDetailBlock(mut open), kind) => {
                    open.absorb(kind, &mut result.modified_files);
                    ParseState::InDetailBlock(open)
                }
            };
        }

        self.close(state, &mut result);
        result
    }

    fn close(&self, state: ParseState, result: &mut Normalized) {
        if let ParseState::InDetailBlock(open) = state {
            result.failures.push(open.finish(self.max_detail_chars));
        }
    }
}
