//! Outcome classification
//!
//! First match wins: timeout, runner infrastructure error, clean exit, hook
//! failure. A killed process has no trustworthy exit code, so the timeout
//! check always comes first.

use super::parse::{LineKind, strip_ansi};
use super::RunOutcome;
use crate::runner::RawRunResult;

/// Line prefixes the runner prints for its own failures (bad config, crash),
/// as opposed to a hook failing
const CRASH_SIGNATURES: &[&str] = &[
    "An unexpected error has occurred:",
    "An error has occurred:",
    "[ERROR]",
];

/// Exit code the runner uses when one or more hooks failed
const HOOKS_FAILED_EXIT_CODE: i32 = 1;

pub fn classify(raw: &RawRunResult) -> RunOutcome {
    if raw.timed_out {
        return RunOutcome::Timeout;
    }

    if crash_signature(&raw.combined_output).is_some() {
        return RunOutcome::SystemError;
    }

    match raw.exit_code {
        Some(0) => RunOutcome::Success,
        Some(HOOKS_FAILED_EXIT_CODE) => RunOutcome::HooksFailed,
        // Fatal-error and interrupt codes, or killed from outside
        Some(_) | None => RunOutcome::SystemError,
    }
}

/// First line of `output` that carries a runner crash signature
///
/// Only lines before the first hook header are searched. Everything after a
/// header belongs to that hook's section (verbose output of passing hooks
/// included), and a runner crash past that point still shows up as an
/// unexpected exit code.
pub fn crash_signature(output: &str) -> Option<String> {
    let clean = strip_ansi(output);

    for line in clean.lines() {
        if matches!(LineKind::of(line), LineKind::Header { .. }) {
            return None;
        }

        let line = line.trim();
        if CRASH_SIGNATURES.iter().any(|sig| line.starts_with(sig)) {
            return Some(line.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn raw(exit_code: Option<i32>, output: &str, timed_out: bool) -> RawRunResult {
        RawRunResult {
            exit_code,
            combined_output: output.to_string(),
            timed_out,
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_timeout_wins_over_exit_code() {
        assert_eq!(classify(&raw(Some(0), "", true)), RunOutcome::Timeout);
        assert_eq!(classify(&raw(None, "", true)), RunOutcome::Timeout);
        assert_eq!(
            classify(&raw(Some(1), "An unexpected error has occurred: x", true)),
            RunOutcome::Timeout
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(classify(&raw(Some(0), "", false)), RunOutcome::Success);
        assert_eq!(classify(&raw(Some(1), "", false)), RunOutcome::HooksFailed);
        assert_eq!(classify(&raw(Some(3), "", false)), RunOutcome::SystemError);
        assert_eq!(classify(&raw(Some(130), "", false)), RunOutcome::SystemError);
        assert_eq!(classify(&raw(None, "", false)), RunOutcome::SystemError);
    }

    #[test]
    fn test_crash_signatures() {
        let invalid_config = "An error has occurred: InvalidConfigError: \n==> File .pre-commit-config.yaml";
        assert_eq!(
            classify(&raw(Some(1), invalid_config, false)),
            RunOutcome::SystemError
        );

        let unstaged = "[ERROR] Your pre-commit configuration is unstaged.";
        assert_eq!(classify(&raw(Some(1), unstaged, false)), RunOutcome::SystemError);

        let colored = "\x1b[41m[ERROR]\x1b[m Cowardly refusing to install hooks";
        assert_eq!(classify(&raw(Some(1), colored, false)), RunOutcome::SystemError);
    }

    #[test]
    fn test_hook_output_mentioning_errors_is_not_a_crash() {
        let output = "flake8...................................................................Failed\n\
                      - hook id: flake8\n\
                      - exit code: 1\n\
                      \n\
                      app.py:1:1: E999 SyntaxError: An error has occurred: in user code";
        assert_eq!(classify(&raw(Some(1), output, false)), RunOutcome::HooksFailed);

        let hadolint = "Lint Dockerfiles........................................................Failed\n\
                        - hook id: hadolint\n\
                        \n\
                        [ERROR] Dockerfile:3 DL3008 Pin versions in apt get install";
        assert_eq!(classify(&raw(Some(1), hadolint, false)), RunOutcome::HooksFailed);
    }

    #[test]
    fn test_verbose_passing_hook_output_is_not_a_crash() {
        let output = "Lint Dockerfiles........................................................Passed\n\
                      - hook id: hadolint\n\
                      - duration: 0.4s\n\
                      \n\
                      [ERROR] Dockerfile:3 DL3008 Pin versions in apt get install";
        assert_eq!(classify(&raw(Some(0), output, false)), RunOutcome::Success);
        assert_eq!(crash_signature(output), None);
    }

    #[test]
    fn test_crash_after_hooks_falls_back_to_exit_code() {
        let output = "ruff....Passed\nAn unexpected error has occurred: KeyboardInterrupt";
        assert_eq!(crash_signature(output), None);
        assert_eq!(classify(&raw(Some(3), output, false)), RunOutcome::SystemError);
    }

    #[test]
    fn test_classification_is_pure() {
        let sample = raw(Some(1), "ruff....Failed", false);
        let first = classify(&sample);
        for _ in 0..5 {
            assert_eq!(classify(&sample), first);
        }
    }

    #[test]
    fn test_crash_signature_returns_clean_line() {
        let output = "[INFO] Installing environment for https://github.com/psf/black.\n\x1b[31mAn unexpected error has occurred: CalledProcessError\x1b[0m";
        assert_eq!(
            crash_signature(output).as_deref(),
            Some("An unexpected error has occurred: CalledProcessError")
        );
        assert_eq!(crash_signature("all good"), None);
    }
}
