use crate::error::{GitRelayError, Result};
use std::env;

/// Context information supplied by the host orchestrator for a hook run
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Branch the release run is acting on
    pub branch: String,
    /// Version being released
    pub version: String,
    /// Remote URL of the repository being released
    pub repository_url: String,
    /// Release notes, used as the request body when present
    pub notes: Option<String>,
    /// Dry-run requested on the command line or via environment
    pub dry_run: bool,
}

impl HookContext {
    /// Resolve context from explicit CLI values with GITRELAY_* fallback.
    ///
    /// Branch, version, and repository URL are required; each may come
    /// from its flag or from `GITRELAY_BRANCH`, `GITRELAY_VERSION`,
    /// `GITRELAY_REPOSITORY_URL`. Notes fall back to `GITRELAY_NOTES`.
    pub fn resolve(
        branch: Option<String>,
        version: Option<String>,
        repository_url: Option<String>,
        notes: Option<String>,
        dry_run: bool,
    ) -> Result<HookContext> {
        Ok(HookContext {
            branch: required(branch, "--branch", "GITRELAY_BRANCH", "release branch")?,
            version: required(version, "--version", "GITRELAY_VERSION", "release version")?,
            repository_url: required(
                repository_url,
                "--repository-url",
                "GITRELAY_REPOSITORY_URL",
                "repository URL",
            )?,
            notes: optional(notes, "GITRELAY_NOTES"),
            dry_run: dry_run || env_flag("GITRELAY_DRY_RUN"),
        })
    }
}

fn required(explicit: Option<String>, flag: &str, var: &str, what: &str) -> Result<String> {
    optional(explicit, var).ok_or_else(|| {
        GitRelayError::context(format!("missing {}: pass {} or set {}", what, flag, var))
    })
}

fn optional(explicit: Option<String>, var: &str) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

fn env_flag(var: &str) -> bool {
    matches!(
        env::var(var).unwrap_or_default().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
