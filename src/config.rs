use crate::error::{GitRelayError, Result};
use crate::platform::Platform;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Represents the complete configuration for git-relay.
///
/// Holds the raw values as read from a TOML file; platform, URL, and token
/// defaults are merged in from the environment by [`Config::resolve`].
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Hosting platform identifier: github, gitlab, or bitbucket
    #[serde(default)]
    pub platform: Option<String>,

    /// Base URL of the platform API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path prefix inserted between the base URL and API routes
    #[serde(default)]
    pub api_path_prefix: Option<String>,

    /// Credential token for the platform API and https pushes
    #[serde(default)]
    pub token: Option<String>,

    /// Glob patterns of release artifacts committed to the asset branch
    #[serde(default)]
    pub assets: Vec<String>,

    /// Template for the asset branch name
    #[serde(default = "default_asset_branch")]
    pub asset_branch: String,

    /// Template for the asset commit message
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Template for pull/merge request titles
    #[serde(default = "default_title")]
    pub title: String,

    /// Name of the git remote operated on
    #[serde(default = "default_remote")]
    pub remote: String,

    /// When true, no branch is pushed and no request is created
    #[serde(default)]
    pub dry_run: bool,

    /// Branch-pair rules for fan-out requests after a release
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A (from-pattern, to-pattern) rule describing which branch pairs receive
/// a fan-out request.
///
/// Both patterns are regular expressions matched against the entire branch
/// name: when `from` matches the released branch, a request is opened to
/// every remote branch matching `to`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Candidate {
    pub from: String,
    pub to: String,
}

/// Returns the default asset branch name template.
fn default_asset_branch() -> String {
    "release-assets/v{version}".to_string()
}

/// Returns the default asset commit message template.
fn default_commit_message() -> String {
    "chore(release): {version} [skip ci]".to_string()
}

/// Returns the default request title template.
fn default_title() -> String {
    "Release {version}".to_string()
}

/// Returns the default remote name.
fn default_remote() -> String {
    "origin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: None,
            base_url: None,
            api_path_prefix: None,
            token: None,
            assets: Vec::new(),
            asset_branch: default_asset_branch(),
            commit_message: default_commit_message(),
            title: default_title(),
            remote: default_remote(),
            dry_run: false,
            candidates: Vec::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelay.toml` in current directory
/// 3. `.gitrelay.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelay.toml").exists() {
        fs::read_to_string("./gitrelay.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelay.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GitRelayError::config(format!("invalid configuration file: {}", e)))?;
    Ok(config)
}

/// A candidate rule with its patterns compiled for whole-name matching
#[derive(Debug, Clone)]
pub struct CandidateRule {
    pub from: Regex,
    pub to: Regex,
}

/// Configuration after environment defaulting and validation.
///
/// Every field is normalized and usable as-is; construction fails with a
/// single aggregated error listing every violated constraint.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub platform: Platform,
    pub base_url: String,
    pub api_path_prefix: String,
    pub token: Option<String>,
    pub assets: Vec<String>,
    pub asset_branch: String,
    pub commit_message: String,
    pub title: String,
    pub remote: String,
    pub dry_run: bool,
    pub candidates: Vec<CandidateRule>,
}

impl Config {
    /// Merge environment-derived defaults into the raw configuration and
    /// validate every field.
    ///
    /// Platform resolution order: explicit `platform` key, CI signals
    /// (`GITHUB_ACTIONS`, `GITLAB_CI`, `BITBUCKET_BUILD_NUMBER`), token
    /// variables, then github. Base URL and API path prefix fall back to
    /// the platform's environment override and built-in defaults. All
    /// violations are collected and reported together; nothing is mutated
    /// before this succeeds.
    pub fn resolve(&self, cli_dry_run: bool) -> Result<ResolvedConfig> {
        let mut problems = Vec::new();
        let dry_run = self.dry_run || cli_dry_run;

        let platform = match &self.platform {
            Some(raw) => match Platform::parse(raw) {
                Some(p) => Some(p),
                None => {
                    problems.push(format!(
                        "unknown platform '{}': expected github, gitlab, or bitbucket",
                        raw
                    ));
                    None
                }
            },
            None => Some(Platform::from_env()),
        };

        let base_url = self
            .base_url
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                platform
                    .and_then(|p| p.base_url_var())
                    .and_then(|var| env::var(var).ok())
                    .filter(|v| !v.trim().is_empty())
            })
            .or_else(|| platform.map(|p| p.default_base_url().to_string()))
            .unwrap_or_default();
        if !base_url.is_empty()
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            problems.push(format!(
                "base_url '{}' must start with http:// or https://",
                base_url
            ));
        }

        let api_path_prefix = self
            .api_path_prefix
            .clone()
            .or_else(|| platform.map(|p| p.default_api_path_prefix().to_string()))
            .unwrap_or_default();

        let token = self
            .token
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| platform.and_then(|p| p.token_from_env()));
        if token.is_none() && !dry_run {
            problems.push(
                "no credential token configured: set token or a platform token \
                 variable such as GITHUB_TOKEN, GITLAB_TOKEN, or BITBUCKET_TOKEN"
                    .to_string(),
            );
        }

        if self.commit_message.trim().is_empty() {
            problems.push("commit_message template must not be empty".to_string());
        }
        if self.title.trim().is_empty() {
            problems.push("title template must not be empty".to_string());
        }
        if self.asset_branch.trim().is_empty() {
            problems.push("asset_branch template must not be empty".to_string());
        }
        if self.remote.trim().is_empty() {
            problems.push("remote must not be empty".to_string());
        }

        for pattern in &self.assets {
            if let Err(e) = glob::Pattern::new(pattern) {
                problems.push(format!(
                    "assets pattern '{}' is not a valid glob: {}",
                    pattern, e
                ));
            }
        }

        let mut candidates = Vec::new();
        for (index, candidate) in self.candidates.iter().enumerate() {
            let from = compile_anchored(&candidate.from).map_err(|e| {
                problems.push(format!(
                    "candidates[{}].from: invalid pattern '{}': {}",
                    index, candidate.from, e
                ))
            });
            let to = compile_anchored(&candidate.to).map_err(|e| {
                problems.push(format!(
                    "candidates[{}].to: invalid pattern '{}': {}",
                    index, candidate.to, e
                ))
            });
            if let (Ok(from), Ok(to)) = (from, to) {
                candidates.push(CandidateRule { from, to });
            }
        }

        if !problems.is_empty() {
            return Err(aggregate(problems));
        }

        Ok(ResolvedConfig {
            // problems is empty here, so platform parsing succeeded
            platform: platform.unwrap_or(Platform::GitHub),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_path_prefix: normalize_prefix(&api_path_prefix),
            token,
            assets: self.assets.clone(),
            asset_branch: self.asset_branch.clone(),
            commit_message: self.commit_message.clone(),
            title: self.title.clone(),
            remote: self.remote.clone(),
            dry_run,
            candidates,
        })
    }
}

/// Compile a candidate pattern so it must match the entire branch name
fn compile_anchored(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    // Compile the raw pattern first so error messages show the user's input
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Normalize a path prefix: empty stays empty, otherwise one leading and
/// no trailing slash
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn aggregate(mut problems: Vec<String>) -> GitRelayError {
    if problems.len() == 1 {
        GitRelayError::config(problems.remove(0))
    } else {
        GitRelayError::config(format!(
            "{} problems found:\n  - {}",
            problems.len(),
            problems.join("\n  - ")
        ))
    }
}
