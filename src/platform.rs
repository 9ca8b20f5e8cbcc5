use std::env;
use std::fmt;

/// Hosting platforms with a known pull/merge request API layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    GitLab,
    Bitbucket,
}

impl Platform {
    /// Parse a platform identifier (case-insensitive)
    pub fn parse(s: &str) -> Option<Platform> {
        match s.to_lowercase().as_str() {
            "github" => Some(Platform::GitHub),
            "gitlab" => Some(Platform::GitLab),
            "bitbucket" => Some(Platform::Bitbucket),
            _ => None,
        }
    }

    /// Default API base URL for the platform's hosted offering
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Platform::GitHub => "https://api.github.com",
            Platform::GitLab => "https://gitlab.com",
            Platform::Bitbucket => "https://api.bitbucket.org",
        }
    }

    /// Default path prefix inserted between the base URL and API routes
    pub fn default_api_path_prefix(&self) -> &'static str {
        match self {
            Platform::GitHub => "",
            Platform::GitLab => "/api/v4",
            Platform::Bitbucket => "/2.0",
        }
    }

    /// Environment variables that carry this platform's credential token,
    /// in lookup order
    pub fn token_vars(&self) -> [&'static str; 2] {
        match self {
            Platform::GitHub => ["GH_TOKEN", "GITHUB_TOKEN"],
            Platform::GitLab => ["GL_TOKEN", "GITLAB_TOKEN"],
            Platform::Bitbucket => ["BB_TOKEN", "BITBUCKET_TOKEN"],
        }
    }

    /// Read the platform's credential token from the environment
    pub fn token_from_env(&self) -> Option<String> {
        self.token_vars()
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
    }

    /// Base URL override variable honored for this platform, if any
    pub fn base_url_var(&self) -> Option<&'static str> {
        match self {
            Platform::GitHub => Some("GITHUB_API_URL"),
            Platform::GitLab => Some("CI_SERVER_URL"),
            Platform::Bitbucket => None,
        }
    }

    /// Infer the platform from CI environment signals
    pub fn from_ci_env() -> Option<Platform> {
        if env::var("GITHUB_ACTIONS").is_ok() {
            Some(Platform::GitHub)
        } else if env::var("GITLAB_CI").is_ok() {
            Some(Platform::GitLab)
        } else if env::var("BITBUCKET_BUILD_NUMBER").is_ok() {
            Some(Platform::Bitbucket)
        } else {
            None
        }
    }

    /// Infer the platform from which token variable is set
    pub fn from_token_env() -> Option<Platform> {
        [Platform::GitHub, Platform::GitLab, Platform::Bitbucket]
            .into_iter()
            .find(|p| p.token_from_env().is_some())
    }

    /// Resolve the platform: CI signals first, then token variables,
    /// then the GitHub default
    pub fn from_env() -> Platform {
        Platform::from_ci_env()
            .or_else(Platform::from_token_env)
            .unwrap_or(Platform::GitHub)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
            Platform::Bitbucket => "bitbucket",
        };
        write!(f, "{}", name)
    }
}
