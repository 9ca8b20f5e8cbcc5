// tests/config_test.rs
use git_relay::config::{load_config, Config};
use git_relay::platform::Platform;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

/// Remove every environment variable the configuration resolver consults,
/// so each test starts from a known-clean environment.
fn scrub_env() {
    for var in [
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "BITBUCKET_BUILD_NUMBER",
        "GH_TOKEN",
        "GITHUB_TOKEN",
        "GL_TOKEN",
        "GITLAB_TOKEN",
        "BB_TOKEN",
        "BITBUCKET_TOKEN",
        "GITHUB_API_URL",
        "CI_SERVER_URL",
    ] {
        env::remove_var(var);
    }
}

#[test]
fn test_load_explicit_missing_path_fails() {
    let config = load_config(Some("/nonexistent/path/gitrelay.toml"));
    assert!(config.is_err(), "explicit missing path should fail");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
platform = "gitlab"
base_url = "https://git.example.com"
assets = ["dist/*.tar.gz", "CHANGELOG.md"]
commit_message = "release: {version}"

[[candidates]]
from = "main"
to = "develop"

[[candidates]]
from = "release/.*"
to = "hotfix/.*"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.platform.as_deref(), Some("gitlab"));
    assert_eq!(config.base_url.as_deref(), Some("https://git.example.com"));
    assert_eq!(config.assets, vec!["dist/*.tar.gz", "CHANGELOG.md"]);
    assert_eq!(config.commit_message, "release: {version}");
    assert_eq!(config.candidates.len(), 2);
    assert_eq!(config.candidates[0].from, "main");
    assert_eq!(config.candidates[1].to, "hotfix/.*");

    // Unset fields keep their defaults
    assert_eq!(config.title, "Release {version}");
    assert_eq!(config.remote, "origin");
}

#[test]
fn test_load_rejects_invalid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"platform = [not toml").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("invalid configuration file"));
}

#[test]
#[serial]
fn test_resolve_infers_github_from_actions_env() {
    scrub_env();
    env::set_var("GITHUB_ACTIONS", "true");
    env::set_var("GITHUB_TOKEN", "gh-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::GitHub);
    assert_eq!(resolved.base_url, "https://api.github.com");
    assert_eq!(resolved.api_path_prefix, "");
    assert_eq!(resolved.token.as_deref(), Some("gh-secret"));

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_infers_gitlab_from_ci_env_with_server_url() {
    scrub_env();
    env::set_var("GITLAB_CI", "true");
    env::set_var("CI_SERVER_URL", "https://git.internal.example.com");
    env::set_var("GL_TOKEN", "gl-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::GitLab);
    assert_eq!(resolved.base_url, "https://git.internal.example.com");
    assert_eq!(resolved.api_path_prefix, "/api/v4");
    assert_eq!(resolved.token.as_deref(), Some("gl-secret"));

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_infers_bitbucket_from_pipeline_env() {
    scrub_env();
    env::set_var("BITBUCKET_BUILD_NUMBER", "17");
    env::set_var("BITBUCKET_TOKEN", "bb-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::Bitbucket);
    assert_eq!(resolved.base_url, "https://api.bitbucket.org");
    assert_eq!(resolved.api_path_prefix, "/2.0");

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_infers_platform_from_token_variable() {
    scrub_env();
    env::set_var("GL_TOKEN", "gl-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::GitLab);
    assert_eq!(resolved.token.as_deref(), Some("gl-secret"));

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_ci_signal_wins_over_token_variable() {
    scrub_env();
    env::set_var("GITHUB_ACTIONS", "true");
    env::set_var("GITHUB_TOKEN", "gh-secret");
    env::set_var("GL_TOKEN", "gl-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::GitHub);
    assert_eq!(resolved.token.as_deref(), Some("gh-secret"));

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_github_api_url_override() {
    scrub_env();
    env::set_var("GITHUB_ACTIONS", "true");
    env::set_var("GITHUB_API_URL", "https://github.example.com/api/v3");
    env::set_var("GITHUB_TOKEN", "gh-secret");

    let resolved = Config::default().resolve(false).unwrap();
    assert_eq!(resolved.base_url, "https://github.example.com/api/v3");

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_explicit_config_wins_over_environment() {
    scrub_env();
    env::set_var("GITLAB_CI", "true");
    env::set_var("GL_TOKEN", "gl-secret");

    let config = Config {
        platform: Some("github".to_string()),
        token: Some("explicit-secret".to_string()),
        ..Config::default()
    };

    let resolved = config.resolve(false).unwrap();
    assert_eq!(resolved.platform, Platform::GitHub);
    assert_eq!(resolved.token.as_deref(), Some("explicit-secret"));

    scrub_env();
}

#[test]
#[serial]
fn test_resolve_without_any_signal_defaults_to_github() {
    scrub_env();

    let resolved = Config::default().resolve(true).unwrap();
    assert_eq!(resolved.platform, Platform::GitHub);
    assert_eq!(resolved.base_url, "https://api.github.com");
    assert!(resolved.token.is_none());
}

#[test]
#[serial]
fn test_resolve_missing_token_rejected_outside_dry_run() {
    scrub_env();

    let err = Config::default().resolve(false).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("no credential token"), "got: {}", msg);
    assert!(msg.contains("GITHUB_TOKEN"), "got: {}", msg);
}

#[test]
#[serial]
fn test_resolve_blank_token_variable_ignored() {
    scrub_env();
    env::set_var("GITHUB_TOKEN", "");

    let resolved = Config::default().resolve(true).unwrap();
    assert!(resolved.token.is_none());

    scrub_env();
}
