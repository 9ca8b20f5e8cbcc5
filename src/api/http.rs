use crate::api::{CreatedRequest, RequestClient, RequestSpec};
use crate::config::ResolvedConfig;
use crate::error::{GitRelayError, Result};
use crate::platform::Platform;
use crate::remote::RemoteRepo;
use serde_json::Value;
use ureq::Agent;

/// REST client for the hosting platforms' request-creation endpoints
pub struct HttpRequestClient {
    agent: Agent,
    platform: Platform,
    base_url: String,
    api_path_prefix: String,
    token: Option<String>,
    repo: RemoteRepo,
}

impl HttpRequestClient {
    /// Build a client from resolved configuration and repository coordinates.
    ///
    /// A missing token only fails at request time, so a dry-run that never
    /// sends anything can construct the client without credentials.
    pub fn new(config: &ResolvedConfig, repo: RemoteRepo) -> Self {
        HttpRequestClient {
            agent: Agent::new(),
            platform: config.platform,
            base_url: config.base_url.clone(),
            api_path_prefix: config.api_path_prefix.clone(),
            token: config.token.clone(),
            repo,
        }
    }

    fn endpoint(&self) -> String {
        endpoint(
            self.platform,
            &self.base_url,
            &self.api_path_prefix,
            &self.repo,
        )
    }
}

impl RequestClient for HttpRequestClient {
    fn create_request(&self, spec: &RequestSpec) -> Result<CreatedRequest> {
        let url = self.endpoint();
        let token = self.token.as_deref().ok_or_else(|| {
            GitRelayError::request("no credential token available for the platform API")
        })?;

        let request = self.agent.post(&url).set("Accept", "application/json");
        let request = match self.platform {
            Platform::GitHub => request.set("Authorization", &format!("token {}", token)),
            Platform::GitLab => request.set("PRIVATE-TOKEN", token),
            Platform::Bitbucket => request.set("Authorization", &format!("Bearer {}", token)),
        };

        let response = request
            .send_json(payload(self.platform, spec))
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let detail = response.into_string().unwrap_or_default();
                    GitRelayError::request(format!(
                        "{} returned status {} for {}: {}",
                        self.platform, code, url, detail
                    ))
                }
                ureq::Error::Transport(transport) => GitRelayError::request(format!(
                    "transport error calling {}: {}",
                    url, transport
                )),
            })?;

        let body: Value = response.into_json().map_err(|e| {
            GitRelayError::request(format!("invalid response from {}: {}", url, e))
        })?;

        Ok(parse_created(self.platform, &body))
    }
}

/// Build the request-creation endpoint URL for a platform
fn endpoint(platform: Platform, base_url: &str, prefix: &str, repo: &RemoteRepo) -> String {
    match platform {
        Platform::GitHub => format!(
            "{}{}/repos/{}/{}/pulls",
            base_url, prefix, repo.owner, repo.name
        ),
        Platform::GitLab => format!(
            "{}{}/projects/{}/merge_requests",
            base_url,
            prefix,
            encode_project_path(&repo.full_path())
        ),
        Platform::Bitbucket => format!(
            "{}{}/repositories/{}/{}/pullrequests",
            base_url, prefix, repo.owner, repo.name
        ),
    }
}

/// Percent-encode a project path for use as a single URL segment
fn encode_project_path(path: &str) -> String {
    path.replace('/', "%2F")
}

/// Build the JSON payload for a platform's request-creation endpoint
fn payload(platform: Platform, spec: &RequestSpec) -> Value {
    match platform {
        Platform::GitHub => serde_json::json!({
            "head": spec.source_branch,
            "base": spec.target_branch,
            "title": spec.title,
            "body": spec.body,
        }),
        Platform::GitLab => serde_json::json!({
            "source_branch": spec.source_branch,
            "target_branch": spec.target_branch,
            "title": spec.title,
            "description": spec.body,
        }),
        Platform::Bitbucket => serde_json::json!({
            "title": spec.title,
            "description": spec.body,
            "source": { "branch": { "name": spec.source_branch } },
            "destination": { "branch": { "name": spec.target_branch } },
        }),
    }
}

/// Extract the web URL and number of the created request from a response.
///
/// A 2xx response means the request exists, so missing fields degrade to
/// empty values rather than failing the hook.
fn parse_created(platform: Platform, body: &Value) -> CreatedRequest {
    let (url, number) = match platform {
        Platform::GitHub => (body.get("html_url"), body.get("number")),
        Platform::GitLab => (body.get("web_url"), body.get("iid")),
        Platform::Bitbucket => (body.pointer("/links/html/href"), body.get("id")),
    };

    CreatedRequest {
        url: url.and_then(Value::as_str).unwrap_or_default().to_string(),
        number: number.and_then(Value::as_u64).unwrap_or_default(),
    }
}
