use crate::api::{CreatedRequest, RequestClient, RequestSpec};
use crate::error::{GitRelayError, Result};
use std::sync::Mutex;

/// Mock request client for testing without network access
///
/// Records every attempted request so tests can assert fan-out order and
/// the dry-run property (no attempts at all).
pub struct MockRequestClient {
    attempts: Mutex<Vec<RequestSpec>>,
    failing_targets: Vec<String>,
}

impl MockRequestClient {
    /// Create a new mock client where every request succeeds
    pub fn new() -> Self {
        MockRequestClient {
            attempts: Mutex::new(Vec::new()),
            failing_targets: Vec::new(),
        }
    }

    /// Make requests targeting the given branch fail with a simulated error
    pub fn fail_for_target(&mut self, target: impl Into<String>) {
        self.failing_targets.push(target.into());
    }

    /// All attempted requests, in call order
    pub fn requests(&self) -> Vec<RequestSpec> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Default for MockRequestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestClient for MockRequestClient {
    fn create_request(&self, spec: &RequestSpec) -> Result<CreatedRequest> {
        let number = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(spec.clone());
            attempts.len() as u64
        };

        if self.failing_targets.iter().any(|t| t == &spec.target_branch) {
            return Err(GitRelayError::request(format!(
                "simulated failure for target '{}'",
                spec.target_branch
            )));
        }

        Ok(CreatedRequest {
            url: format!("https://example.invalid/requests/{}", number),
            number,
        })
    }
}
