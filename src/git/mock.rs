use crate::error::{GitRelayError, Result};
use crate::git::Repository;
use git2::Oid;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// Records every operation in call order so tests can assert both what
/// happened and what did not (the dry-run property).
pub struct MockRepository {
    remote_branches: Vec<String>,
    commit_returns: Option<Oid>,
    failing_operations: Vec<String>,
    operations: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            remote_branches: Vec::new(),
            commit_returns: Some(Oid::zero()),
            failing_operations: Vec::new(),
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Set the branch names reported for any remote
    pub fn set_remote_branches(&mut self, branches: &[&str]) {
        self.remote_branches = branches.iter().map(|b| b.to_string()).collect();
    }

    /// Make commit report that nothing was staged
    pub fn set_nothing_to_commit(&mut self) {
        self.commit_returns = None;
    }

    /// Make the named operation fail with a simulated error
    pub fn fail_operation(&mut self, operation: impl Into<String>) {
        self.failing_operations.push(operation.into());
    }

    /// Operations performed so far, in call order
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    fn record(&self, operation: String) {
        self.operations.lock().unwrap().push(operation);
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.failing_operations.iter().any(|o| o == operation) {
            return Err(GitRelayError::remote(format!(
                "simulated {} failure",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn fetch(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {}", remote));
        self.check("fetch")
    }

    fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        self.record(format!("list_remote_branches {}", remote));
        self.check("list_remote_branches")?;
        Ok(self.remote_branches.clone())
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.record(format!("checkout_new_branch {}", name));
        self.check("checkout_new_branch")
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        self.record(format!("checkout_branch {}", name));
        self.check("checkout_branch")
    }

    fn add(&self, pathspecs: &[String]) -> Result<()> {
        self.record(format!("add {}", pathspecs.join(" ")));
        self.check("add")
    }

    fn commit(&self, message: &str) -> Result<Option<Oid>> {
        self.record(format!("commit {}", message));
        self.check("commit")?;
        Ok(self.commit_returns)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, branch));
        self.check("push")
    }
}
