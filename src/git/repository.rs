use crate::error::{GitRelayError, Result};
use git2::{BranchType, Oid, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo, token: None })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo, token: None }
    }

    /// Attach a credential token, used for https remotes
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Build remote callbacks with the credential chain.
    ///
    /// Order: configured token as userpass over https, SSH keys from
    /// ~/.ssh (ed25519, rsa, ecdsa), SSH agent, then default credentials.
    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();
        let token = self.token.clone();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &token {
                    return git2::Cred::userpass_plaintext(
                        username_from_url.unwrap_or("git"),
                        token,
                    );
                }
            }

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                // Try SSH agent as fallback
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn fetch(&self, remote: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitRelayError::remote(format!("Remote '{}' not found: {}", remote, e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        // Fetch all branches so remote-tracking refs mirror the remote
        let refspec = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        remote_handle
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                GitRelayError::remote(format!("Failed to fetch from remote '{}': {}", remote, e))
            })?;

        Ok(())
    }

    fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", remote);
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                if let Some(short) = name.strip_prefix(&prefix) {
                    // origin/HEAD is a symbolic pointer, not a branch
                    if short != "HEAD" {
                        branches.push(short.to_string());
                    }
                }
            }
        }

        branches.sort();
        Ok(branches)
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, true)?;
        self.checkout_branch(name)
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", name);
        let object = self.repo.revparse_single(&refname)?;

        self.repo.checkout_tree(&object, None)?;
        self.repo.set_head(&refname)?;

        Ok(())
    }

    fn add(&self, pathspecs: &[String]) -> Result<()> {
        let mut index = self.repo.index()?;

        index.add_all(
            pathspecs.iter().map(|s| s.as_str()),
            git2::IndexAddOption::DEFAULT,
            None,
        )?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Option<Oid>> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let head = self.repo.head()?.peel_to_commit()?;

        // Index identical to HEAD means nothing was staged
        if head.tree_id() == tree_id {
            return Ok(None);
        }

        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&head])?;

        Ok(Some(oid))
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitRelayError::remote(format!("Remote '{}' not found: {}", remote, e)))?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = self.remote_callbacks();

        // Catch per-reference rejections reported during the push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                eprintln!(
                    "Warning: Could not update reference {}: {}",
                    refname, status
                );
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("+refs/heads/{0}:refs/heads/{0}", branch);
        match remote_handle.push(&[refspec.as_str()], Some(&mut push_options)) {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.class() == git2::ErrorClass::Net {
                    Err(GitRelayError::remote(format!(
                        "Network error during push: {}",
                        e
                    )))
                } else if e.class() == git2::ErrorClass::Reference {
                    Err(GitRelayError::remote(format!(
                        "Reference error during push: {}",
                        e
                    )))
                } else {
                    Err(GitRelayError::remote(format!(
                        "Failed to push branch '{}': {}",
                        branch, e
                    )))
                }
            }
        }
    }
}

// SAFETY: git2::Repository is Send but not Sync. The hooks drive a
// Git2Repository from a single thread through &self, so libgit2 state is
// never accessed concurrently.
unsafe impl Sync for Git2Repository {}
