//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations
//! the release hooks need, allowing for multiple implementations including
//! real Git repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility.
//!
//! ```rust
//! # use git_relay::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! repo.fetch("origin")?;
//! for branch in repo.list_remote_branches("origin")? {
//!     println!("{}", branch);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Common git operation trait for abstraction
///
/// This trait abstracts the Git operations used by the release hooks to
/// allow for multiple implementations including real Git repositories and
/// mock implementations for testing.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>] which handles Git-specific and
/// application errors uniformly. Implementations should map underlying errors
/// (like `git2::Error`) to the appropriate [crate::error::GitRelayError] variants.
pub trait Repository: Send + Sync {
    /// Fetch branches from a remote
    ///
    /// Updates the remote-tracking branches so that
    /// [list_remote_branches](Repository::list_remote_branches) reflects
    /// the remote's current state.
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin", "upstream")
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the remote doesn't exist or the fetch fails
    fn fetch(&self, remote: &str) -> Result<()>;

    /// List branch names known on a remote
    ///
    /// Returns short branch names with the remote prefix stripped
    /// (`origin/develop` is reported as `develop`), sorted alphabetically.
    /// The symbolic `HEAD` entry is excluded.
    ///
    /// # Arguments
    /// * `remote` - Name of the remote whose branches are listed
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Sorted short branch names
    /// * `Err` - If there's a Git error
    fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>>;

    /// Create a branch at the current HEAD and check it out
    ///
    /// An existing branch with the same name is overwritten.
    ///
    /// # Arguments
    /// * `name` - Name for the new branch
    ///
    /// # Returns
    /// * `Ok(())` - Branch created and checked out
    /// * `Err` - If HEAD cannot be resolved or the checkout fails
    fn checkout_new_branch(&self, name: &str) -> Result<()>;

    /// Check out an existing local branch
    ///
    /// # Arguments
    /// * `name` - Name of the branch to check out
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the branch doesn't exist or the checkout fails
    fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Stage files matching the given pathspecs
    ///
    /// Pathspecs may contain glob patterns (e.g., `dist/*.tar.gz`).
    /// Patterns that match nothing stage nothing and are not an error.
    ///
    /// # Arguments
    /// * `pathspecs` - Patterns of files to stage
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the index cannot be updated
    fn add(&self, pathspecs: &[String]) -> Result<()>;

    /// Commit the staged changes on the current branch
    ///
    /// # Arguments
    /// * `message` - The commit message
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - The new commit
    /// * `Ok(None)` - Nothing was staged, no commit created
    /// * `Err` - If the commit cannot be written
    ///
    /// # Example
    /// ```rust
    /// # use git_relay::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.commit("chore(release): 1.0.0")? {
    ///     Some(oid) => println!("committed {}", oid),
    ///     None => println!("nothing to commit"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn commit(&self, message: &str) -> Result<Option<Oid>>;

    /// Push a branch to a remote
    ///
    /// The push overwrites the remote branch if it already exists, since
    /// asset branches are regenerated per release.
    ///
    /// # Arguments
    /// * `remote` - Name of the remote to push to
    /// * `branch` - Name of the local branch to push
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the remote doesn't exist or the push is rejected
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}
