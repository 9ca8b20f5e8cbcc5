// tests/integration_test.rs
//
// End-to-end hook runs against a real repository: a work tree wired to a
// local bare remote, with the request side handled by the mock client.

use std::fs;
use std::path::{Path, PathBuf};

use git_relay::api::MockRequestClient;
use git_relay::config::{Candidate, Config, ResolvedConfig};
use git_relay::context::HookContext;
use git_relay::git::{Git2Repository, Repository};
use git_relay::hooks::{prepare, success, PrepareOutcome};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    work_path: PathBuf,
    remote_path: PathBuf,
    /// Name of the branch the fixture's initial commit landed on
    release_branch: String,
}

/// Create a work repository with one commit and a bare remote named
/// `origin`, and push the initial branch to it.
fn setup_test_repo() -> Fixture {
    let dir = TempDir::new().unwrap();

    let remote_path = dir.path().join("remote.git");
    git2::Repository::init_bare(&remote_path).unwrap();

    let work_path = dir.path().join("work");
    let raw = git2::Repository::init(&work_path).unwrap();
    let mut config = raw.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    fs::write(work_path.join("README.md"), "# widget\n").unwrap();
    let mut index = raw.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = raw.find_tree(tree_id).unwrap();
    let sig = raw.signature().unwrap();
    raw.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    // The default branch name depends on the libgit2 configuration, so
    // read it back instead of assuming main or master
    let release_branch = raw.head().unwrap().shorthand().unwrap().to_string();

    raw.remote("origin", remote_path.to_str().unwrap()).unwrap();

    // Reuse the handle that built the fixture for the initial push
    drop(tree);
    let repo = Git2Repository::from_git2(raw);
    repo.push("origin", &release_branch).unwrap();

    Fixture {
        _dir: dir,
        work_path,
        remote_path,
        release_branch,
    }
}

impl Fixture {
    fn open(&self) -> Git2Repository {
        Git2Repository::open(&self.work_path).unwrap()
    }

    fn resolved_config(&self, assets: &[&str], candidates: &[(&str, &str)]) -> ResolvedConfig {
        Config {
            platform: Some("github".to_string()),
            base_url: Some("https://api.github.com".to_string()),
            token: Some("secret".to_string()),
            assets: assets.iter().map(|a| a.to_string()).collect(),
            candidates: candidates
                .iter()
                .map(|(from, to)| Candidate {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
            ..Config::default()
        }
        .resolve(false)
        .unwrap()
    }

    fn context(&self) -> HookContext {
        HookContext {
            branch: self.release_branch.clone(),
            version: "1.2.3".to_string(),
            repository_url: "https://github.com/acme/widget.git".to_string(),
            notes: None,
            dry_run: false,
        }
    }

    fn remote_branch_exists(&self, name: &str) -> bool {
        let remote = git2::Repository::open_bare(&self.remote_path).unwrap();
        let exists = remote
            .find_reference(&format!("refs/heads/{}", name))
            .is_ok();
        exists
    }
}

#[test]
fn test_prepare_pushes_asset_branch_and_opens_request() {
    let fixture = setup_test_repo();
    fs::create_dir_all(fixture.work_path.join("dist")).unwrap();
    fs::write(fixture.work_path.join("dist/widget-1.2.3.txt"), "artifact").unwrap();
    fs::write(fixture.work_path.join("dist/notes.txt"), "notes").unwrap();

    let config = fixture.resolved_config(&["dist/*.txt"], &[]);
    let context = fixture.context();
    let repo = fixture.open();
    let client = MockRequestClient::new();

    let outcome = prepare(&config, &context, &repo, &client).unwrap();
    match outcome {
        PrepareOutcome::Completed {
            asset_branch,
            request_url,
        } => {
            assert_eq!(asset_branch, "release-assets/v1.2.3");
            assert!(request_url.is_some());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // The asset branch reached the remote
    assert!(fixture.remote_branch_exists("release-assets/v1.2.3"));

    // The asset commit carries the rendered message
    let remote = git2::Repository::open_bare(&fixture.remote_path).unwrap();
    let commit = remote
        .find_reference("refs/heads/release-assets/v1.2.3")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(commit.message().unwrap(), "chore(release): 1.2.3 [skip ci]");

    // The work tree is back on the release branch
    let raw = git2::Repository::open(&fixture.work_path).unwrap();
    assert_eq!(
        raw.head().unwrap().shorthand().unwrap(),
        fixture.release_branch
    );

    // One request from the asset branch back into the release branch
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_branch, "release-assets/v1.2.3");
    assert_eq!(requests[0].target_branch, fixture.release_branch);
    assert_eq!(requests[0].title, "Release 1.2.3");
    assert_eq!(requests[0].body, "Release 1.2.3");
}

#[test]
fn test_prepare_with_no_matching_assets_pushes_nothing() {
    let fixture = setup_test_repo();

    let config = fixture.resolved_config(&["dist/*.txt"], &[]);
    let context = fixture.context();
    let repo = fixture.open();
    let client = MockRequestClient::new();

    let outcome = prepare(&config, &context, &repo, &client).unwrap();
    assert!(matches!(outcome, PrepareOutcome::NothingToCommit { .. }));

    assert!(!fixture.remote_branch_exists("release-assets/v1.2.3"));
    assert!(client.requests().is_empty());

    // Still back on the release branch
    let raw = git2::Repository::open(&fixture.work_path).unwrap();
    assert_eq!(
        raw.head().unwrap().shorthand().unwrap(),
        fixture.release_branch
    );
}

#[test]
fn test_prepare_dry_run_reports_matched_assets() {
    let fixture = setup_test_repo();
    fs::create_dir_all(fixture.work_path.join("dist")).unwrap();
    fs::write(fixture.work_path.join("dist/widget-1.2.3.txt"), "artifact").unwrap();
    fs::write(fixture.work_path.join("dist/notes.txt"), "notes").unwrap();

    // The glob walk runs against the filesystem, so point the pattern at
    // the fixture's work tree
    let pattern = fixture.work_path.join("dist/*.txt");
    let mut config = fixture.resolved_config(&[pattern.to_str().unwrap()], &[]);
    config.dry_run = true;
    let context = fixture.context();
    let repo = fixture.open();
    let client = MockRequestClient::new();

    let outcome = prepare(&config, &context, &repo, &client).unwrap();
    match outcome {
        PrepareOutcome::DryRun {
            asset_branch,
            matched,
        } => {
            assert_eq!(asset_branch, "release-assets/v1.2.3");
            assert_eq!(matched.len(), 2, "matched: {:?}", matched);
            assert!(matched[0].ends_with("notes.txt"), "matched: {:?}", matched);
            assert!(
                matched[1].ends_with("widget-1.2.3.txt"),
                "matched: {:?}",
                matched
            );
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert!(!fixture.remote_branch_exists("release-assets/v1.2.3"));
    assert!(client.requests().is_empty());
}

#[test]
fn test_success_fans_out_to_remote_branches() {
    let fixture = setup_test_repo();

    // Publish two more branches for the candidate rules to pick up
    let repo = fixture.open();
    repo.checkout_new_branch("develop").unwrap();
    repo.push("origin", "develop").unwrap();
    repo.checkout_new_branch("staging").unwrap();
    repo.push("origin", "staging").unwrap();
    repo.checkout_branch(&fixture.release_branch).unwrap();

    let config = fixture.resolved_config(&[], &[(&fixture.release_branch, "develop|staging")]);
    let context = fixture.context();
    let client = MockRequestClient::new();

    let outcome = success(&config, &context, &repo, &client).unwrap();
    assert_eq!(outcome.opened.len(), 2);
    assert!(outcome.failed.is_empty());

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.source_branch == fixture.release_branch));
    let mut targets: Vec<&str> = requests.iter().map(|r| r.target_branch.as_str()).collect();
    targets.sort();
    assert_eq!(targets, vec!["develop", "staging"]);
}

#[test]
fn test_success_excludes_release_branch_from_targets() {
    let fixture = setup_test_repo();
    let repo = fixture.open();

    // A catch-all rule still never targets the release branch itself
    let config = fixture.resolved_config(&[], &[(".*", ".*")]);
    let context = fixture.context();
    let client = MockRequestClient::new();

    let outcome = success(&config, &context, &repo, &client).unwrap();
    assert!(outcome.opened.is_empty());
    assert!(client.requests().is_empty());
}

#[test]
fn test_list_remote_branches_reflects_fetched_state() {
    let fixture = setup_test_repo();
    let repo = fixture.open();

    repo.checkout_new_branch("develop").unwrap();
    repo.push("origin", "develop").unwrap();
    repo.checkout_branch(&fixture.release_branch).unwrap();

    repo.fetch("origin").unwrap();
    let branches = repo.list_remote_branches("origin").unwrap();
    assert!(branches.contains(&"develop".to_string()));
    assert!(branches.contains(&fixture.release_branch));
}
