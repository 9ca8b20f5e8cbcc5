use crate::api::{RequestClient, RequestSpec};
use crate::config::ResolvedConfig;
use crate::context::HookContext;
use crate::error::{GitRelayError, Result};
use crate::git::Repository;
use crate::template;
use crate::ui;

/// What the prepare hook did, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// No asset globs configured, nothing to do
    NoAssets,
    /// Dry-run: reported the plan without mutating anything
    DryRun {
        asset_branch: String,
        matched: Vec<String>,
    },
    /// Asset branch created but no file matched, nothing committed or pushed
    NothingToCommit { asset_branch: String },
    /// Asset branch pushed; url is None when request creation failed
    Completed {
        asset_branch: String,
        request_url: Option<String>,
    },
}

/// Commit configured release assets onto the asset branch, push it, and
/// open a request back to the release branch.
///
/// Checkout, staging, commit, and push failures are fatal and abort the
/// run. A request-creation failure is logged and skipped: the branch is
/// already pushed, so the request can be opened manually.
pub fn prepare<R: Repository, C: RequestClient>(
    config: &ResolvedConfig,
    context: &HookContext,
    repo: &R,
    client: &C,
) -> Result<PrepareOutcome> {
    if config.assets.is_empty() {
        ui::display_status("No release assets configured, skipping asset branch");
        return Ok(PrepareOutcome::NoAssets);
    }

    let asset_branch = template::render(&config.asset_branch, &context.version, &context.branch);
    if asset_branch == context.branch {
        return Err(GitRelayError::config(format!(
            "asset branch '{}' collides with the release branch",
            asset_branch
        )));
    }

    if config.dry_run {
        let matched = matched_assets(&config.assets);
        ui::display_status(&format!(
            "Dry-run: would commit {} file(s) to '{}' and open a request into '{}'",
            matched.len(),
            asset_branch,
            context.branch
        ));
        return Ok(PrepareOutcome::DryRun {
            asset_branch,
            matched,
        });
    }

    repo.checkout_new_branch(&asset_branch)?;
    repo.add(&config.assets)?;

    let message = template::render(&config.commit_message, &context.version, &context.branch);
    let committed = repo.commit(&message)?;

    if committed.is_none() {
        ui::display_status(&format!(
            "No assets matched on '{}', nothing to commit",
            asset_branch
        ));
        repo.checkout_branch(&context.branch)?;
        return Ok(PrepareOutcome::NothingToCommit { asset_branch });
    }

    repo.push(&config.remote, &asset_branch)?;
    repo.checkout_branch(&context.branch)?;
    ui::display_success(&format!("Pushed release assets to '{}'", asset_branch));

    let spec = RequestSpec {
        source_branch: asset_branch.clone(),
        target_branch: context.branch.clone(),
        title: template::render(&config.title, &context.version, &context.branch),
        body: template::request_body(context.notes.as_deref(), &context.version),
    };

    let request_url = match client.create_request(&spec) {
        Ok(created) => {
            ui::display_success(&format!("Opened request {}", created.url));
            Some(created.url)
        }
        Err(e) => {
            // The branch is already pushed; the request can be opened manually
            ui::display_warning(&format!(
                "Could not open request from '{}' into '{}': {}",
                asset_branch, context.branch, e
            ));
            None
        }
    };

    Ok(PrepareOutcome::Completed {
        asset_branch,
        request_url,
    })
}

/// Files currently matching the asset globs, for dry-run reporting
fn matched_assets(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for pattern in patterns {
        if let Ok(paths) = glob::glob(pattern) {
            for path in paths.flatten() {
                if path.is_file() {
                    files.push(path.display().to_string());
                }
            }
        }
    }
    files.sort();
    files.dedup();
    files
}
