use crate::api::{RequestClient, RequestSpec};
use crate::config::{CandidateRule, ResolvedConfig};
use crate::context::HookContext;
use crate::error::Result;
use crate::git::Repository;
use crate::template;
use crate::ui;

/// What the success hook did, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuccessOutcome {
    /// Requests opened, as (target branch, url) pairs
    pub opened: Vec<(String, String)>,
    /// Target branches where request creation failed and was skipped
    pub failed: Vec<String>,
    /// Target branches reported in dry-run without opening anything
    pub skipped_dry_run: Vec<String>,
}

/// Open fan-out requests from the released branch into every remote branch
/// matched by the candidate rules.
///
/// Fetching and listing remote branches are fatal. Each request failure is
/// logged and skipped so the remaining targets still get theirs.
pub fn success<R: Repository, C: RequestClient>(
    config: &ResolvedConfig,
    context: &HookContext,
    repo: &R,
    client: &C,
) -> Result<SuccessOutcome> {
    let mut outcome = SuccessOutcome::default();

    if config.candidates.is_empty() {
        ui::display_status("No candidate rules configured, nothing to fan out");
        return Ok(outcome);
    }

    repo.fetch(&config.remote)?;
    let branches = repo.list_remote_branches(&config.remote)?;

    let targets = fan_out_targets(&config.candidates, &context.branch, &branches);
    if targets.is_empty() {
        ui::display_status(&format!(
            "No remote branch matches the candidate rules for '{}'",
            context.branch
        ));
        return Ok(outcome);
    }

    let title = template::render(&config.title, &context.version, &context.branch);
    let body = template::request_body(context.notes.as_deref(), &context.version);

    for target in targets {
        if config.dry_run {
            ui::display_status(&format!(
                "Dry-run: would open a request from '{}' into '{}'",
                context.branch, target
            ));
            outcome.skipped_dry_run.push(target);
            continue;
        }

        let spec = RequestSpec {
            source_branch: context.branch.clone(),
            target_branch: target.clone(),
            title: title.clone(),
            body: body.clone(),
        };

        match client.create_request(&spec) {
            Ok(created) => {
                ui::display_success(&format!(
                    "Opened request into '{}': {}",
                    target, created.url
                ));
                outcome.opened.push((target, created.url));
            }
            Err(e) => {
                ui::display_warning(&format!("Could not open request into '{}': {}", target, e));
                outcome.failed.push(target);
            }
        }
    }

    Ok(outcome)
}

/// Remote branches receiving a fan-out request for the released branch.
///
/// A branch qualifies when some rule's `from` matches the released branch
/// and its `to` matches the branch name. The released branch itself is
/// excluded, and duplicates across rules are dropped keeping first-seen
/// order.
pub fn fan_out_targets(
    rules: &[CandidateRule],
    release_branch: &str,
    remote_branches: &[String],
) -> Vec<String> {
    let mut targets = Vec::new();

    for rule in rules {
        if !rule.from.is_match(release_branch) {
            continue;
        }
        for branch in remote_branches {
            if branch == release_branch {
                continue;
            }
            if rule.to.is_match(branch) && !targets.contains(branch) {
                targets.push(branch.clone());
            }
        }
    }

    targets
}
