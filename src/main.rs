use anyhow::Result;
use clap::{Parser, Subcommand};

use git_relay::api::HttpRequestClient;
use git_relay::config::{load_config, Config, ResolvedConfig};
use git_relay::context::HookContext;
use git_relay::git::Git2Repository;
use git_relay::hooks::{self, HookType};
use git_relay::remote::RemoteRepo;
use git_relay::ui;

#[derive(Parser)]
#[command(
    name = "git-relay",
    about = "Push release assets and open pull/merge requests across branch pairs"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch the release run is acting on")]
    branch: Option<String>,

    #[arg(long, help = "Version being released")]
    version: Option<String>,

    #[arg(long, help = "Remote URL of the repository being released")]
    repository_url: Option<String>,

    #[arg(long, help = "Release notes used as the request body")]
    notes: Option<String>,

    #[arg(long, help = "Report planned actions without pushing or opening requests")]
    dry_run: bool,

    #[command(subcommand)]
    hook: Hook,
}

#[derive(Subcommand)]
enum Hook {
    /// Validate and normalize the configuration
    VerifyConditions,
    /// Commit release assets to the asset branch and open a request back
    /// to the release branch
    Prepare,
    /// Open fan-out requests to branches matching the candidate rules
    Success,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Could not load configuration: {}", e));
            std::process::exit(1);
        }
    };

    match args.hook {
        // verify-conditions needs no release context, only the configuration
        Hook::VerifyConditions => match hooks::verify_conditions(&config, args.dry_run) {
            Ok(resolved) => {
                ui::display_success(&format!(
                    "Configuration valid for platform '{}'",
                    resolved.platform
                ));
                Ok(())
            }
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        },
        Hook::Prepare => {
            let (resolved, context, repo, client) = release_setup(&args, &config);
            report(
                HookType::Prepare,
                hooks::prepare(&resolved, &context, &repo, &client).map(|_| ()),
            )
        }
        Hook::Success => {
            let (resolved, context, repo, client) = release_setup(&args, &config);
            report(
                HookType::Success,
                hooks::success(&resolved, &context, &repo, &client).map(|_| ()),
            )
        }
    }
}

/// Resolve everything prepare and success need, exiting with a message on
/// any configuration, context, or repository problem.
fn release_setup(
    args: &Args,
    config: &Config,
) -> (ResolvedConfig, HookContext, Git2Repository, HttpRequestClient) {
    let context = match HookContext::resolve(
        args.branch.clone(),
        args.version.clone(),
        args.repository_url.clone(),
        args.notes.clone(),
        args.dry_run,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let resolved = match hooks::verify_conditions(config, context.dry_run) {
        Ok(resolved) => resolved,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo.with_token(resolved.token.clone()),
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let remote_repo = match RemoteRepo::parse(&context.repository_url) {
        Ok(remote_repo) => remote_repo,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let client = HttpRequestClient::new(&resolved, remote_repo);

    (resolved, context, repo, client)
}

fn report(hook_type: HookType, result: git_relay::Result<()>) -> Result<()> {
    match result {
        Ok(()) => {
            ui::display_success(&format!("{} hook completed", hook_type.name()));
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("{} hook failed: {}", hook_type.name(), e));
            std::process::exit(1);
        }
    }
}
