use crate::config::{Config, ResolvedConfig};
use crate::error::Result;

/// Validate and normalize the configuration without touching the repository.
///
/// Merges environment-derived defaults, then checks every field constraint.
/// All violations are reported in one aggregated error so a broken
/// configuration surfaces completely before any mutation happens.
pub fn verify_conditions(config: &Config, cli_dry_run: bool) -> Result<ResolvedConfig> {
    config.resolve(cli_dry_run)
}
