//! Release lifecycle hooks
//!
//! Entry points invoked by the host release orchestrator:
//! - verify-conditions: validate and normalize configuration
//! - prepare: commit release assets to a dedicated branch and open a
//!   request back to the release branch
//! - success: open fan-out requests to branches matching the candidate rules

pub mod prepare;
pub mod success;
pub mod verify;

pub use prepare::{prepare, PrepareOutcome};
pub use success::{success, SuccessOutcome};
pub use verify::verify_conditions;

/// Types of lifecycle hooks exposed to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    VerifyConditions,
    Prepare,
    Success,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::VerifyConditions => "verify-conditions",
            HookType::Prepare => "prepare",
            HookType::Success => "success",
        }
    }
}
