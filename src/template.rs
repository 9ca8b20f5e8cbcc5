//! Placeholder substitution for commit messages, request titles, and
//! asset branch names.

/// Render a template, substituting `{version}` and `{branch}` placeholders.
///
/// Unknown placeholders are left untouched so a typo surfaces in the
/// rendered output instead of vanishing silently.
pub fn render(template: &str, version: &str, branch: &str) -> String {
    template
        .replace("{version}", version)
        .replace("{branch}", branch)
}

/// Build the request body from orchestrator-supplied release notes,
/// falling back to a one-line summary when no notes were given.
pub fn request_body(notes: Option<&str>, version: &str) -> String {
    match notes {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => format!("Release {}", version),
    }
}
