//! Version navigation.

/// Number of releases linked from the version switcher.
pub const RECENT_VERSION_COUNT: usize = 3;

/// The newest entries of `history` (ordered oldest first), newest first.
pub fn recent_versions(history: &[String]) -> Vec<&str> {
    history
        .iter()
        .rev()
        .take(RECENT_VERSION_COUNT)
        .map(String::as_str)
        .collect()
}

/// Comma-joined [`recent_versions`], as passed to the site templates.
pub fn navigation_versions(history: &[String]) -> String {
    recent_versions(history).join(",")
}
