//! Strict-mode policy and CI detection.

use std::collections::HashMap;

/// Source of environment variables.
pub trait EnvSource {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Whether the environment looks like a CI run.
///
/// `CI` counts when set to anything but an empty string, `0` or `false`;
/// `GITHUB_ACTIONS` counts when it is `true`.
pub fn is_ci(env: &impl EnvSource) -> bool {
    let ci = env
        .var("CI")
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            !(value.is_empty() || value == "0" || value == "false")
        })
        .unwrap_or(false);

    ci || env.var("GITHUB_ACTIONS").as_deref() == Some("true")
}

/// Resolves whether strict mode applies.
///
/// The explicit option wins, then the configured value; CI detection is only
/// consulted when neither is set.
pub fn resolve_strict(
    explicit: Option<bool>,
    configured: Option<bool>,
    detect_ci: impl FnOnce() -> bool,
) -> bool {
    explicit.or(configured).unwrap_or_else(detect_ci)
}
