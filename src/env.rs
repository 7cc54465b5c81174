//! Builds the environment handed to every git/hub subprocess.
//!
//! Children run with a cleared environment. What they see is the caller's
//! overrides (tokens and similar) plus `HOME` and `PATH` taken from an
//! [`AmbientEnv`] snapshot, so the binaries can still be located and can still
//! read the user's SSH keys and credential helpers.

use std::collections::HashMap;

pub const HOME_VAR: &str = "HOME";
pub const PATH_VAR: &str = "PATH";

/// Snapshot of the host variables every subprocess must inherit.
///
/// Captured once with [`AmbientEnv::from_process`] in production and built by
/// hand in tests, so nothing below this type reads the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientEnv {
    pub home: Option<String>,
    pub path: Option<String>,
}

impl AmbientEnv {
    /// Reads `HOME` and `PATH` from the current process.
    ///
    /// Variables that are unset or not valid UTF-8 are recorded as `None`.
    pub fn from_process() -> Self {
        Self {
            home: std::env::var(HOME_VAR).ok(),
            path: std::env::var(PATH_VAR).ok(),
        }
    }

    pub fn new(home: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            home: Some(home.into()),
            path: Some(path.into()),
        }
    }

    /// Returns a fresh map holding every override, with `HOME` and `PATH`
    /// forced to the snapshot values.
    ///
    /// Ambient entries always win over same-named overrides. A variable
    /// missing from the snapshot is removed rather than taken from the
    /// overrides.
    pub fn build(&self, overrides: &HashMap<String, String>) -> HashMap<String, String> {
        let mut env = overrides.clone();
        for (key, value) in [(HOME_VAR, &self.home), (PATH_VAR, &self.path)] {
            match value {
                Some(v) => {
                    env.insert(key.to_string(), v.clone());
                }
                None => {
                    if env.remove(key).is_some() {
                        log::debug!("dropping {} override: not set in host environment", key);
                    }
                }
            }
        }
        env
    }
}
