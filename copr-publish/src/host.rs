//! Host build environment
//!
//! A read-only snapshot of the variables the CI host exported to this step,
//! plus the result of the job the step runs after.

use std::collections::HashMap;

use clap::ValueEnum;

/// Variable holding the URL of the job (its workspace is served below it)
pub const JOB_URL_VAR: &str = "JOB_URL";

/// Result of the host job this step runs after
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpstreamResult {
    Success,
    Unstable,
    Failure,
    Aborted,
    NotBuilt,
}

impl UpstreamResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UpstreamResult::Success)
    }
}

/// Environment variables exported by the host
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    vars: HashMap<String, String>,
}

impl HostEnv {
    /// Snapshot of the current process environment
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// URL of the running job, if the host set a non-empty one
    pub fn job_url(&self) -> Option<&str> {
        self.get(JOB_URL_VAR).filter(|url| !url.trim().is_empty())
    }

    /// Expands `$NAME` and `${NAME}` references
    ///
    /// References to unset variables are kept verbatim, as is a `$` that
    /// does not start a reference.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name| self.get(name)).into_owned()
    }
}
