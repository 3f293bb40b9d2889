//! Package resolution
//!
//! Copr downloads the source package itself, so whatever the user configured
//! has to become an absolute URL. Relative references point into the job
//! workspace as the CI host serves it under `<JOB_URL>/ws/`.

use thiserror::Error;
use url::Url;

/// Sub-path of the job URL under which the host serves the workspace
const WORKSPACE_PATH: &str = "ws/";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("JOB_URL env. variable is not set, cannot resolve relative package '{0}'")]
    MissingJobUrl(String),

    #[error("JOB_URL '{url}' is not a valid URL: {source}")]
    InvalidJobUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot resolve package '{reference}' against the job workspace: {source}")]
    InvalidReference {
        reference: String,
        #[source]
        source: url::ParseError,
    },
}

/// Resolves a package reference into an absolute URL
///
/// An absolute URL is returned as written, apart from surrounding whitespace.
/// Anything else is taken relative to `<job_url>/ws/`, which requires the host
/// to have set a job URL.
pub fn resolve_package_url(reference: &str, job_url: Option<&str>) -> Result<String, PackageError> {
    let reference = reference.trim();

    if is_absolute(reference) {
        return Ok(reference.to_string());
    }

    let job_url = job_url.ok_or_else(|| PackageError::MissingJobUrl(reference.to_string()))?;

    let workspace = format!("{}/{}", job_url.trim_end_matches('/'), WORKSPACE_PATH);
    let workspace = Url::parse(&workspace).map_err(|source| PackageError::InvalidJobUrl {
        url: job_url.to_string(),
        source,
    })?;

    workspace
        .join(reference)
        .map(String::from)
        .map_err(|source| PackageError::InvalidReference {
            reference: reference.to_string(),
            source,
        })
}

fn is_absolute(reference: &str) -> bool {
    Url::parse(reference).is_ok_and(|url| !url.cannot_be_a_base())
}
