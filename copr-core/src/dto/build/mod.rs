//! Build DTOs

use serde::Serialize;

/// Request to schedule a new build of a source package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuild {
    /// Owner (user name) of the Copr project
    pub owner: String,
    /// Name of the Copr project
    pub project: String,
    /// Absolute URL Copr downloads the source package from
    pub package_url: String,
}

impl NewBuild {
    pub fn new(
        owner: impl Into<String>,
        project: impl Into<String>,
        package_url: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
            package_url: package_url.into(),
        }
    }
}

/// Form body of the `new_build` endpoint
#[derive(Debug, Serialize)]
pub struct NewBuildForm<'a> {
    pub pkgs: &'a str,
}

impl<'a> From<&'a NewBuild> for NewBuildForm<'a> {
    fn from(req: &'a NewBuild) -> Self {
        Self {
            pkgs: &req.package_url,
        }
    }
}
