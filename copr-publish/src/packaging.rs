//! Local packaging step
//!
//! Builds the source package on the CI host before it is submitted. The
//! script runs in the host's native shell: `sh -xe` on Unix, `cmd /c call`
//! on Windows. Only its pass/fail outcome matters to the workflow.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// A step that produces the source package locally
#[async_trait]
pub trait PackagingStep: Send + Sync {
    /// Runs the step
    ///
    /// # Returns
    /// `Ok(true)` if the step passed, `Ok(false)` if it ran and failed, and
    /// an error if it could not be run at all
    async fn run(&self) -> Result<bool>;
}

/// Runs a user-supplied script in the native shell
pub struct ShellScript {
    script: String,
    workdir: Option<PathBuf>,
}

impl ShellScript {
    /// Creates a shell step
    ///
    /// # Arguments
    /// * `script` - Script body
    /// * `workdir` - Directory to run in (the job workspace); inherits ours if `None`
    pub fn new(script: impl Into<String>, workdir: Option<PathBuf>) -> Self {
        Self {
            script: script.into(),
            workdir,
        }
    }

    fn command(path: &std::path::Path) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/c").arg("call").arg(path);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-xe").arg(path);
            cmd
        }
    }

    fn script_suffix() -> &'static str {
        if cfg!(windows) { ".bat" } else { ".sh" }
    }
}

#[async_trait]
impl PackagingStep for ShellScript {
    async fn run(&self) -> Result<bool> {
        let mut file = tempfile::Builder::new()
            .prefix("copr-package")
            .suffix(Self::script_suffix())
            .tempfile()
            .context("Failed to create script file")?;

        file.write_all(self.script.as_bytes())
            .context("Failed to write script file")?;

        // Close the handle so the shell can open the file on every platform
        let path = file.into_temp_path();

        let mut cmd = Self::command(&path);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        debug!("Running packaging script {}", path.display());

        let status = cmd
            .status()
            .await
            .context("Failed to start packaging script")?;

        info!("Packaging script exited with {}", status);

        Ok(status.success())
    }
}
