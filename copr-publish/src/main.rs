//! Copr Publish
//!
//! A post-build step that submits a source package (SRPM) to Copr and
//! optionally waits for Copr to finish building it.
//!
//! Architecture:
//! - Configuration: flags with environment fallbacks
//! - Host: the CI host's environment (job URL, workspace, upstream result)
//! - Packaging: optional local script that produces the package
//! - Scheduler: polling Copr until the build reaches a terminal status
//! - Workflow: the sequence of stages tying the above together
//!
//! The process exits 0 when the step passed, 1 when it failed and 2 when
//! the configuration is unusable.

mod config;
mod host;
mod package;
mod packaging;
mod scheduler;
mod workflow;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::*;
use copr_client::CoprClient;
use copr_core::Secret;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_API_URL, parse_timeout};
use crate::host::{HostEnv, UpstreamResult};
use crate::packaging::{PackagingStep, ShellScript};
use crate::workflow::{LOG_PREFIX, Outcome, publish};

#[derive(Parser)]
#[command(name = "copr-publish")]
#[command(about = "Build an SRPM in Copr at the end of a CI job", long_about = None)]
struct Cli {
    /// Copr project name
    #[arg(long, env = "COPR_PROJECT")]
    project: String,

    /// Owner (user name) of the Copr project
    #[arg(long, env = "COPR_OWNER")]
    owner: String,

    /// SRPM URL, or a path relative to the job workspace ($VARS are expanded)
    #[arg(long, env = "COPR_PACKAGE")]
    package: String,

    /// Copr API login
    #[arg(long, env = "COPR_API_LOGIN", hide_env_values = true)]
    api_login: Secret,

    /// Copr API token
    #[arg(long, env = "COPR_API_TOKEN", hide_env_values = true)]
    api_token: Secret,

    /// Copr frontend URL
    #[arg(long, env = "COPR_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Script that builds the SRPM
    #[arg(long, env = "COPR_PACKAGE_SCRIPT")]
    package_script: Option<String>,

    /// Run the package script before submitting
    #[arg(long, env = "COPR_PREPARE_PACKAGE")]
    prepare_package: bool,

    /// How long to wait for Copr, in minutes
    #[arg(long, env = "COPR_TIMEOUT", default_value = "60", value_parser = parse_timeout)]
    timeout: u64,

    /// Wait for the Copr build to finish
    #[arg(long, env = "COPR_WAIT")]
    wait: bool,

    /// Result of the job this step runs after
    #[arg(long, env = "COPR_UPSTREAM_RESULT", value_enum, default_value_t = UpstreamResult::Success)]
    upstream_result: UpstreamResult,

    /// Job workspace directory
    #[arg(long, env = "WORKSPACE")]
    workspace: Option<PathBuf>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let mut config = Config::new(
            cli.project,
            cli.owner,
            cli.package,
            cli.api_login,
            cli.api_token,
        );
        config.api_url = cli.api_url;
        config.package_script = cli.package_script;
        config.prepare_package = cli.prepare_package;
        config.timeout_minutes = cli.timeout;
        config.wait = cli.wait;
        config.upstream_result = cli.upstream_result;
        config.workspace = cli.workspace;
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "copr_publish=info,copr_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_config(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}{:#}", LOG_PREFIX, e);
            return ExitCode::from(2);
        }
    };

    info!(
        "Loaded configuration: project={}/{}, api_url={}",
        config.owner, config.project, config.api_url
    );

    if run(&config).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(cli: Cli) -> Result<Config> {
    let config = Config::from(cli);
    config.validate()?;
    Ok(config)
}

/// Runs the step and prints a one-line summary; true when the step passed
async fn run(config: &Config) -> bool {
    let host = HostEnv::from_process();
    let client = CoprClient::new(
        config.api_url.clone(),
        config.api_login.clone(),
        config.api_token.clone(),
    );

    let script = config.prepare_package.then(|| {
        ShellScript::new(
            config.package_script.clone().unwrap_or_default(),
            config.workspace.clone(),
        )
    });
    let packaging = script.as_ref().map(|s| s as &dyn PackagingStep);

    match publish(&config.request(), &host, packaging, &client).await {
        Ok(Outcome::Skipped) => {
            println!("{}", "Nothing to build in Copr.".yellow());
            true
        }
        Ok(Outcome::Scheduled(handle)) => {
            println!("{} {}", "✓ Copr build scheduled:".green(), handle);
            true
        }
        Ok(Outcome::Succeeded(handle)) => {
            println!("{} {}", "✓ Copr build succeeded:".green(), handle);
            true
        }
        Err(e) => {
            println!("{} {}", "✗ Copr step failed:".red(), e);
            false
        }
    }
}
