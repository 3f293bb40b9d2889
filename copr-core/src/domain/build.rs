//! Build domain types

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identifies a build scheduled in Copr
///
/// A single submission may schedule several builds (one per chroot batch), so
/// the handle carries every identifier Copr returned. Handles are never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildHandle {
    ids: Vec<String>,
}

impl BuildHandle {
    /// Creates a handle from the identifiers returned by Copr
    ///
    /// Returns `None` when `ids` is empty: a handle always points at
    /// something that can be queried.
    pub fn new<I, S>(ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| !id.trim().is_empty())
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(Self { ids })
        }
    }

    /// All build identifiers in submission order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl fmt::Display for BuildHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids.join(", "))
    }
}

/// Status of a Copr build as reported by the status endpoint
///
/// Only `Pending` and `Running` are in progress. Every other variant is
/// terminal, and only `Succeeded` counts as success. Statuses this crate does
/// not know about land in `Unknown` with the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Skipped,
    Unknown(String),
}

impl BuildStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BuildStatus::Pending => "pending",
            BuildStatus::Running => "running",
            BuildStatus::Succeeded => "succeeded",
            BuildStatus::Failed => "failed",
            BuildStatus::Canceled => "canceled",
            BuildStatus::Skipped => "skipped",
            BuildStatus::Unknown(text) => text,
        }
    }

    /// Whether the build is still moving towards a terminal state
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::Pending | BuildStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_in_progress()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Succeeded)
    }

    /// Folds the statuses of every build behind one handle into one status
    ///
    /// A terminal non-success status wins over everything else, then any
    /// in-progress status (`Pending` before `Running`), and the result is
    /// `Succeeded` only when every build succeeded. Returns `None` for an
    /// empty input.
    pub fn aggregate<I>(statuses: I) -> Option<BuildStatus>
    where
        I: IntoIterator<Item = BuildStatus>,
    {
        let mut pending = false;
        let mut running = false;
        let mut seen = false;

        for status in statuses {
            seen = true;
            match status {
                BuildStatus::Succeeded => {}
                BuildStatus::Pending => pending = true,
                BuildStatus::Running => running = true,
                failed => return Some(failed),
            }
        }

        if !seen {
            None
        } else if pending {
            Some(BuildStatus::Pending)
        } else if running {
            Some(BuildStatus::Running)
        } else {
            Some(BuildStatus::Succeeded)
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for BuildStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_lowercase().as_str() {
            "pending" | "waiting" | "importing" => BuildStatus::Pending,
            "running" | "starting" => BuildStatus::Running,
            "succeeded" => BuildStatus::Succeeded,
            "failed" => BuildStatus::Failed,
            "canceled" | "cancelled" => BuildStatus::Canceled,
            "skipped" => BuildStatus::Skipped,
            _ => BuildStatus::Unknown(s.trim().to_string()),
        };
        Ok(status)
    }
}

impl From<&str> for BuildStatus {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}
