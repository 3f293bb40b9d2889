//! Scheduler layer
//!
//! Waits for a build that Copr has accepted. Nothing here submits builds;
//! the poller only ever queries the handle it was given.

pub mod poller;

pub use poller::{StatusPoller, WaitOutcome};
