//! Copr Core
//!
//! Core types shared by the Copr client and the publishing step.
//!
//! This crate contains:
//! - Domain types: build handles and build statuses
//! - DTOs: request and response payloads exchanged with the Copr API
//! - Secrets: credential values that never show up in logs

pub mod domain;
pub mod dto;
pub mod secret;

pub use secret::Secret;
