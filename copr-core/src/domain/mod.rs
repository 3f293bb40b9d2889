//! Core domain types
//!
//! These types describe a build once Copr has accepted it. They are created
//! by the client from decoded responses and only ever read afterwards.

pub mod build;
