//! Data Transfer Objects for the Copr API
//!
//! DTOs mirror what goes over the wire. They are loosely typed on purpose:
//! Copr omits fields freely, so everything is optional until it is turned
//! into a domain type.

pub mod build;
pub mod response;
