//! Application layer: orchestration on top of the domain model.

pub mod registry;
pub mod services;
