//! Response DTOs for the HTTP surface.

pub mod health;
