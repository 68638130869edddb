//! Core domain: entities, the tracked-type capability contract, and
//! repository traits.

pub mod entities;
pub mod repositories;
pub mod tracked;
