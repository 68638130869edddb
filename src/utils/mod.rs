//! Small shared helpers.

pub mod append_slash;
