//! Repository traits implemented by the infrastructure layer.

mod tracker_repository;

pub use tracker_repository::TrackerRepository;

#[cfg(test)]
pub use tracker_repository::MockTrackerRepository;
