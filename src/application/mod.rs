//! Application layer with the photo wall scheduling service.

/// Application services.
pub mod services;

pub use services::{FetchCompletion, FetchOutcome, PhotoWallScheduler, TaskId, TaskRegistry};
