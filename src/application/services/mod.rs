pub mod fetch_worker;
pub mod photo_wall;
pub mod task_registry;

pub use fetch_worker::{FetchCompletion, FetchOutcome, FetchWorker};
pub use photo_wall::PhotoWallScheduler;
pub use task_registry::{FetchTask, TaskId, TaskRegistry};
