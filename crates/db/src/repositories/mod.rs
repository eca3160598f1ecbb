pub mod progress_repo;
pub mod worker_repo;

pub use progress_repo::ProgressRepo;
pub use worker_repo::WorkerRepo;
