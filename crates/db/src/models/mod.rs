pub mod daily_progress;
pub mod worker;

pub use daily_progress::DailyProgress;
pub use worker::Worker;
