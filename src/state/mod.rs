//! Crawl task state tracking

mod task_state;

pub use task_state::TaskState;
