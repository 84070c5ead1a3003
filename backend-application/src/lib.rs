// Backend Application Layer

pub mod commands;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod queries;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::AppError;
pub use jobs::{JobGates, JobScheduler, SchedulerHandle};
pub use metrics::Metrics;
pub use state::AppState;
