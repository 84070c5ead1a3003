// Domain entities

pub mod coefficient;
pub mod config;
pub mod dashboard;
pub mod event;
pub mod impact;
pub mod job_status;
pub mod notification;
pub mod volunteer;
pub mod waste;

pub use coefficient::*;
pub use config::*;
pub use dashboard::*;
pub use event::*;
pub use impact::*;
pub use job_status::*;
pub use notification::*;
pub use volunteer::*;
pub use waste::*;
