// Background jobs: status transitions, impact generation, reminders

pub mod gate;
pub mod impact_generation;
pub mod reminders;
pub mod runner;
pub mod scheduler;
pub mod status_transition;

pub use gate::*;
pub use impact_generation::*;
pub use reminders::*;
pub use runner::*;
pub use scheduler::*;
pub use status_transition::*;
