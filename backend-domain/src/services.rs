// Pure domain services

pub mod impact;
pub mod lifecycle;
pub mod reminders;

pub use impact::*;
pub use lifecycle::*;
pub use reminders::*;
