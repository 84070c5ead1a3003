pub mod coefficient_commands;
pub mod event_commands;
pub mod volunteer_commands;
pub mod waste_commands;
