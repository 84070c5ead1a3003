pub mod dashboard_handlers;
pub mod event_handlers;
pub mod impact_handlers;
pub mod ops_handlers;
pub mod volunteer_handlers;
pub mod waste_handlers;

pub use dashboard_handlers::*;
pub use event_handlers::*;
pub use impact_handlers::*;
pub use ops_handlers::*;
pub use volunteer_handlers::*;
pub use waste_handlers::*;
