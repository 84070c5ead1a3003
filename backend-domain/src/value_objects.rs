// Domain value objects
pub mod event_status;
pub mod identifiers;
pub mod waste_kind;

pub use event_status::*;
pub use identifiers::*;
pub use waste_kind::*;
