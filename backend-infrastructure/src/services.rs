pub mod health_service;
pub mod notification_service;

pub use health_service::*;
pub use notification_service::*;
