pub mod coefficient_queries;
pub mod dashboard_queries;
pub mod event_queries;
pub mod impact_queries;
pub mod job_queries;
pub mod volunteer_queries;
pub mod waste_queries;
