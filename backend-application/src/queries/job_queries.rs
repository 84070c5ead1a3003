use backend_domain::JobStatus;

use crate::{AppError, AppState};

pub async fn job_status(state: &AppState) -> Result<JobStatus, AppError> {
    Ok(state.job_status.read().await.clone())
}
