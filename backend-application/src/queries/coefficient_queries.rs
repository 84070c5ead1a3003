use backend_domain::WasteCoefficient;

use crate::{AppError, AppState};

pub async fn list_coefficients(state: &AppState) -> Result<Vec<WasteCoefficient>, AppError> {
    Ok(state.coefficients.read().await.to_entries())
}
