use std::collections::HashSet;

use tracing::info;

use backend_domain::{CoefficientTable, WasteCoefficient};

use crate::{AppError, AppState};

pub async fn update_coefficients(
    state: &AppState,
    incoming: Vec<WasteCoefficient>,
) -> Result<(), AppError> {
    let mut entries = Vec::with_capacity(incoming.len());
    let mut seen = HashSet::new();
    for entry in incoming {
        let normalized = entry.normalized();
        if normalized.category.is_empty() || normalized.subcategory.is_empty() {
            return Err(AppError::BadRequest(
                "category and subcategory are required".to_string(),
            ));
        }
        if !normalized.carbon_footprint_per_kg.is_finite()
            || normalized.carbon_footprint_per_kg < 0.0
        {
            return Err(AppError::BadRequest(format!(
                "invalid carbon_footprint_per_kg for '{}'",
                normalized.kind()
            )));
        }
        if !seen.insert(normalized.kind()) {
            return Err(AppError::BadRequest(format!(
                "duplicate coefficient for '{}'",
                normalized.kind()
            )));
        }
        entries.push(normalized);
    }
    entries.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.subcategory.cmp(&b.subcategory))
    });

    state
        .coefficient_repo
        .save_coefficients(&state.config.coefficients_path, &entries)
        .await?;
    *state.coefficients.write().await = CoefficientTable::from_entries(&entries);
    info!(entries = entries.len(), "waste coefficients replaced");
    Ok(())
}
