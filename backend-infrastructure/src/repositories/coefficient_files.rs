use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use backend_domain::ports::CoefficientRepository;
use backend_domain::WasteCoefficient;

/// YAML-backed coefficient table. A missing file is an empty table.
pub struct CoefficientFileRepository;

impl CoefficientFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoefficientFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoefficientRepository for CoefficientFileRepository {
    async fn load_coefficients(&self, path: &str) -> anyhow::Result<Vec<WasteCoefficient>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<WasteCoefficient> = serde_yaml::from_str(&content)?;
        Ok(entries)
    }

    async fn save_coefficients(&self, path: &str, entries: &[WasteCoefficient]) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_yaml::to_string(entries)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
