use serde::{Deserialize, Serialize};

use crate::models::Result;

/// One root website to investigate, plus the lead metadata carried
/// through to the persisted result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSite {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub institution_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetList {
    pub targets: Vec<TargetSite>,
}

pub async fn load_targets(path: &str) -> Result<Vec<TargetSite>> {
    let content = tokio::fs::read_to_string(path).await?;
    let list: TargetList = serde_yaml::from_str(&content)?;
    Ok(list.targets)
}
