use serde::{Deserialize, Serialize};

use crate::region::RegionId;

/// One row of the county education dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    #[serde(rename = "fips")]
    pub id: RegionId,
    /// State abbreviation, e.g. `AL`.
    pub state: String,
    pub area_name: String,
    /// Percent of adults with a bachelor's degree or higher.
    #[serde(rename = "bachelorsOrHigher")]
    pub metric: f64,
}

impl StatRecord {
    pub fn label(&self) -> RegionLabel {
        RegionLabel {
            title: format!("{}, {}", self.area_name, self.state),
            detail: format!("{}% with Bachelor's degree or higher", self.metric),
            metric: self.metric,
        }
    }
}

/// Precomputed tooltip text for a region with data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLabel {
    pub title: String,
    pub detail: String,
    pub metric: f64,
}

impl RegionLabel {
    /// Single-line form, for logs and plain-text consumers.
    pub fn display_text(&self) -> String {
        format!("{}: {}", self.title, self.detail)
    }
}
