//! Known financial report types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Report type a document can be identified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Holdings broken down by asset class
    AssetAllocation,
    /// Returns over one or more periods
    Performance,
}

impl ReportType {
    /// Every known report type
    pub fn all() -> &'static [ReportType] {
        &[ReportType::AssetAllocation, ReportType::Performance]
    }

    /// Stable snake_case key (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::AssetAllocation => "asset_allocation",
            ReportType::Performance => "performance",
        }
    }

    /// Human-readable document title
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::AssetAllocation => "Asset Allocation Report",
            ReportType::Performance => "Performance Report",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown report type: '{}'", s))
    }
}
