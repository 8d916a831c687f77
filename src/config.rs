use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::loader::parser::parse_json_file;

/// Lowest OSPF interface metric.
pub const MIN_COST: u32 = 1;

/// Highest OSPF interface metric.
pub const MAX_COST: u32 = 65535;

/// Tuning knobs for every analysis in the crate.
///
/// All sections fall back to their defaults, so a config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub ingestion: IngestionConfig,
    pub enumeration: EnumerationConfig,
    pub aggregation: AggregationConfig,
    pub impact: ImpactConfig,
    pub batch: BatchConfig,
}

impl AnalysisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: AnalysisConfig = parse_json_file(path)?;
        log::debug!("Loaded analysis config: {:?}", config);
        Ok(config)
    }
}

/// What ingestion does with a link cost outside `MIN_COST..=MAX_COST`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostPolicy {
    #[default]
    Reject,
    Clamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestionConfig {
    pub cost_policy: CostPolicy,
}

/// Bounds for the backtracking path enumerator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnumerationConfig {
    /// Candidates collected per requested path before ranking.
    pub candidate_multiplier: usize,

    /// Floor for the internal candidate bound, so small limits still rank a useful pool.
    pub min_candidates: usize,

    /// Hard cap on DFS edge expansions for a single query.
    pub max_expansions: usize,

    /// Optional cap on path length in hops.
    pub max_hops: Option<usize>,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self { candidate_multiplier: 10, min_candidates: 50, max_expansions: 200_000, max_hops: None }
    }
}

impl EnumerationConfig {
    pub fn candidate_bound(&self, limit: usize) -> usize {
        limit.saturating_mul(self.candidate_multiplier).max(self.min_candidates).max(limit)
    }
}

/// Representative sampling for group-to-group queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregationConfig {
    /// Groups with more members than this are sampled.
    pub sample_threshold: usize,
    pub max_representatives: usize,
    pub per_pair_limit: usize,
    pub overall_limit: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { sample_threshold: 4, max_representatives: 4, per_pair_limit: 3, overall_limit: 10 }
    }
}

/// Severity thresholds and risk score weights for impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImpactConfig {
    /// A cost increase strictly above this is `major`.
    pub major_absolute_increase: u64,

    /// A cost increase strictly above this fraction of the old cost is `major`.
    pub major_relative_increase: f64,

    pub affected_weight: f64,
    pub magnitude_weight: f64,
    pub transit_weight: f64,
    pub broken_pair_penalty: f64,
    pub broken_penalty_cap: f64,

    /// Number of changed transit groups at which the transit component saturates.
    pub transit_saturation: usize,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            major_absolute_increase: 100,
            major_relative_increase: 0.5,
            affected_weight: 35.0,
            magnitude_weight: 25.0,
            transit_weight: 15.0,
            broken_pair_penalty: 5.0,
            broken_penalty_cap: 25.0,
            transit_saturation: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    /// Return finished pairs when a batch is cancelled instead of failing with `Error::Cancelled`.
    pub keep_partial_on_cancel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { keep_partial_on_cancel: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{ "aggregation": { "maxRepresentatives": 2 }, "ingestion": { "costPolicy": "clamp" } }"#).unwrap();

        assert_eq!(config.aggregation.max_representatives, 2);
        assert_eq!(config.aggregation.per_pair_limit, 3);
        assert_eq!(config.ingestion.cost_policy, CostPolicy::Clamp);
        assert_eq!(config.enumeration, EnumerationConfig::default());
    }

    #[test]
    fn test_candidate_bound_never_below_limit() {
        let config = EnumerationConfig { candidate_multiplier: 0, min_candidates: 0, ..Default::default() };
        assert_eq!(config.candidate_bound(7), 7);
        assert_eq!(EnumerationConfig::default().candidate_bound(2), 50);
        assert_eq!(EnumerationConfig::default().candidate_bound(20), 200);
    }
}
