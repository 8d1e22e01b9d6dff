use crate::AnalysisState;
use anyhow::{bail, Result};
use chainscore_types::Identity;
use serde::{Deserialize, Serialize};
use tracing::info;

/// External scoring sources consulted by the combined view, with their
/// track-record weights.
const SOURCES: &[(&str, f64)] = &[
    ("chainwatch", 1.0),
    ("trustgraph", 0.9),
    ("ledgerlens", 0.8),
    ("scorestream", 1.0),
    ("graphsight", 0.7),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceScore {
    pub source: String,
    pub score: u8,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedReport {
    pub identity: Identity,
    pub asset: String,
    /// Weighted mean of the inlier sources, 0-100.
    pub combined: u8,
    pub sources: Vec<SourceScore>,
}

/// Aggregates per-source scores for (identity, asset) with MAD outlier
/// rejection and a weighted mean. Source values are digest-derived
/// stand-ins for real provider calls.
pub struct CombinedScoreFeed {
    identity: Identity,
    asset: String,
    state: AnalysisState<CombinedReport>,
}

impl CombinedScoreFeed {
    pub fn new(identity: Identity, asset: &str) -> Self {
        Self {
            identity,
            asset: asset.to_uppercase(),
            state: AnalysisState::NotStarted,
        }
    }

    pub fn state(&self) -> &AnalysisState<CombinedReport> {
        &self.state
    }

    pub async fn run(&mut self) -> Result<CombinedReport> {
        self.state = AnalysisState::Running;
        let sources = self.fetch_source_scores();
        match Self::aggregate(&sources) {
            Ok(combined) => {
                let report = CombinedReport {
                    identity: self.identity.clone(),
                    asset: self.asset.clone(),
                    combined,
                    sources,
                };
                info!(address = %self.identity.short(), asset = %self.asset, combined, "combined score ready");
                self.state = AnalysisState::Done(report.clone());
                Ok(report)
            }
            Err(e) => {
                self.state = AnalysisState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn fetch_source_scores(&self) -> Vec<SourceScore> {
        SOURCES
            .iter()
            .map(|(source, weight)| {
                let digest = blake3::hash(
                    format!(
                        "{source}:{}:{}",
                        self.asset,
                        self.identity.as_str().to_ascii_lowercase()
                    )
                    .as_bytes(),
                );
                SourceScore {
                    source: (*source).to_string(),
                    score: 40 + digest.as_bytes()[0] % 60,
                    weight: *weight,
                }
            })
            .collect()
    }

    /// Median absolute deviation rejection, then a weighted mean of the
    /// surviving sources.
    fn aggregate(sources: &[SourceScore]) -> Result<u8> {
        if sources.len() < 3 {
            bail!("insufficient scoring sources: {}", sources.len());
        }

        let mut sorted: Vec<f64> = sources.iter().map(|s| f64::from(s.score)).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = sorted[sorted.len() / 2];
        let mad: f64 =
            sorted.iter().map(|s| (s - median).abs()).sum::<f64>() / sorted.len() as f64;

        let inliers: Vec<&SourceScore> = sources
            .iter()
            .filter(|s| (f64::from(s.score) - median).abs() <= 3.0 * mad.max(1.0))
            .collect();
        if inliers.is_empty() {
            bail!("all scoring sources rejected as outliers");
        }

        let weight_sum: f64 = inliers.iter().map(|s| s.weight).sum();
        let weighted: f64 = inliers
            .iter()
            .map(|s| f64::from(s.score) * s.weight)
            .sum::<f64>()
            / weight_sum;

        Ok(weighted.round().clamp(0.0, 100.0) as u8)
    }
}
