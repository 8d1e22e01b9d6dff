use chainscore_types::{CompositeResult, FactorName, FactorReport, ScoreError, Tier};
use tracing::debug;

#[cfg(test)]
mod tests;

/// Folds a factor report into the composite score and tier.
///
/// The five weighted factors must all be present; the composite is the
/// weight-rounded sum of their scores. Auxiliary factors pass through
/// untouched for display. Pure: identical input, identical output.
pub fn aggregate(report: &FactorReport) -> Result<CompositeResult, ScoreError> {
    let missing: Vec<FactorName> = FactorName::ALL
        .iter()
        .copied()
        .filter(|f| !report.core.contains_key(f))
        .collect();
    if !missing.is_empty() {
        return Err(ScoreError::IncompleteFactorSet { missing });
    }

    debug_assert!(
        (FactorName::ALL.iter().map(|f| f.weight()).sum::<f64>() - 1.0).abs() < 1e-6,
        "factor weights must sum to 1.0"
    );

    let weighted: f64 = FactorName::ALL
        .iter()
        .map(|&f| f.weight() * f64::from(report.core[&f].min(100)))
        .sum();

    // Weights sum to 1.0 and inputs are capped at 100, so this stays in 0-100.
    let score = weighted.round() as u8;
    let tier = Tier::from_score(score);
    debug!(score, %tier, "aggregated composite score");

    Ok(CompositeResult {
        score,
        tier,
        factors: report.auxiliary.clone(),
    })
}

/// Contribution of one factor to the composite, in score points.
pub fn contribution(factor: FactorName, score: u8) -> f64 {
    factor.weight() * f64::from(score.min(100))
}
