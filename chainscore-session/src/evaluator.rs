use anyhow::Result;
use async_trait::async_trait;
use chainscore_types::{AuxFactor, FactorName, FactorReport, Identity};
use std::collections::BTreeMap;
use std::time::Duration;

/// The evaluation step: produces raw per-factor scores for an identity.
/// May fail or take arbitrarily long; the session bounds it with a timeout.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, identity: &Identity) -> Result<FactorReport>;
}

/// Deterministic stand-in for a real scoring backend. Factor values are
/// derived from the blake3 digest of the lowercased address, mapped into
/// 50-99, so the same identity always scores the same.
pub struct DigestEvaluator {
    delay: Duration,
}

impl DigestEvaluator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Evaluator for DigestEvaluator {
    async fn evaluate(&self, identity: &Identity) -> Result<FactorReport> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let digest = blake3::hash(identity.as_str().to_ascii_lowercase().as_bytes());
        let bytes = digest.as_bytes();

        let mut core = BTreeMap::new();
        for (i, factor) in FactorName::ALL.iter().enumerate() {
            core.insert(*factor, 50 + bytes[i] % 50);
        }
        let mut auxiliary = BTreeMap::new();
        for (i, factor) in AuxFactor::ALL.iter().enumerate() {
            auxiliary.insert(*factor, 50 + bytes[FactorName::ALL.len() + i] % 50);
        }

        Ok(FactorReport { core, auxiliary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::parse("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap()
    }

    #[tokio::test]
    async fn digest_evaluator_is_deterministic() {
        let eval = DigestEvaluator::new(Duration::ZERO);
        let a = eval.evaluate(&identity()).await.unwrap();
        let b = eval.evaluate(&identity()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn digest_evaluator_ignores_address_casing() {
        let eval = DigestEvaluator::new(Duration::ZERO);
        let upper = Identity::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = Identity::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(
            eval.evaluate(&upper).await.unwrap(),
            eval.evaluate(&lower).await.unwrap()
        );
    }

    #[tokio::test]
    async fn digest_evaluator_values_in_range() {
        let eval = DigestEvaluator::new(Duration::ZERO);
        let report = eval.evaluate(&identity()).await.unwrap();
        assert_eq!(report.core.len(), FactorName::ALL.len());
        assert_eq!(report.auxiliary.len(), AuxFactor::ALL.len());
        for v in report.core.values().chain(report.auxiliary.values()) {
            assert!((50..100).contains(&(*v as i32)));
        }
    }
}
