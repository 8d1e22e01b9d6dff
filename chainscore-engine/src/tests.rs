use super::*;
use chainscore_types::AuxFactor;
use std::collections::BTreeMap;

fn report(repayment: u8, transactions: u8, activity: u8, diversity: u8, reputation: u8) -> FactorReport {
    let mut core = BTreeMap::new();
    core.insert(FactorName::RepaymentHistory, repayment);
    core.insert(FactorName::TransactionHistory, transactions);
    core.insert(FactorName::WalletActivity, activity);
    core.insert(FactorName::AssetDiversity, diversity);
    core.insert(FactorName::OnChainReputation, reputation);
    FactorReport {
        core,
        auxiliary: BTreeMap::new(),
    }
}

#[test]
fn test_reference_vector() {
    // round(0.35*92 + 0.25*85 + 0.15*75 + 0.10*65 + 0.15*90) = round(84.7) = 85
    let result = aggregate(&report(92, 85, 75, 65, 90)).unwrap();
    assert_eq!(result.score, 85);
    assert_eq!(result.tier, Tier::Excellent);
}

#[test]
fn test_score_bounds() {
    let zero = aggregate(&report(0, 0, 0, 0, 0)).unwrap();
    assert_eq!(zero.score, 0);
    assert_eq!(zero.tier, Tier::Fair);

    let full = aggregate(&report(100, 100, 100, 100, 100)).unwrap();
    assert_eq!(full.score, 100);
    assert_eq!(full.tier, Tier::Exceptional);
}

#[test]
fn test_out_of_range_inputs_clamped() {
    // u8 allows up to 255; anything above 100 counts as 100.
    let result = aggregate(&report(255, 255, 255, 255, 255)).unwrap();
    assert_eq!(result.score, 100);
}

#[test]
fn test_deterministic() {
    let r = report(92, 85, 75, 65, 90);
    assert_eq!(aggregate(&r).unwrap(), aggregate(&r).unwrap());
}

#[test]
fn test_incomplete_factor_set_rejected() {
    let mut r = report(92, 85, 75, 65, 90);
    r.core.remove(&FactorName::AssetDiversity);
    r.core.remove(&FactorName::OnChainReputation);

    match aggregate(&r) {
        Err(ScoreError::IncompleteFactorSet { missing }) => {
            assert_eq!(
                missing,
                vec![FactorName::AssetDiversity, FactorName::OnChainReputation]
            );
        }
        other => panic!("expected IncompleteFactorSet, got {other:?}"),
    }
}

#[test]
fn test_auxiliary_factors_pass_through_unweighted() {
    let mut r = report(92, 85, 75, 65, 90);
    r.auxiliary.insert(AuxFactor::TokenStaking, 10);
    r.auxiliary.insert(AuxFactor::GovernanceHolding, 99);

    let with_aux = aggregate(&r).unwrap();
    let without_aux = aggregate(&report(92, 85, 75, 65, 90)).unwrap();

    // Auxiliary values show up in the result but never move the score.
    assert_eq!(with_aux.score, without_aux.score);
    assert_eq!(with_aux.factors.get(&AuxFactor::TokenStaking), Some(&10));
}

#[test]
fn test_tier_boundaries_via_uniform_scores() {
    // Uniform factor scores make the composite equal to the input value.
    for (input, tier) in [
        (90, Tier::Exceptional),
        (89, Tier::Excellent),
        (80, Tier::Excellent),
        (79, Tier::Good),
        (70, Tier::Good),
        (69, Tier::Fair),
    ] {
        let result = aggregate(&report(input, input, input, input, input)).unwrap();
        assert_eq!(result.score, input);
        assert_eq!(result.tier, tier, "score {input}");
    }
}

#[test]
fn test_contribution_points() {
    assert!((contribution(FactorName::RepaymentHistory, 92) - 32.2).abs() < 1e-9);
    assert!((contribution(FactorName::AssetDiversity, 65) - 6.5).abs() < 1e-9);
}
