use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five weighted factors behind the composite score. Weights are fixed
/// protocol constants and must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactorName {
    RepaymentHistory,
    TransactionHistory,
    WalletActivity,
    AssetDiversity,
    OnChainReputation,
}

impl FactorName {
    pub const ALL: [FactorName; 5] = [
        FactorName::RepaymentHistory,
        FactorName::TransactionHistory,
        FactorName::WalletActivity,
        FactorName::AssetDiversity,
        FactorName::OnChainReputation,
    ];

    pub fn weight(self) -> f64 {
        match self {
            FactorName::RepaymentHistory => 0.35,
            FactorName::TransactionHistory => 0.25,
            FactorName::WalletActivity => 0.15,
            FactorName::AssetDiversity => 0.10,
            FactorName::OnChainReputation => 0.15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FactorName::RepaymentHistory => "Repayment history",
            FactorName::TransactionHistory => "Transaction history",
            FactorName::WalletActivity => "Wallet activity",
            FactorName::AssetDiversity => "Asset diversity",
            FactorName::OnChainReputation => "On-chain reputation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FactorName::RepaymentHistory => "Repayment behavior on historical loans",
            FactorName::TransactionHistory => "Volume, frequency and size of past transactions",
            FactorName::WalletActivity => "Wallet age and interaction frequency",
            FactorName::AssetDiversity => "Variety and distribution of held tokens",
            FactorName::OnChainReputation => "Verified-contract interactions and community participation",
        }
    }
}

/// Presentational factors. Shown as percentages alongside the score but
/// never part of the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuxFactor {
    TokenStaking,
    AiModelScore,
    ChainActivity,
    GovernanceHolding,
}

impl AuxFactor {
    pub const ALL: [AuxFactor; 4] = [
        AuxFactor::TokenStaking,
        AuxFactor::AiModelScore,
        AuxFactor::ChainActivity,
        AuxFactor::GovernanceHolding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AuxFactor::TokenStaking => "Token staking",
            AuxFactor::AiModelScore => "AI model score",
            AuxFactor::ChainActivity => "On-chain activity",
            AuxFactor::GovernanceHolding => "Governance token holding",
        }
    }
}

/// Raw per-factor scores produced by the evaluation step. All values 0-100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorReport {
    pub core: BTreeMap<FactorName, u8>,
    pub auxiliary: BTreeMap<AuxFactor, u8>,
}
