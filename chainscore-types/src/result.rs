use crate::factor::AuxFactor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Qualitative bucket derived from the composite score. The thresholds
/// partition 0-100 with no gaps: >=90, 80-89, 70-79, <70.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Exceptional,
    Excellent,
    Good,
    Fair,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            Tier::Exceptional
        } else if score >= 80 {
            Tier::Excellent
        } else if score >= 70 {
            Tier::Good
        } else {
            Tier::Fair
        }
    }

    /// One fixed advice string per tier, shown under the score.
    pub fn recommendation(self) -> &'static str {
        match self {
            Tier::Exceptional => {
                "Your credit score is exceptional. You qualify for the best lending rates and the highest limits."
            }
            Tier::Excellent => {
                "Your credit score is excellent. You qualify for favorable lending terms; increasing your token staking would raise it further."
            }
            Tier::Good => {
                "Your credit score is good. Lending services are available; more on-chain activity and governance participation would raise it."
            }
            Tier::Fair => {
                "Your credit score is fair. Increase token staking and on-chain activity, and take part in more DeFi activity to raise it."
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Exceptional => "Exceptional",
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Fair => "Fair",
        };
        f.write_str(s)
    }
}

/// The outcome of one successful query. Replaced wholesale on re-query,
/// cleared on reset. `factors` holds the presentational percentages only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub score: u8,
    pub tier: Tier,
    pub factors: BTreeMap<AuxFactor, u8>,
}
