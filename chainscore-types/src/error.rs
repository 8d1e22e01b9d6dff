use crate::factor::FactorName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong between a submitted address and a rendered
/// score. Validation failures are terminal for the submission; a
/// `ScoringUnavailable` invites a re-submit.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreError {
    #[error("please enter a wallet address")]
    EmptyInput,

    #[error("please enter a valid wallet address (0x followed by 40 hex characters)")]
    MalformedIdentity,

    /// Contract violation: the evaluator returned a report without all five
    /// weighted factors. Should never happen with a correctly wired backend.
    #[error("factor report missing required factors: {missing:?}")]
    IncompleteFactorSet { missing: Vec<FactorName> },

    #[error("scoring service unavailable, please try again")]
    ScoringUnavailable,

    /// Contract violation: a result view was requested before any result.
    #[error("no score result available")]
    NoResultAvailable,
}
