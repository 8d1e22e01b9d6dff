use crate::error::ScoreError;
use crate::result::CompositeResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of one score query. Exactly one instance per session, owned by
/// the session state machine; all mutation goes through its transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryState {
    #[default]
    Idle,
    Validating,
    Computing,
    Ready(CompositeResult),
    Failed(ScoreError),
}

impl QueryState {
    pub fn is_ready(&self) -> bool {
        matches!(self, QueryState::Ready(_))
    }

    pub fn is_computing(&self) -> bool {
        matches!(self, QueryState::Computing)
    }

    pub fn result(&self) -> Option<&CompositeResult> {
        match self {
            QueryState::Ready(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScoreError> {
        match self {
            QueryState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Which of the three result views is shown once a result is ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    BaseScore,
    AnomalyCheck,
    Combined,
}

impl FromStr for ActiveView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" | "base_score" | "score" => Ok(ActiveView::BaseScore),
            "anomaly" | "anomaly_check" | "wash_trade" => Ok(ActiveView::AnomalyCheck),
            "combined" => Ok(ActiveView::Combined),
            other => Err(format!("unknown view: {other}")),
        }
    }
}
