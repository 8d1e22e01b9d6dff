//! The two specialized analysis views: wash-trade detection and the
//! combined multi-source score. Both are opaque collaborators to the core
//! query machinery — they take an identity (plus a seed score or an asset
//! symbol), run on demand, and own their own loading/error state.

pub mod anomaly;
pub mod combined;

use serde::{Deserialize, Serialize};

pub use anomaly::{WashTradeCheck, WashTradeReport, DEFAULT_SEED_SCORE};
pub use combined::{CombinedReport, CombinedScoreFeed, SourceScore};

/// Loading state of one analysis component, independent of the core query
/// state machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum AnalysisState<T> {
    #[default]
    NotStarted,
    Running,
    Done(T),
    Failed(String),
}

impl<T> AnalysisState<T> {
    pub fn report(&self) -> Option<&T> {
        match self {
            AnalysisState::Done(r) => Some(r),
            _ => None,
        }
    }
}
