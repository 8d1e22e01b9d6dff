pub mod evaluator;

pub use evaluator::{DigestEvaluator, Evaluator};

use anyhow::anyhow;
use chainscore_types::{ActiveView, FactorReport, Identity, QueryState, ScoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Tag handed out for each started evaluation. A completion only applies if
/// its generation still matches the session's; anything else is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalTicket {
    pub identity: Identity,
    pub generation: u64,
}

/// Per-session query state machine. Owns the query state, the active result
/// view, and the in-flight identity; never shared globally. All mutation
/// happens through `submit`, `complete`, `reset` and `select_view`.
#[derive(Debug, Default)]
pub struct ScoreSession {
    state: QueryState,
    view: ActiveView,
    identity: Option<Identity>,
    report: Option<FactorReport>,
    generation: u64,
}

impl ScoreSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn active_view(&self) -> ActiveView {
        self.view
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Raw factor scores behind the current `Ready` result, kept for the
    /// per-factor breakdown in the presentation layer.
    pub fn factor_report(&self) -> Option<&FactorReport> {
        self.report.as_ref()
    }

    /// Submit a raw address for scoring.
    ///
    /// Returns `Ok(Some(ticket))` when a new evaluation must be started,
    /// `Ok(None)` when the same identity is already being computed (no
    /// duplicate in-flight request), and `Err` on validation failure, which
    /// also moves the session to `Failed`.
    pub fn submit(&mut self, raw: &str) -> Result<Option<EvalTicket>, ScoreError> {
        let was_computing = self.state.is_computing();
        self.state = QueryState::Validating;

        let identity = match Identity::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "address validation failed");
                self.state = QueryState::Failed(e.clone());
                return Err(e);
            }
        };

        if was_computing && self.identity.as_ref() == Some(&identity) {
            // Same identity, evaluation already outstanding: keep waiting.
            debug!(address = %identity.short(), "duplicate submit ignored");
            self.state = QueryState::Computing;
            return Ok(None);
        }

        self.generation += 1;
        self.identity = Some(identity.clone());
        self.report = None;
        self.view = ActiveView::default();
        self.state = QueryState::Computing;
        info!(address = %identity.short(), generation = self.generation, "evaluation started");

        Ok(Some(EvalTicket {
            identity,
            generation: self.generation,
        }))
    }

    /// Apply the outcome of an evaluation. Completions whose generation no
    /// longer matches (superseded by a newer submit, or after a reset) are
    /// discarded without touching the state.
    pub fn complete(&mut self, ticket: &EvalTicket, outcome: anyhow::Result<FactorReport>) {
        if ticket.generation != self.generation || !self.state.is_computing() {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale evaluation result"
            );
            return;
        }

        match outcome {
            Ok(report) => match chainscore_engine::aggregate(&report) {
                Ok(result) => {
                    info!(score = result.score, tier = %result.tier, "score ready");
                    self.report = Some(report);
                    self.view = ActiveView::default();
                    self.state = QueryState::Ready(result);
                }
                Err(e) => {
                    // Broken evaluator contract; surfaced as unavailable.
                    error!(error = %e, "factor report rejected by aggregator");
                    self.state = QueryState::Failed(ScoreError::ScoringUnavailable);
                }
            },
            Err(e) => {
                warn!(error = %e, "evaluation failed");
                self.state = QueryState::Failed(ScoreError::ScoringUnavailable);
            }
        }
    }

    /// Back to `Idle`: result, identity and view selection are all cleared.
    pub fn reset(&mut self) {
        self.generation += 1; // orphan any in-flight evaluation
        self.identity = None;
        self.report = None;
        self.view = ActiveView::default();
        self.state = QueryState::Idle;
    }

    /// Switch the result view. Only allowed once a result is ready; never
    /// re-triggers computation.
    pub fn select_view(&mut self, view: ActiveView) -> Result<(), ScoreError> {
        if !self.state.is_ready() {
            return Err(ScoreError::NoResultAvailable);
        }
        self.view = view;
        Ok(())
    }
}

/// Validates and submits `raw`, then drives the evaluation on a background
/// task bounded by `eval_timeout`. The task writes its outcome back through
/// `complete`, so a superseded query can never overwrite a newer state.
pub async fn run_query(
    session: Arc<RwLock<ScoreSession>>,
    evaluator: Arc<dyn Evaluator>,
    eval_timeout: Duration,
    raw: &str,
) -> Result<(), ScoreError> {
    let ticket = session.write().await.submit(raw)?;
    let Some(ticket) = ticket else {
        return Ok(());
    };

    tokio::spawn(async move {
        let outcome = match tokio::time::timeout(eval_timeout, evaluator.evaluate(&ticket.identity)).await
        {
            Ok(res) => res,
            Err(_) => Err(anyhow!("evaluation timed out after {eval_timeout:?}")),
        };
        session.write().await.complete(&ticket, outcome);
    });

    Ok(())
}
