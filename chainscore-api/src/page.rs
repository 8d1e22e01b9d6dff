use chainscore_analysis::{CombinedReport, CombinedScoreFeed, WashTradeCheck, WashTradeReport};
use chainscore_session::ScoreSession;
use chainscore_types::{ActiveView, AuxFactor, FactorName, QueryState, ScoreError, Tier};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything a client needs to render the scoring page for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageModel {
    Idle,
    Computing {
        address: String,
    },
    Failed {
        message: String,
        /// Only scoring-backend failures invite a re-submit.
        retryable: bool,
    },
    Ready {
        address: String,
        short_address: String,
        view: ActiveView,
        body: ViewBody,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewBody {
    BaseScore(BaseScoreView),
    AnomalyCheck(WashTradeReport),
    Combined(CombinedReport),
    /// The selected analysis component failed on its own; the core result
    /// stays intact.
    AnalysisFailed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseScoreView {
    pub score: u8,
    pub tier: Tier,
    pub recommendation: String,
    pub weighted_factors: Vec<FactorRow>,
    pub auxiliary_factors: Vec<AuxRow>,
}

/// One contribution bar: a weighted factor with its share of the composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorRow {
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub score: u8,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxRow {
    pub name: String,
    pub percent: u8,
}

/// Renders the current session state into a page model. The two analysis
/// views are computed here, lazily — only when actually selected.
pub async fn render(session: &ScoreSession, asset: &str) -> PageModel {
    match session.state() {
        QueryState::Idle | QueryState::Validating => PageModel::Idle,
        QueryState::Computing => {
            let address = session
                .identity()
                .map(|id| id.to_string())
                .unwrap_or_default();
            PageModel::Computing { address }
        }
        QueryState::Failed(e) => PageModel::Failed {
            message: e.to_string(),
            retryable: matches!(e, ScoreError::ScoringUnavailable),
        },
        QueryState::Ready(result) => {
            let Some(identity) = session.identity() else {
                // Ready without an identity cannot happen through the
                // state machine's transitions.
                return PageModel::Idle;
            };

            let body = match session.active_view() {
                ActiveView::BaseScore => {
                    let weighted_factors = FactorName::ALL
                        .iter()
                        .map(|&factor| {
                            let score = session
                                .factor_report()
                                .and_then(|r| r.core.get(&factor).copied())
                                .unwrap_or_default();
                            FactorRow {
                                name: factor.label().to_string(),
                                description: factor.description().to_string(),
                                weight: factor.weight(),
                                score,
                                contribution: chainscore_engine::contribution(factor, score),
                            }
                        })
                        .collect();
                    let auxiliary_factors = AuxFactor::ALL
                        .iter()
                        .filter_map(|&factor| {
                            result.factors.get(&factor).map(|&percent| AuxRow {
                                name: factor.label().to_string(),
                                percent,
                            })
                        })
                        .collect();
                    ViewBody::BaseScore(BaseScoreView {
                        score: result.score,
                        tier: result.tier,
                        recommendation: result.tier.recommendation().to_string(),
                        weighted_factors,
                        auxiliary_factors,
                    })
                }
                ActiveView::AnomalyCheck => {
                    let mut check =
                        WashTradeCheck::new(identity.clone(), Some(u32::from(result.score)));
                    match check.run().await {
                        Ok(report) => ViewBody::AnomalyCheck(report),
                        Err(e) => {
                            warn!(error = %e, "wash-trade check failed");
                            ViewBody::AnalysisFailed {
                                message: e.to_string(),
                            }
                        }
                    }
                }
                ActiveView::Combined => {
                    let mut feed = CombinedScoreFeed::new(identity.clone(), asset);
                    match feed.run().await {
                        Ok(report) => ViewBody::Combined(report),
                        Err(e) => {
                            warn!(error = %e, "combined score failed");
                            ViewBody::AnalysisFailed {
                                message: e.to_string(),
                            }
                        }
                    }
                }
            };

            PageModel::Ready {
                address: identity.to_string(),
                short_address: identity.short(),
                view: session.active_view(),
                body,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainscore_types::FactorReport;
    use std::collections::BTreeMap;

    const ADDR: &str = "0xABCDEF0123456789abcdef0123456789ABCDEF01";

    fn ready_session() -> ScoreSession {
        let mut session = ScoreSession::new();
        let ticket = session.submit(ADDR).unwrap().unwrap();

        let mut core = BTreeMap::new();
        core.insert(FactorName::RepaymentHistory, 92);
        core.insert(FactorName::TransactionHistory, 85);
        core.insert(FactorName::WalletActivity, 75);
        core.insert(FactorName::AssetDiversity, 65);
        core.insert(FactorName::OnChainReputation, 90);
        let mut auxiliary = BTreeMap::new();
        auxiliary.insert(AuxFactor::TokenStaking, 61);
        auxiliary.insert(AuxFactor::GovernanceHolding, 73);

        session.complete(&ticket, Ok(FactorReport { core, auxiliary }));
        session
    }

    #[tokio::test]
    async fn renders_idle_and_computing() {
        let mut session = ScoreSession::new();
        assert!(matches!(render(&session, "ETH").await, PageModel::Idle));

        session.submit(ADDR).unwrap().unwrap();
        match render(&session, "ETH").await {
            PageModel::Computing { address } => assert_eq!(address, ADDR),
            other => panic!("expected computing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn renders_failed_with_message() {
        let mut session = ScoreSession::new();
        let _ = session.submit("bogus");
        match render(&session, "ETH").await {
            PageModel::Failed { message, retryable } => {
                assert!(message.contains("valid wallet address"));
                assert!(!retryable);
            }
            other => panic!("expected failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn renders_base_score_with_contribution_bars() {
        let session = ready_session();
        let PageModel::Ready {
            short_address,
            view,
            body,
            ..
        } = render(&session, "ETH").await
        else {
            panic!("expected ready page");
        };
        assert_eq!(short_address, "0xABCD...EF01");
        assert_eq!(view, ActiveView::BaseScore);

        let ViewBody::BaseScore(base) = body else {
            panic!("expected base score view");
        };
        assert_eq!(base.score, 85);
        assert_eq!(base.tier, Tier::Excellent);
        assert_eq!(base.weighted_factors.len(), 5);
        assert_eq!(base.auxiliary_factors.len(), 2);

        let repayment = &base.weighted_factors[0];
        assert_eq!(repayment.name, "Repayment history");
        assert_eq!(repayment.score, 92);
        assert!((repayment.contribution - 32.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn analysis_views_render_lazily_from_the_same_result() {
        let mut session = ready_session();

        session.select_view(ActiveView::AnomalyCheck).unwrap();
        let PageModel::Ready { body, .. } = render(&session, "ETH").await else {
            panic!("expected ready page");
        };
        let ViewBody::AnomalyCheck(report) = body else {
            panic!("expected anomaly view");
        };
        // Seeded from the composite score, not the neutral default.
        assert!(report.adjusted_score <= 85);

        session.select_view(ActiveView::Combined).unwrap();
        let PageModel::Ready { body, .. } = render(&session, "ETH").await else {
            panic!("expected ready page");
        };
        let ViewBody::Combined(report) = body else {
            panic!("expected combined view");
        };
        assert_eq!(report.asset, "ETH");
        assert!(report.combined <= 100);

        // The underlying composite is untouched by view switches.
        assert_eq!(session.state().result().unwrap().score, 85);
    }
}
