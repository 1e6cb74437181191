use carmatch_core::config::BuyerConfig;
use carmatch_core::domain::conversation::{ConversationMessage, SessionCounters};
use carmatch_core::questionnaire::{GateOutcome, QuestionnaireGate};
use carmatch_core::quota::{QuotaDecision, RecommendationQuota};

/// What a buyer turn is allowed to do before any model or catalog access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDecision {
    /// Free recommendations are used up; reply with the upsell only.
    Upsell,
    /// The intake is done (or explicitly skipped); try to produce a match.
    Match { reason: GateOutcome },
    /// Keep interviewing through the buyer persona.
    Converse { answered: usize, required: usize },
}

impl TurnDecision {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Upsell => "quota_exhausted",
            Self::Match { reason: GateOutcome::ExplicitRequest } => "explicit_request",
            Self::Match { .. } => "questionnaire_complete",
            Self::Converse { .. } => "questionnaire_incomplete",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnPolicy {
    quota: RecommendationQuota,
    gate: QuestionnaireGate,
}

impl TurnPolicy {
    pub fn new(quota: RecommendationQuota, gate: QuestionnaireGate) -> Self {
        Self { quota, gate }
    }

    pub fn from_config(config: &BuyerConfig) -> Self {
        Self::new(
            RecommendationQuota::new(config.free_recommendations),
            QuestionnaireGate::new(config.questionnaire_turns, config.honor_explicit_requests),
        )
    }

    pub fn quota(&self) -> RecommendationQuota {
        self.quota
    }

    pub fn gate(&self) -> QuestionnaireGate {
        self.gate
    }

    /// The quota is checked first so an exhausted session never reaches the
    /// catalog or the model.
    pub fn evaluate(
        &self,
        messages: &[ConversationMessage],
        counters: SessionCounters,
    ) -> TurnDecision {
        if self.quota.check(counters) == QuotaDecision::LimitReached {
            return TurnDecision::Upsell;
        }

        match self.gate.evaluate(messages) {
            GateOutcome::Incomplete { answered, required } => {
                TurnDecision::Converse { answered, required }
            }
            reason => TurnDecision::Match { reason },
        }
    }
}
