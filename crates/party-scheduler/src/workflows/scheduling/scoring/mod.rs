mod config;
mod rules;
mod selection;

pub use config::RoleWeights;
pub use rules::EligibilityTier;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{CandidateDates, ConfigurationError, ParticipantResponse};
use selection::select_best;

/// Stateless scorer holding the role weight table.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: RoleWeights,
}

impl ScoringEngine {
    pub fn new(weights: RoleWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RoleWeights {
        &self.weights
    }

    /// Aggregate every response over `dates` and pick the winning date.
    ///
    /// `dates` is already non-empty, unique, and chronological. Every response role is checked against the weight table before any
    /// points are accumulated, so a misconfigured table never yields a
    /// partial result. Dates in a response that are not candidates are
    /// ignored; candidates a response leaves out count as `Undecided`.
    pub fn score(
        &self,
        dates: &CandidateDates,
        responses: &[ParticipantResponse],
    ) -> Result<ScoreResult, ConfigurationError> {
        let mut scores: BTreeMap<NaiveDate, u64> = dates.iter().map(|date| (date, 0)).collect();

        let weighted = responses
            .iter()
            .map(|response| {
                self.weights
                    .require(response.role)
                    .map(|weight| (response, weight))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        for (response, weight) in weighted {
            for (date, score) in scores.iter_mut() {
                *score += rules::contribution(response.role, weight, response.preference(*date));
            }
        }

        let (best_date, best_score) = select_best(dates, &scores);

        debug!(
            dates = scores.len(),
            responses = responses.len(),
            %best_date,
            best_score,
            "scored candidate dates"
        );

        Ok(ScoreResult {
            scores,
            best_date,
            best_score,
            response_count: responses.len(),
        })
    }
}

/// Convenience wrapper around [`ScoringEngine::score`].
pub fn compute_scores(
    dates: &CandidateDates,
    responses: &[ParticipantResponse],
    weights: &RoleWeights,
) -> Result<ScoreResult, ConfigurationError> {
    ScoringEngine::new(weights.clone()).score(dates, responses)
}

/// Outcome of one scoring run. Only `best_date` and `best_score` are meant
/// for downstream consumers such as the announcement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub scores: BTreeMap<NaiveDate, u64>,
    pub best_date: NaiveDate,
    pub best_score: u64,
    pub response_count: usize,
}

impl ScoreResult {
    pub fn score_for(&self, date: NaiveDate) -> Option<u64> {
        self.scores.get(&date).copied()
    }

    /// Dates by descending score, earlier dates first on ties.
    pub fn ranking(&self) -> Vec<DateScore> {
        let mut ranked: Vec<DateScore> = self
            .scores
            .iter()
            .map(|(date, score)| DateScore {
                date: *date,
                score: *score,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.date.cmp(&b.date)));
        ranked
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateScore {
    pub date: NaiveDate,
    pub score: u64,
}
