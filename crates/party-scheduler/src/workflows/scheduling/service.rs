use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::domain::{ConfigurationError, Role, ScheduleSetup};
use super::ingestion::{sanitize_submission, IngestionError, RawSubmission, ValidationWarning};
use super::repository::{RepositoryError, ResponseRepository};
use super::scoring::{RoleWeights, ScoreResult, ScoringEngine};

/// Service composing the poll setup, response store, and scoring engine.
pub struct SchedulingService<R> {
    setup: ScheduleSetup,
    repository: Arc<R>,
    engine: ScoringEngine,
}

impl<R> SchedulingService<R>
where
    R: ResponseRepository + 'static,
{
    pub fn new(setup: ScheduleSetup, repository: Arc<R>, weights: RoleWeights) -> Self {
        Self {
            setup,
            repository,
            engine: ScoringEngine::new(weights),
        }
    }

    pub fn setup(&self) -> &ScheduleSetup {
        &self.setup
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Sanitize a participant submission and append it to the store.
    pub fn submit(&self, raw: RawSubmission) -> Result<SubmissionReceipt, SchedulingServiceError> {
        let sanitized = sanitize_submission(raw, &self.setup.dates)?;
        let role = sanitized.response.role;
        let sequence = self.repository.append(sanitized.response)?;

        Ok(SubmissionReceipt {
            sequence,
            role,
            warnings: sanitized.warnings,
        })
    }

    /// Score the current snapshot on demand.
    pub fn score(&self) -> Result<ScoreResult, SchedulingServiceError> {
        let responses = self.repository.list_all()?;
        let result = self.engine.score(&self.setup.dates, &responses)?;

        info!(
            responses = result.response_count,
            best_date = %result.best_date,
            best_score = result.best_score,
            "computed party date scores"
        );

        Ok(result)
    }

    /// Score only once the response deadline has passed.
    pub fn finalize(&self, today: NaiveDate) -> Result<ScoreResult, SchedulingServiceError> {
        if !self.setup.deadline_passed(today) {
            return Err(SchedulingServiceError::DeadlinePending {
                deadline: self.setup.deadline,
            });
        }

        self.score()
    }

    pub fn overview(&self, today: NaiveDate) -> Result<ScheduleOverview, SchedulingServiceError> {
        let response_count = self.repository.list_all()?.len();

        Ok(ScheduleOverview {
            dates: self.setup.dates.as_slice().to_vec(),
            deadline: self.setup.deadline,
            comment: self.setup.comment.clone(),
            deadline_passed: self.setup.deadline_passed(today),
            response_count,
        })
    }
}

/// Acknowledgement returned to a participant after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub sequence: u64,
    pub role: Role,
    pub warnings: Vec<ValidationWarning>,
}

/// Participant-facing view of the poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOverview {
    pub dates: Vec<NaiveDate>,
    pub deadline: NaiveDate,
    pub comment: String,
    pub deadline_passed: bool,
    pub response_count: usize,
}

/// Error raised by the scheduling service.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingServiceError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("responses are open until {deadline}")]
    DeadlinePending { deadline: NaiveDate },
}
