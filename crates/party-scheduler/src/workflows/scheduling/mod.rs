//! Party date poll: participant intake, response storage, and the
//! seniority-weighted scoring that picks the event date.

pub mod announcement;
pub mod csv_store;
pub mod domain;
pub mod ingestion;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use announcement::Announcement;
pub use csv_store::CsvResponseStore;
pub use domain::{
    parse_iso_date, CandidateDates, ConfigurationError, ParticipantResponse, PreferenceLevel,
    Role, ScheduleSetup,
};
pub use ingestion::{
    sanitize_submission, IngestionError, RawSubmission, SanitizedSubmission, ValidationWarning,
};
pub use repository::{RepositoryError, ResponseRepository};
pub use router::{schedule_router, ScoreRequest, ScoreView};
pub use scoring::{
    compute_scores, DateScore, EligibilityTier, RoleWeights, ScoreResult, ScoringEngine,
};
pub use service::{
    ScheduleOverview, SchedulingService, SchedulingServiceError, SubmissionReceipt,
};
