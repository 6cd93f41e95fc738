use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{parse_iso_date, CandidateDates, ParticipantResponse, PreferenceLevel, Role};

/// Submission as it arrives from the participant form: free-form labels
/// keyed by `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub role: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// Non-fatal issue found while sanitizing a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// The date is valid but not one of the candidate dates.
    UnrecognizedDate { date: NaiveDate },
    /// The answer key is not a calendar date at all.
    UnparseableDate { raw: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnrecognizedDate { date } => {
                write!(f, "{date} is not a candidate date; answer dropped")
            }
            ValidationWarning::UnparseableDate { raw } => {
                write!(f, "'{raw}' is not a YYYY-MM-DD date; answer dropped")
            }
        }
    }
}

/// Malformed submissions rejected before they reach the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestionError {
    #[error("unrecognized role '{0}'")]
    UnknownRole(String),
    #[error("unrecognized preference '{value}' for {date}")]
    UnknownPreference { date: NaiveDate, value: String },
}

/// A response ready for the store plus whatever was dropped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub response: ParticipantResponse,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a raw submission against the finalized candidate dates.
///
/// Answers for dates outside `dates` are dropped with a warning so late
/// responses cannot invalidate the date set. Every candidate date is present
/// in the resulting response, unanswered ones as `Undecided`.
pub fn sanitize_submission(
    raw: RawSubmission,
    dates: &CandidateDates,
) -> Result<SanitizedSubmission, IngestionError> {
    let role = Role::from_label(&raw.role)
        .ok_or_else(|| IngestionError::UnknownRole(raw.role.clone()))?;

    let mut preferences: BTreeMap<NaiveDate, PreferenceLevel> = dates
        .iter()
        .map(|date| (date, PreferenceLevel::Undecided))
        .collect();
    let mut warnings = Vec::new();

    for (key, value) in raw.answers {
        let Some(date) = parse_iso_date(&key) else {
            warnings.push(ValidationWarning::UnparseableDate { raw: key });
            continue;
        };

        if !dates.contains(date) {
            warnings.push(ValidationWarning::UnrecognizedDate { date });
            continue;
        }

        let level = PreferenceLevel::from_label(&value)
            .ok_or(IngestionError::UnknownPreference { date, value })?;
        preferences.insert(date, level);
    }

    for warning in &warnings {
        warn!(role = role.key(), %warning, "dropping answer outside the candidate dates");
    }

    Ok(SanitizedSubmission {
        response: ParticipantResponse { role, preferences },
        warnings,
    })
}
