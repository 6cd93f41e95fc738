use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::scheduling::domain::{
    CandidateDates, ParticipantResponse, PreferenceLevel, Role, ScheduleSetup,
};
use crate::workflows::scheduling::ingestion::RawSubmission;
use crate::workflows::scheduling::repository::{RepositoryError, ResponseRepository};
use crate::workflows::scheduling::scoring::RoleWeights;
use crate::workflows::scheduling::service::SchedulingService;

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).expect("valid date")
}

pub(super) fn two_days() -> CandidateDates {
    CandidateDates::new(vec![day(1), day(2)]).expect("valid dates")
}

pub(super) fn setup() -> ScheduleSetup {
    ScheduleSetup::new(day(1), day(3), day(5), "Izakaya near the office").expect("valid setup")
}

pub(super) fn scenario_weights() -> RoleWeights {
    RoleWeights::new([(Role::Staff, 1), (Role::Manager, 3)]).expect("positive weights")
}

/// Staff firmly free on day 1; manager tentative on day 1, firm on day 2.
pub(super) fn scenario_responses() -> Vec<ParticipantResponse> {
    vec![
        ParticipantResponse::new(Role::Staff)
            .with_preference(day(1), PreferenceLevel::DefinitelyCan)
            .with_preference(day(2), PreferenceLevel::Undecided),
        ParticipantResponse::new(Role::Manager)
            .with_preference(day(1), PreferenceLevel::ProbablyCan)
            .with_preference(day(2), PreferenceLevel::DefinitelyCan),
    ]
}

pub(super) fn answer(role: Role, day_choices: &[(u32, PreferenceLevel)]) -> ParticipantResponse {
    day_choices
        .iter()
        .fold(ParticipantResponse::new(role), |response, (d, level)| {
            response.with_preference(day(*d), *level)
        })
}

pub(super) fn raw_submission(role: &str, answers: &[(&str, &str)]) -> RawSubmission {
    RawSubmission {
        role: role.to_string(),
        answers: answers
            .iter()
            .map(|(date, level)| (date.to_string(), level.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    responses: Arc<Mutex<Vec<ParticipantResponse>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<ParticipantResponse> {
        self.responses.lock().expect("repository mutex poisoned").clone()
    }
}

impl ResponseRepository for MemoryRepository {
    fn append(&self, response: ParticipantResponse) -> Result<u64, RepositoryError> {
        let mut guard = self.responses.lock().expect("repository mutex poisoned");
        guard.push(response);
        Ok(guard.len() as u64)
    }

    fn list_all(&self) -> Result<Vec<ParticipantResponse>, RepositoryError> {
        Ok(self.stored())
    }
}

pub(super) struct UnavailableRepository;

impl ResponseRepository for UnavailableRepository {
    fn append(&self, _response: ParticipantResponse) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<ParticipantResponse>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (SchedulingService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = SchedulingService::new(
        setup(),
        Arc::new(repository.clone()),
        RoleWeights::standard(),
    );
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
