use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use party_scheduler::config::parse_role_weights;
use party_scheduler::workflows::scheduling::{
    parse_iso_date, ParticipantResponse, RepositoryError, ResponseRepository, RoleWeights,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResponseRepository {
    responses: Arc<Mutex<Vec<ParticipantResponse>>>,
}

impl ResponseRepository for InMemoryResponseRepository {
    fn append(&self, response: ParticipantResponse) -> Result<u64, RepositoryError> {
        let mut guard = self.responses.lock().expect("repository mutex poisoned");
        guard.push(response);
        let sequence = guard.len() as u64;
        debug!(sequence, "stored response in memory");
        Ok(sequence)
    }

    fn list_all(&self) -> Result<Vec<ParticipantResponse>, RepositoryError> {
        let guard = self.responses.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

pub(crate) fn parse_weights(raw: &str) -> Result<RoleWeights, String> {
    parse_role_weights(raw).map_err(|err| err.to_string())
}
