//! Liveness and readiness endpoints
//!
//! `/health/ready` pings both stores and answers 503 if either fails.

use crate::repositories::StoreResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<StoreChecks>,
}

impl HealthReport {
    fn new(status: &'static str, stores: Option<StoreChecks>) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            stores,
        }
    }
}

#[derive(Serialize)]
pub struct StoreChecks {
    pub accounts: StoreCheck,
    pub patients: StoreCheck,
}

#[derive(Serialize)]
pub struct StoreCheck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StoreResult<()>> for StoreCheck {
    fn from(result: StoreResult<()>) -> Self {
        match result {
            Ok(()) => Self { ok: true, error: None },
            Err(e) => Self {
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }
}

pub async fn health_check() -> Json<HealthReport> {
    Json(HealthReport::new("healthy", None))
}

pub async fn liveness_check() -> Json<HealthReport> {
    Json(HealthReport::new("alive", None))
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let stores = StoreChecks {
        accounts: state.accounts().ping().await.into(),
        patients: state.patients().ping().await.into(),
    };

    if stores.accounts.ok && stores.patients.ok {
        (StatusCode::OK, Json(HealthReport::new("ready", Some(stores))))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::new("not_ready", Some(stores))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::{
        MemoryAccountStore, PatientFilter, PatientRecord, PatientStore, StoreError,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use clinic_shared::validation::ValidatedPatient;
    use std::sync::Arc;

    /// Patient store whose database is down
    struct OfflinePatients;

    fn offline<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    #[async_trait]
    impl PatientStore for OfflinePatients {
        async fn insert(&self, _: &ValidatedPatient) -> StoreResult<PatientRecord> {
            offline()
        }
        async fn find_by_id(&self, _: i64) -> StoreResult<Option<PatientRecord>> {
            offline()
        }
        async fn find_by_identity(
            &self,
            _: &str,
            _: NaiveDate,
        ) -> StoreResult<Option<PatientRecord>> {
            offline()
        }
        async fn update(
            &self,
            _: i64,
            _: &ValidatedPatient,
        ) -> StoreResult<Option<PatientRecord>> {
            offline()
        }
        async fn delete(&self, _: i64) -> StoreResult<bool> {
            offline()
        }
        async fn list(&self, _: &PatientFilter, _: i64, _: i64) -> StoreResult<Vec<PatientRecord>> {
            offline()
        }
        async fn ping(&self) -> StoreResult<()> {
            offline()
        }
    }

    #[tokio::test]
    async fn test_health_and_liveness() {
        assert_eq!(health_check().await.status, "healthy");
        assert_eq!(liveness_check().await.status, "alive");
        assert!(!health_check().await.version.is_empty());
    }

    #[tokio::test]
    async fn test_ready_with_memory_stores() {
        let state = AppState::in_memory(AppConfig::default());
        let (status, report) = readiness_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.status, "ready");
    }

    #[tokio::test]
    async fn test_not_ready_when_patient_store_is_down() {
        let state = AppState::with_stores(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(OfflinePatients),
            AppConfig::default(),
        );

        let (status, report) = readiness_check(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let stores = report.stores.as_ref().unwrap();
        assert!(stores.accounts.ok);
        assert!(!stores.patients.ok);
        assert!(stores.patients.error.as_deref().unwrap().contains("connection refused"));
    }
}
