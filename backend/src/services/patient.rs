//! Patient record service
//!
//! Validation runs identically on create and update; only create checks for
//! an existing record with the same name and birth date.

use crate::error::ApiError;
use crate::repositories::{PatientFilter, PatientRecord, PatientStore};
use chrono::Utc;
use clinic_shared::types::{PatientListQuery, PatientRequest, PatientResponse};
use clinic_shared::validation::validate_patient;
use clinic_shared::PatientError;
use tracing::info;

impl From<PatientRecord> for PatientResponse {
    fn from(record: PatientRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            birth_date: record.birth_date,
            health_conditions: record.health_conditions,
            gender: record.gender,
            address: record.address,
        }
    }
}

/// Patient service for record operations
pub struct PatientService;

impl PatientService {
    /// Validate and persist a new patient
    pub async fn create(
        store: &dyn PatientStore,
        request: &PatientRequest,
    ) -> Result<PatientRecord, ApiError> {
        let patient = validate_patient(request, Utc::now().date_naive())?;

        if store
            .find_by_identity(&patient.name, patient.birth_date)
            .await?
            .is_some()
        {
            return Err(PatientError::DuplicateRecord.into());
        }

        let record = store.insert(&patient).await?;
        info!(patient_id = record.id, "Patient created");
        Ok(record)
    }

    /// Overwrite all fields of an existing patient
    pub async fn update(
        store: &dyn PatientStore,
        id: i64,
        request: &PatientRequest,
    ) -> Result<PatientRecord, ApiError> {
        if store.find_by_id(id).await?.is_none() {
            return Err(PatientError::NotFound(id).into());
        }

        let patient = validate_patient(request, Utc::now().date_naive())?;

        // The row may have been deleted between the lookup and the write.
        let record = store
            .update(id, &patient)
            .await?
            .ok_or(PatientError::NotFound(id))?;

        info!(patient_id = id, "Patient updated");
        Ok(record)
    }

    /// Delete a patient
    pub async fn delete(store: &dyn PatientStore, id: i64) -> Result<(), ApiError> {
        if !store.delete(id).await? {
            return Err(PatientError::NotFound(id).into());
        }

        info!(patient_id = id, "Patient deleted");
        Ok(())
    }

    /// Fetch one patient
    pub async fn get(store: &dyn PatientStore, id: i64) -> Result<PatientRecord, ApiError> {
        store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PatientError::NotFound(id).into())
    }

    /// Filtered, paginated listing ordered by id
    pub async fn list(
        store: &dyn PatientStore,
        query: &PatientListQuery,
    ) -> Result<Vec<PatientRecord>, ApiError> {
        let filter = PatientFilter::from(query);
        Ok(store.list(&filter, query.skip(), query.limit()).await?)
    }
}
