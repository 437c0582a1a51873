//! Patient repository

use super::StoreResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_shared::types::PatientListQuery;
use clinic_shared::validation::ValidatedPatient;
use sqlx::{PgPool, Postgres, QueryBuilder};

/// Patient row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PatientRecord {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub health_conditions: String,
    pub gender: String,
    pub address: String,
}

/// Listing filters
///
/// Text filters are case-insensitive substring matches; `birth_date` and
/// `id` match exactly. Blank text filters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub health_conditions: Option<String>,
    pub address: Option<String>,
    pub id: Option<i64>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

impl From<&PatientListQuery> for PatientFilter {
    fn from(query: &PatientListQuery) -> Self {
        Self {
            name: non_blank(&query.name),
            birth_date: query.birth_date,
            health_conditions: non_blank(&query.health_conditions),
            address: non_blank(&query.address),
            id: query.patient_id,
        }
    }
}

impl PatientFilter {
    /// Whether `record` satisfies every filter
    pub fn matches(&self, record: &PatientRecord) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&record.name, &self.name)
            && contains(&record.health_conditions, &self.health_conditions)
            && contains(&record.address, &self.address)
            && self.birth_date.map_or(true, |d| record.birth_date == d)
            && self.id.map_or(true, |id| record.id == id)
    }
}

/// Build an ILIKE pattern matching `value` literally anywhere in the column
fn substring_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Patient persistence
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert(&self, patient: &ValidatedPatient) -> StoreResult<PatientRecord>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PatientRecord>>;

    /// Find an existing record with exactly this name and birth date
    async fn find_by_identity(
        &self,
        name: &str,
        birth_date: NaiveDate,
    ) -> StoreResult<Option<PatientRecord>>;

    /// Overwrite every mutable field; `None` if `id` does not exist
    async fn update(
        &self,
        id: i64,
        patient: &ValidatedPatient,
    ) -> StoreResult<Option<PatientRecord>>;

    /// Remove a record; `false` if `id` does not exist
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Filtered page of records, ordered by id
    async fn list(
        &self,
        filter: &PatientFilter,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<PatientRecord>>;

    /// Check the datastore is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// PostgreSQL-backed patient store
#[derive(Clone)]
pub struct PgPatientStore {
    pool: PgPool,
}

impl PgPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    async fn insert(&self, patient: &ValidatedPatient) -> StoreResult<PatientRecord> {
        let record = sqlx::query_as::<_, PatientRecord>(
            r#"
            INSERT INTO patients (name, birth_date, health_conditions, gender, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, birth_date, health_conditions, gender, address
            "#,
        )
        .bind(&patient.name)
        .bind(patient.birth_date)
        .bind(&patient.health_conditions)
        .bind(patient.gender.as_str())
        .bind(&patient.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PatientRecord>> {
        let record = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT id, name, birth_date, health_conditions, gender, address
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_identity(
        &self,
        name: &str,
        birth_date: NaiveDate,
    ) -> StoreResult<Option<PatientRecord>> {
        let record = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT id, name, birth_date, health_conditions, gender, address
            FROM patients
            WHERE name = $1 AND birth_date = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(birth_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        patient: &ValidatedPatient,
    ) -> StoreResult<Option<PatientRecord>> {
        let record = sqlx::query_as::<_, PatientRecord>(
            r#"
            UPDATE patients SET
                name = $2,
                birth_date = $3,
                health_conditions = $4,
                gender = $5,
                address = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, birth_date, health_conditions, gender, address
            "#,
        )
        .bind(id)
        .bind(&patient.name)
        .bind(patient.birth_date)
        .bind(&patient.health_conditions)
        .bind(patient.gender.as_str())
        .bind(&patient.address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &PatientFilter,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<PatientRecord>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT id, name, birth_date, health_conditions, gender, address FROM patients WHERE TRUE",
        );

        if let Some(name) = &filter.name {
            query.push(" AND name ILIKE ").push_bind(substring_pattern(name));
        }
        if let Some(birth_date) = filter.birth_date {
            query.push(" AND birth_date = ").push_bind(birth_date);
        }
        if let Some(conditions) = &filter.health_conditions {
            query
                .push(" AND health_conditions ILIKE ")
                .push_bind(substring_pattern(conditions));
        }
        if let Some(address) = &filter.address {
            query.push(" AND address ILIKE ").push_bind(substring_pattern(address));
        }
        if let Some(id) = filter.id {
            query.push(" AND id = ").push_bind(id);
        }

        query
            .push(" ORDER BY id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(skip);

        let records = query
            .build_query_as::<PatientRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, conditions: &str) -> PatientRecord {
        PatientRecord {
            id,
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            health_conditions: conditions.to_string(),
            gender: "Masculino".to_string(),
            address: "Castle Black".to_string(),
        }
    }

    #[test]
    fn test_substring_pattern_escapes_wildcards() {
        assert_eq!(substring_pattern("Jon"), "%Jon%");
        assert_eq!(substring_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(substring_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_filter_from_query_drops_blank_text() {
        let query = PatientListQuery {
            name: Some("  ".to_string()),
            health_conditions: Some("flu".to_string()),
            patient_id: Some(3),
            ..Default::default()
        };
        let filter = PatientFilter::from(&query);
        assert_eq!(filter.name, None);
        assert_eq!(filter.health_conditions.as_deref(), Some("flu"));
        assert_eq!(filter.id, Some(3));
    }

    #[test]
    fn test_filter_matches_case_insensitive_substring() {
        let filter = PatientFilter {
            name: Some("jon".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&record(1, "Jon Snow", "")));
        assert!(!filter.matches(&record(2, "Arya Stark", "")));
    }

    #[test]
    fn test_filter_matches_exact_id_and_date() {
        let filter = PatientFilter {
            id: Some(2),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
            ..Default::default()
        };
        assert!(filter.matches(&record(2, "Arya Stark", "")));
        assert!(!filter.matches(&record(1, "Jon Snow", "")));

        let filter = PatientFilter {
            birth_date: NaiveDate::from_ymd_opt(1991, 1, 1),
            ..Default::default()
        };
        assert!(!filter.matches(&record(2, "Arya Stark", "")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(PatientFilter::default().matches(&record(9, "Any Body", "any")));
    }
}
