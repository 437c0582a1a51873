//! In-process stores
//!
//! Same semantics as the PostgreSQL stores, held in memory behind an async
//! `RwLock`. Used with `database.backend = "memory"` and by the tests.

use super::account::{AccountRecord, AccountStore, NewAccount};
use super::patient::{PatientFilter, PatientRecord, PatientStore};
use super::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinic_shared::validation::ValidatedPatient;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory account store
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<AccountRecord>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<AccountRecord> {
        let mut accounts = self.accounts.write().await;

        let username = account.username.as_str();
        let email = account.email.as_deref();

        // Usernames and emails share the login namespace
        if accounts
            .iter()
            .any(|a| a.username == username || a.email.as_deref() == Some(username))
        {
            return Err(StoreError::UniqueViolation("accounts_username_key".to_string()));
        }
        if let Some(email) = email {
            if accounts
                .iter()
                .any(|a| a.email.as_deref() == Some(email) || a.username == email)
            {
                return Err(StoreError::UniqueViolation("accounts_email_key".to_string()));
            }
        }

        let record = AccountRecord {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        accounts.push(record.clone());

        Ok(record)
    }

    async fn find_by_login(&self, identifier: &str) -> StoreResult<Option<AccountRecord>> {
        let accounts = self.accounts.read().await;

        let found = accounts
            .iter()
            .find(|a| a.username == identifier)
            .or_else(|| {
                accounts
                    .iter()
                    .find(|a| a.email.as_deref() == Some(identifier))
            })
            .cloned();

        Ok(found)
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .any(|a| a.username == username))
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .any(|a| a.email.as_deref() == Some(email)))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct PatientTable {
    next_id: i64,
    rows: BTreeMap<i64, PatientRecord>,
}

/// In-memory patient store
///
/// Identifiers start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryPatientStore {
    table: RwLock<PatientTable>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_record(id: i64, patient: &ValidatedPatient) -> PatientRecord {
    PatientRecord {
        id,
        name: patient.name.clone(),
        birth_date: patient.birth_date,
        health_conditions: patient.health_conditions.clone(),
        gender: patient.gender.to_string(),
        address: patient.address.clone(),
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn insert(&self, patient: &ValidatedPatient) -> StoreResult<PatientRecord> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let record = to_record(table.next_id, patient);
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<PatientRecord>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_identity(
        &self,
        name: &str,
        birth_date: NaiveDate,
    ) -> StoreResult<Option<PatientRecord>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|r| r.name == name && r.birth_date == birth_date)
            .cloned())
    }

    async fn update(
        &self,
        id: i64,
        patient: &ValidatedPatient,
    ) -> StoreResult<Option<PatientRecord>> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = to_record(id, patient);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &PatientFilter,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<PatientRecord>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| filter.matches(r))
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_shared::Gender;

    fn patient(name: &str) -> ValidatedPatient {
        ValidatedPatient {
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            health_conditions: "Healthy".to_string(),
            gender: Gender::Masculine,
            address: "Winterfell".to_string(),
        }
    }

    fn account(username: &str, email: Option<&str>) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.map(str::to_string),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let store = MemoryPatientStore::new();
        let a = store.insert(&patient("Jon Snow")).await.unwrap();
        let b = store.insert(&patient("Arya Stark")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete(b.id).await.unwrap());
        let c = store.insert(&patient("Sansa Stark")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryPatientStore::new();
        assert!(store.update(42, &patient("Jon Snow")).await.unwrap().is_none());
        assert!(!store.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_paginates_in_id_order() {
        let store = MemoryPatientStore::new();
        for name in ["Jon Snow", "Arya Stark", "Sansa Stark", "Bran Stark"] {
            store.insert(&patient(name)).await.unwrap();
        }

        let page = store.list(&PatientFilter::default(), 1, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let store = MemoryAccountStore::new();
        store.create(account("alice", None)).await.unwrap();
        let err = store.create(account("alice", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_username_and_email_share_one_namespace() {
        let store = MemoryAccountStore::new();
        store.create(account("alice", Some("alice@example.com"))).await.unwrap();

        let err = store
            .create(account("alice@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(ref c) if c == "accounts_username_key"));

        let err = store
            .create(account("mallory", Some("alice")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(ref c) if c == "accounts_email_key"));
    }

    #[tokio::test]
    async fn test_accounts_without_email_do_not_collide() {
        let store = MemoryAccountStore::new();
        store.create(account("alice", None)).await.unwrap();
        store.create(account("bob", None)).await.unwrap();
        assert!(!store.email_exists("").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_lookup_by_username_or_email() {
        let store = MemoryAccountStore::new();
        store.create(account("alice", Some("alice@example.com"))).await.unwrap();

        let by_name = store.find_by_login("alice").await.unwrap().unwrap();
        let by_email = store.find_by_login("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_name.id, by_email.id);
        assert!(store.find_by_login("nobody").await.unwrap().is_none());
    }
}
