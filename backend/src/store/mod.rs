//! Entity store
//!
//! [`Store`] is constructed once per process and handed to every service
//! through application state. It wraps an injected [`Repository`] (in-memory
//! for tests and demos, PostgreSQL in production) and serializes writers per
//! business so workflow transitions never interleave on the same record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{Business, FraudReport, Review, User, Verification, VerificationEvent};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// A user together with their password hash; never serialized to clients
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Records written together by one workflow transition
#[derive(Debug)]
pub struct WorkflowChange<'a> {
    pub business: Option<&'a Business>,
    pub verification: Option<&'a Verification>,
    pub event: &'a VerificationEvent,
}

/// Storage backend for all entities
///
/// Lookups of unknown ids return `Ok(None)`; errors are reserved for storage
/// failures.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Short name reported by the health endpoint
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;

    // Businesses
    async fn get_business(&self, id: Uuid) -> AppResult<Option<Business>>;
    async fn list_businesses(&self) -> AppResult<Vec<Business>>;
    async fn save_business(&self, business: &Business) -> AppResult<()>;

    // Verifications
    async fn get_verification(&self, business_id: Uuid) -> AppResult<Option<Verification>>;
    async fn list_verifications(&self) -> AppResult<Vec<Verification>>;
    async fn list_verification_events(&self, business_id: Uuid) -> AppResult<Vec<VerificationEvent>>;
    /// Persist a workflow transition; the verification replaces the current
    /// record for its business and the event is appended to the log
    async fn commit_workflow(&self, change: WorkflowChange<'_>) -> AppResult<()>;

    // Reviews, in insertion order
    async fn list_reviews(&self, business_id: Uuid) -> AppResult<Vec<Review>>;
    async fn insert_review(&self, review: &Review) -> AppResult<()>;

    // Accounts
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>>;
    /// Fails with a conflict when the email is already registered
    async fn insert_user(&self, user: &StoredUser) -> AppResult<()>;

    // Fraud reports
    async fn insert_fraud_report(&self, report: &FraudReport) -> AppResult<()>;
    async fn list_fraud_reports(&self, business_id: Option<Uuid>) -> AppResult<Vec<FraudReport>>;
}

/// One async mutex per business id
#[derive(Default)]
struct BusinessLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl BusinessLocks {
    fn entry(&self, business_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(business_id).or_default().clone()
    }

    /// Drop the entry once no guard or waiter refers to it
    fn release(&self, business_id: Uuid) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&business_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&business_id);
        }
    }

    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Write access to one business, released on drop
pub struct BusinessGuard {
    guard: Option<OwnedMutexGuard<()>>,
    business_id: Uuid,
    locks: Arc<BusinessLocks>,
}

impl Drop for BusinessGuard {
    fn drop(&mut self) {
        // Unlock first so our own reference is gone before the count check
        self.guard.take();
        self.locks.release(self.business_id);
    }
}

/// Process-wide entity store
#[derive(Clone)]
pub struct Store {
    repo: Arc<dyn Repository>,
    locks: Arc<BusinessLocks>,
}

impl Store {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            locks: Arc::new(BusinessLocks::default()),
        }
    }

    /// Store backed by an empty in-memory repository
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    pub fn repo(&self) -> &dyn Repository {
        self.repo.as_ref()
    }

    /// Exclusive write access to one business and its verification. Hold the
    /// guard across the read-modify-write sequence.
    pub async fn lock_business(&self, business_id: Uuid) -> BusinessGuard {
        let guard = self.locks.entry(business_id).lock_owned().await;
        BusinessGuard {
            guard: Some(guard),
            business_id,
            locks: self.locks.clone(),
        }
    }

    /// Number of businesses with a held or awaited write lock
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }
}
