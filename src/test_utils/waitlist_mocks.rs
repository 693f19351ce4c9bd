//! In-memory mock implementations of `WaitlistRepoTrait`.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepoTrait,
    domain::entities::waitlist_entry::{LeaderboardEntry, WaitlistEntry},
    test_utils::test_referral_code,
};

/// In-memory waitlist with the same uniqueness guarantee as the real table.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    pub entries: Mutex<Vec<WaitlistEntry>>,
    missed_lookups: AtomicUsize,
    insert_attempts: AtomicUsize,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial entries for testing.
    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Make the next `count` lookups report nothing, as a read that raced a
    /// concurrent insert would.
    pub fn miss_next_lookups(&self, count: usize) {
        self.missed_lookups.store(count, Ordering::SeqCst);
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Simulates the external referral tracking bumping a counter.
    pub fn set_referral_count(&self, email: &str, count: i64) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.iter_mut().find(|e| e.email == email) {
            entry.referral_count = count;
        }
    }

    pub fn find(&self, email: &str) -> Option<WaitlistEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.email == email)
            .cloned()
    }

    /// Get all entries (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WaitlistRepoTrait for InMemoryWaitlistRepo {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let missed = self
            .missed_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if missed {
            return Ok(None);
        }
        Ok(self.find(email))
    }

    async fn insert(&self, email: &str, referred_by: Option<&str>) -> AppResult<WaitlistEntry> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();

        if entries.iter().any(|e| e.email == email) {
            return Err(AppError::Conflict);
        }

        let position = entries
            .iter()
            .map(|e| e.current_position)
            .max()
            .unwrap_or(0)
            + 1;
        let entry = WaitlistEntry {
            email: email.to_string(),
            referred_by: referred_by.map(str::to_string),
            current_position: position,
            referral_code: test_referral_code(position),
            referral_count: 0,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_top_referrers(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let mut entries = self.get_all();
        entries.sort_by(|a, b| {
            b.referral_count
                .cmp(&a.referral_count)
                .then(a.current_position.cmp(&b.current_position))
        });
        Ok(entries
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|entry| LeaderboardEntry {
                email: entry.email.clone(),
                referral_count: entry.referral_count,
                current_position: entry.current_position,
            })
            .collect())
    }
}

/// Repo whose every call fails like an unreachable database.
#[derive(Default)]
pub struct FailingWaitlistRepo;

#[async_trait]
impl WaitlistRepoTrait for FailingWaitlistRepo {
    async fn get_by_email(&self, _email: &str) -> AppResult<Option<WaitlistEntry>> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn insert(&self, _email: &str, _referred_by: Option<&str>) -> AppResult<WaitlistEntry> {
        Err(AppError::Database("connection refused".into()))
    }

    async fn list_top_referrers(&self, _limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        Err(AppError::Database("connection refused".into()))
    }
}
