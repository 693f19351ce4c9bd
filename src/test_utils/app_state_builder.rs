//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by an in-memory waitlist
//! so routes and middleware can be exercised without a database.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::waitlist::{WaitlistRepoTrait, WaitlistUseCases},
    domain::entities::waitlist_entry::WaitlistEntry,
    infra::config::{AppConfig, StoreConfig},
    test_utils::InMemoryWaitlistRepo,
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let (app_state, repo) = TestAppStateBuilder::new()
///     .with_entry(create_test_entry(1, |e| e.referral_count = 3))
///     .build_with_repo();
/// ```
pub struct TestAppStateBuilder {
    entries: Vec<WaitlistEntry>,
    repo: Option<Arc<dyn WaitlistRepoTrait>>,
    allowed_origins: Vec<HeaderValue>,
    leaderboard_default_limit: i64,
    leaderboard_max_limit: i64,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            entries: vec![],
            repo: None,
            allowed_origins: vec![
                HeaderValue::from_static("https://trysavoy.com"),
                HeaderValue::from_static("http://localhost:3000"),
            ],
            leaderboard_default_limit: 10,
            leaderboard_max_limit: 100,
        }
    }

    pub fn with_entry(mut self, entry: WaitlistEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_entries(mut self, entries: Vec<WaitlistEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Use a custom repo instead of the in-memory one. Seeded entries are ignored.
    pub fn with_repo(mut self, repo: Arc<dyn WaitlistRepoTrait>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<HeaderValue>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn with_leaderboard_limits(mut self, default: i64, max: i64) -> Self {
        self.leaderboard_default_limit = default;
        self.leaderboard_max_limit = max;
        self
    }

    /// Build with the in-memory repo and return it for test assertions.
    pub fn build_with_repo(mut self) -> (AppState, Arc<InMemoryWaitlistRepo>) {
        let repo = Arc::new(InMemoryWaitlistRepo::with_entries(std::mem::take(
            &mut self.entries,
        )));
        let app_state = self.with_repo(repo.clone()).build();
        (app_state, repo)
    }

    pub fn build(self) -> AppState {
        let repo = self
            .repo
            .unwrap_or_else(|| Arc::new(InMemoryWaitlistRepo::with_entries(self.entries)));

        let waitlist_use_cases = Arc::new(WaitlistUseCases::new(
            repo,
            self.leaderboard_default_limit,
            self.leaderboard_max_limit,
        ));

        // Minimal config; the store settings are never dialed in tests.
        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            allowed_origins: self.allowed_origins,
            store: StoreConfig::Postgres {
                database_url: SecretString::new("".into()),
                max_connections: 1,
            },
            leaderboard_default_limit: self.leaderboard_default_limit,
            leaderboard_max_limit: self.leaderboard_max_limit,
            log_file: None,
        });

        AppState {
            config,
            waitlist_use_cases,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
