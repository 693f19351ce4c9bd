use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, resolve_limit},
    domain::entities::waitlist_entry::{LeaderboardEntry, WaitlistEntry},
};

#[async_trait]
pub trait WaitlistRepoTrait: Send + Sync {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>>;

    /// Stores a new entry and returns it with the store-assigned columns.
    /// Fails with `AppError::Conflict` when the email is already present.
    async fn insert(&self, email: &str, referred_by: Option<&str>) -> AppResult<WaitlistEntry>;

    /// Entries ordered by `referral_count` descending, at most `limit` rows.
    async fn list_top_referrers(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResult {
    pub position: i64,
    pub referral_code: String,
}

impl From<WaitlistEntry> for JoinResult {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            position: entry.current_position,
            referral_code: entry.referral_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub position: i64,
    pub referral_code: String,
    pub referral_count: i64,
}

impl From<WaitlistEntry> for StatusResult {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            position: entry.current_position,
            referral_code: entry.referral_code,
            referral_count: entry.referral_count,
        }
    }
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepoTrait>,
    leaderboard_default_limit: i64,
    leaderboard_max_limit: i64,
}

impl WaitlistUseCases {
    pub fn new(
        repo: Arc<dyn WaitlistRepoTrait>,
        leaderboard_default_limit: i64,
        leaderboard_max_limit: i64,
    ) -> Self {
        Self {
            repo,
            leaderboard_default_limit,
            leaderboard_max_limit,
        }
    }

    /// Registers `email`, or returns the entry it already has.
    ///
    /// A repeated join is indistinguishable from the first one. When a
    /// concurrent request stores the same email between our lookup and our
    /// insert, the store's unique constraint rejects the insert and the
    /// winner's entry is returned instead.
    #[instrument(skip(self, referral_code))]
    pub async fn join(&self, email: &str, referral_code: Option<&str>) -> AppResult<JoinResult> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Invalid email".into()));
        }
        let referral_code = referral_code.map(str::trim).filter(|code| !code.is_empty());

        if let Some(existing) = self.repo.get_by_email(email).await? {
            return Ok(existing.into());
        }

        match self.repo.insert(email, referral_code).await {
            Ok(created) => {
                tracing::info!(
                    position = created.current_position,
                    referred = referral_code.is_some(),
                    "Waitlist entry created"
                );
                Ok(created.into())
            }
            Err(AppError::Conflict) => {
                tracing::debug!("Email inserted concurrently, returning stored entry");
                let stored = self.repo.get_by_email(email).await?.ok_or_else(|| {
                    AppError::Internal("entry missing after unique violation".into())
                })?;
                Ok(stored.into())
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self))]
    pub async fn status(&self, email: &str) -> AppResult<StatusResult> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::InvalidInput("Email required".into()));
        }

        self.repo
            .get_by_email(email)
            .await?
            .map(StatusResult::from)
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn leaderboard(&self, limit: Option<&str>) -> AppResult<Vec<LeaderboardEntry>> {
        let limit = resolve_limit(
            limit,
            self.leaderboard_default_limit,
            self.leaderboard_max_limit,
        );
        self.repo.list_top_referrers(limit).await
    }
}
