use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::waitlist_entry::{LeaderboardEntry, WaitlistEntry},
    use_cases::waitlist::WaitlistRepoTrait,
};

// Waitlist row as stored in the db. Integer columns are cast to BIGINT in
// every query so the row decodes regardless of the declared column width.
#[derive(sqlx::FromRow, Debug)]
struct WaitlistEntryDb {
    email: String,
    referred_by: Option<String>,
    current_position: i64,
    referral_code: String,
    referral_count: i64,
}

impl From<WaitlistEntryDb> for WaitlistEntry {
    fn from(row: WaitlistEntryDb) -> Self {
        WaitlistEntry {
            email: row.email,
            referred_by: row.referred_by,
            current_position: row.current_position,
            referral_code: row.referral_code,
            referral_count: row.referral_count,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct LeaderboardRowDb {
    email: String,
    referral_count: i64,
    current_position: i64,
}

const ENTRY_COLUMNS: &str = "email, referred_by, current_position::BIGINT AS current_position, \
     referral_code, COALESCE(referral_count, 0)::BIGINT AS referral_count";

#[async_trait]
impl WaitlistRepoTrait for PostgresPersistence {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let row = sqlx::query_as::<_, WaitlistEntryDb>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM waitlist WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(WaitlistEntry::from))
    }

    async fn insert(&self, email: &str, referred_by: Option<&str>) -> AppResult<WaitlistEntry> {
        let row = sqlx::query_as::<_, WaitlistEntryDb>(&format!(
            "INSERT INTO waitlist (email, referred_by) VALUES ($1, $2) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(email)
        .bind(referred_by)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn list_top_referrers(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardRowDb>(
            r#"SELECT email,
                      COALESCE(referral_count, 0)::BIGINT AS referral_count,
                      current_position::BIGINT AS current_position
               FROM waitlist
               ORDER BY referral_count DESC, current_position ASC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                email: row.email,
                referral_count: row.referral_count,
                current_position: row.current_position,
            })
            .collect())
    }
}
