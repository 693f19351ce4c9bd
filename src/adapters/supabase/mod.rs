//! Waitlist store reached through Supabase's REST gateway (PostgREST).
//!
//! PostgREST forwards database errors as JSON bodies carrying the SQLSTATE in
//! `code`, so unique violations are detected the same way as over a direct
//! connection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    adapters::persistence::UNIQUE_VIOLATION,
    app_error::{AppError, AppResult},
    domain::entities::waitlist_entry::{LeaderboardEntry, WaitlistEntry},
    infra::error::InfraError,
    use_cases::waitlist::WaitlistRepoTrait,
};

/// Connect timeout (TCP handshake + TLS).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request/response time.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const TABLE_PATH: [&str; 3] = ["rest", "v1", "waitlist"];

#[derive(Clone)]
pub struct SupabaseWaitlistClient {
    client: Client,
    table_url: Url,
    service_key: SecretString,
}

impl SupabaseWaitlistClient {
    pub fn new(project_url: &Url, service_key: SecretString) -> Result<Self, InfraError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(InfraError::HttpClient)?;

        Ok(Self {
            client,
            table_url: table_url(project_url)?,
            service_key,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        self.client
            .request(method, self.table_url.clone())
            .header("apikey", key)
            .bearer_auth(key)
    }
}

/// `{project_url}/rest/v1/waitlist`, keeping any path prefix on the project URL.
fn table_url(project_url: &Url) -> Result<Url, InfraError> {
    let mut url = project_url.clone();
    url.path_segments_mut()
        .map_err(|_| InfraError::InvalidStoreUrl)?
        .pop_if_empty()
        .extend(TABLE_PATH);
    Ok(url)
}

#[derive(Deserialize, Debug)]
struct WaitlistRow {
    email: String,
    referred_by: Option<String>,
    current_position: i64,
    referral_code: String,
    referral_count: Option<i64>,
}

impl From<WaitlistRow> for WaitlistEntry {
    fn from(row: WaitlistRow) -> Self {
        WaitlistEntry {
            email: row.email,
            referred_by: row.referred_by,
            current_position: row.current_position,
            referral_code: row.referral_code,
            referral_count: row.referral_count.unwrap_or(0),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LeaderboardRow {
    email: String,
    referral_count: Option<i64>,
    current_position: i64,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    email: &'a str,
    referred_by: Option<&'a str>,
}

#[derive(Deserialize, Debug, Default)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

fn transport_error(err: reqwest::Error) -> AppError {
    tracing::error!(error = ?err, "Supabase request failed");
    AppError::Database("Database operation failed".into())
}

/// Maps a non-success PostgREST response to an `AppError`.
fn classify_error(status: StatusCode, body: &str) -> AppError {
    let err: PostgrestError = serde_json::from_str(body).unwrap_or_default();
    if err.code.as_deref() == Some(UNIQUE_VIOLATION) {
        return AppError::Conflict;
    }

    tracing::error!(
        %status,
        code = ?err.code,
        message = ?err.message,
        "Supabase returned an error"
    );
    AppError::Database("Database operation failed".into())
}

async fn send_json<T: serde::de::DeserializeOwned>(request: RequestBuilder) -> AppResult<T> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, &body));
    }
    response.json::<T>().await.map_err(transport_error)
}

#[async_trait]
impl WaitlistRepoTrait for SupabaseWaitlistClient {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let eq = format!("eq.{email}");
        let rows: Vec<WaitlistRow> = send_json(self.request(Method::GET).query(&[
            ("select", "*"),
            ("email", eq.as_str()),
            ("limit", "1"),
        ]))
        .await?;

        Ok(rows.into_iter().next().map(WaitlistEntry::from))
    }

    async fn insert(&self, email: &str, referred_by: Option<&str>) -> AppResult<WaitlistEntry> {
        let rows: Vec<WaitlistRow> = send_json(
            self.request(Method::POST)
                .query(&[("select", "*")])
                .header("Prefer", "return=representation")
                .json(&[InsertRow { email, referred_by }]),
        )
        .await?;

        rows.into_iter()
            .next()
            .map(WaitlistEntry::from)
            .ok_or_else(|| AppError::Internal("insert returned no rows".into()))
    }

    async fn list_top_referrers(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let limit = limit.to_string();
        let rows: Vec<LeaderboardRow> = send_json(self.request(Method::GET).query(&[
            ("select", "email,referral_count,current_position"),
            ("order", "referral_count.desc.nullslast,current_position.asc"),
            ("limit", limit.as_str()),
        ]))
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                email: row.email,
                referral_count: row.referral_count.unwrap_or(0),
                current_position: row.current_position,
            })
            .collect())
    }
}
