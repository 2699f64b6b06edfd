pub mod memory;
pub mod postgrest;

use std::sync::Arc;

use anyhow::Context;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Activity, ActivityPage, Column};
use crate::query::ActivityQuery;

pub use memory::MemoryBackend;

pub type ClientResult<T> = Result<T, ClientError>;

/// A tabular source for activity rows.
///
/// Only implementations know the backend's filter syntax.
#[allow(async_fn_in_trait)]
pub trait ActivityBackend {
    async fn fetch_page(&self, query: &ActivityQuery) -> ClientResult<ActivityPage>;

    /// Sorted distinct non-empty values of one column.
    async fn distinct_values(&self, column: Column) -> ClientResult<Vec<String>>;
}

#[derive(Clone)]
pub struct SupabaseClient {
    inner: reqwest::Client,
    config: Arc<AppConfig>,
    table_url: String,
}

impl SupabaseClient {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let base_url = config
            .supabase_url
            .as_deref()
            .map(normalize_base_url)
            .ok_or(ClientError::MissingEndpoint)?;
        let table_url = format!("{base_url}/rest/v1/{}", config.table);

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            inner: client,
            config: Arc::new(config),
            table_url,
        })
    }

    fn request(&self, pairs: &[(String, String)]) -> reqwest::RequestBuilder {
        let mut builder = self
            .inner
            .get(&self.table_url)
            .query(pairs)
            .header(header::ACCEPT, "application/json");

        if let Some(key) = self.config.anon_key.as_deref() {
            builder = builder
                .header("apikey", key)
                .header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> ClientResult<(Vec<Activity>, Option<u64>)> {
        let response = builder.send().await.map_err(ClientError::from)?;
        let status = response.status();
        let total = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(postgrest::parse_content_range);
        let bytes = response.bytes().await.map_err(ClientError::from)?;

        if status.is_success() {
            let rows: Vec<Activity> = serde_json::from_slice(&bytes).map_err(ClientError::from)?;
            return Ok((rows, total));
        }

        match serde_json::from_slice::<ApiErrorBody>(&bytes) {
            Ok(body) => Err(ClientError::Api(body.with_status(status))),
            Err(_) => Err(ClientError::UnexpectedStatus {
                status,
                body: bytes.to_vec(),
            }),
        }
    }
}

impl ActivityBackend for SupabaseClient {
    async fn fetch_page(&self, query: &ActivityQuery) -> ClientResult<ActivityPage> {
        let builder = self
            .request(&postgrest::query_pairs(query))
            .header("Prefer", "count=exact");
        let (rows, total) = self.send(builder).await?;
        let total_count = total.unwrap_or(query.window.offset + rows.len() as u64);
        Ok(ActivityPage { rows, total_count })
    }

    async fn distinct_values(&self, column: Column) -> ClientResult<Vec<String>> {
        let builder = self.request(&postgrest::distinct_pairs(column));
        let (rows, _) = self.send(builder).await?;
        Ok(distinct_column(&rows, column))
    }
}

/// The backend selected at startup.
#[derive(Clone)]
pub enum Backend {
    Supabase(SupabaseClient),
    Fixtures(MemoryBackend),
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supabase(_) => "supabase",
            Self::Fixtures(_) => "fixtures",
        }
    }
}

impl ActivityBackend for Backend {
    async fn fetch_page(&self, query: &ActivityQuery) -> ClientResult<ActivityPage> {
        match self {
            Self::Supabase(client) => client.fetch_page(query).await,
            Self::Fixtures(memory) => memory.fetch_page(query).await,
        }
    }

    async fn distinct_values(&self, column: Column) -> ClientResult<Vec<String>> {
        match self {
            Self::Supabase(client) => client.distinct_values(column).await,
            Self::Fixtures(memory) => memory.distinct_values(column).await,
        }
    }
}

pub(crate) fn distinct_column(rows: &[Activity], column: Column) -> Vec<String> {
    let mut values: Vec<String> = rows
        .iter()
        .map(|row| row.field(column).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}

fn normalize_base_url(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

/// PostgREST error payload.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(skip)]
    pub status: Option<StatusCode>,
}

impl ApiErrorBody {
    fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code.as_deref() {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("api error: {0}")]
    Api(ApiErrorBody),
    #[error("unexpected status {status}: {body:?}")]
    UnexpectedStatus { status: StatusCode, body: Vec<u8> },
    #[error("no backend endpoint configured")]
    MissingEndpoint,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(body) => body.status,
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_an_endpoint() {
        let result = SupabaseClient::new(AppConfig::default());
        assert!(matches!(result, Err(ClientError::MissingEndpoint)));
    }

    #[test]
    fn distinct_column_sorts_and_drops_blanks() {
        let rows = vec![
            Activity {
                third_party: "DED".into(),
                ..Activity::default()
            },
            Activity::default(),
            Activity {
                third_party: " Civil Defense ".into(),
                ..Activity::default()
            },
            Activity {
                third_party: "DED".into(),
                ..Activity::default()
            },
        ];
        assert_eq!(
            distinct_column(&rows, Column::ThirdParty),
            vec!["Civil Defense".to_string(), "DED".to_string()]
        );
    }

    #[test]
    fn error_body_reports_status() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code":"42703","message":"column does not exist"}"#).unwrap();
        let err = ClientError::Api(body.with_status(StatusCode::BAD_REQUEST));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.to_string(), "api error: 42703: column does not exist");
    }
}
