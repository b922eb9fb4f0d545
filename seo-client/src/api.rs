use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use trendscout_core::{AppConfig, CoreError, KeywordApiError, KeywordCredentials, KeywordRecord};

const DATAFORSEO_API_BASE: &str = "https://api.dataforseo.com";
const KEYWORD_IDEAS_ENDPOINT: &str = "/v3/dataforseo_labs/keyword_ideas/live";

pub const KEYWORD_TIMEOUT_SECS: u64 = 60;
pub const LOCATION_NAME: &str = "United States";
pub const LANGUAGE_NAME: &str = "English";
pub const SEARCH_DEPTH: u32 = 2;
/// Items kept from each result block.
pub const MAX_ITEMS_PER_RESULT: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordIdeasTask {
    pub keywords: Vec<String>,
    pub location_name: String,
    pub language_name: String,
    pub depth: u32,
    pub include_serp_info: bool,
}

impl KeywordIdeasTask {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.to_vec(),
            location_name: LOCATION_NAME.to_string(),
            language_name: LANGUAGE_NAME.to_string(),
            depth: SEARCH_DEPTH,
            include_serp_info: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordIdeasResponse {
    #[serde(default)]
    pub tasks: Option<Vec<TaskData>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskData {
    #[serde(default)]
    pub result: Option<Vec<ResultData>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub items: Option<Vec<KeywordItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordItem {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub keyword_info: Option<KeywordInfo>,
    #[serde(default)]
    pub keyword_properties: Option<KeywordProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordInfo {
    #[serde(default)]
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub competition: Option<f64>,
    #[serde(default)]
    pub cpc: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordProperties {
    #[serde(default)]
    pub keyword_difficulty: Option<u32>,
}

impl From<KeywordItem> for KeywordRecord {
    fn from(item: KeywordItem) -> Self {
        let info = item.keyword_info.unwrap_or_default();
        Self {
            keyword: item.keyword.unwrap_or_default(),
            search_volume: info.search_volume,
            competition: info.competition,
            cpc: info.cpc,
            difficulty: item
                .keyword_properties
                .and_then(|properties| properties.keyword_difficulty),
            opportunity_score: None,
        }
    }
}

impl KeywordIdeasResponse {
    /// Flattens `tasks[].result[].items[]`, keeping the first
    /// [`MAX_ITEMS_PER_RESULT`] items of each result.
    pub fn into_records(self) -> Vec<KeywordRecord> {
        self.tasks
            .unwrap_or_default()
            .into_iter()
            .flat_map(|task| task.result.unwrap_or_default())
            .flat_map(|result| {
                result
                    .items
                    .unwrap_or_default()
                    .into_iter()
                    .take(MAX_ITEMS_PER_RESULT)
            })
            .map(KeywordRecord::from)
            .collect()
    }
}

pub struct DataForSeoClient {
    http_client: Client,
    base_url: String,
    credentials: KeywordCredentials,
}

impl DataForSeoClient {
    pub fn new(credentials: KeywordCredentials) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(KEYWORD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: DATAFORSEO_API_BASE.to_string(),
            credentials,
        })
    }

    /// `None` when keyword scoring is not configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, CoreError> {
        config
            .keyword_credentials()
            .map(Self::new)
            .transpose()
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn keyword_ideas_url(&self) -> String {
        format!("{}{}", self.base_url, KEYWORD_IDEAS_ENDPOINT)
    }

    pub fn authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.credentials.login, self.credentials.password);
        format!("Basic {}", BASE64.encode(pair))
    }

    pub async fn keyword_ideas(&self, keywords: &[String]) -> Result<Vec<KeywordRecord>, CoreError> {
        let body = vec![KeywordIdeasTask::new(keywords)];
        let start_time = Instant::now();

        info!("Making keyword request: POST {}", KEYWORD_IDEAS_ENDPOINT);
        let response = self
            .http_client
            .post(self.keyword_ideas_url())
            .header("Authorization", self.authorization_header())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for POST {}: {}", KEYWORD_IDEAS_ENDPOINT, e);
                if e.is_timeout() {
                    CoreError::KeywordApi(KeywordApiError::RequestTimeout {
                        seconds: KEYWORD_TIMEOUT_SECS,
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "Request failed with status: {} for {}",
                status, KEYWORD_IDEAS_ENDPOINT
            );
            return Err(CoreError::KeywordApi(status_error(
                status,
                &self.credentials.login,
            )));
        }

        let parsed: KeywordIdeasResponse = response.json().await.map_err(|e| {
            error!("Failed to parse keyword response: {}", e);
            CoreError::KeywordApi(KeywordApiError::InvalidResponse {
                details: "Failed to parse keyword ideas".to_string(),
            })
        })?;

        let records = parsed.into_records();
        debug!(
            "Keyword request returned {} records in {:?}",
            records.len(),
            start_time.elapsed()
        );
        Ok(records)
    }
}

fn status_error(status: StatusCode, login: &str) -> KeywordApiError {
    match status.as_u16() {
        401 | 403 => KeywordApiError::AuthenticationFailed {
            login: login.to_string(),
        },
        429 => KeywordApiError::RateLimited,
        code if status.is_server_error() => KeywordApiError::ServerError { status_code: code },
        code => KeywordApiError::UnexpectedStatus { status_code: code },
    }
}
