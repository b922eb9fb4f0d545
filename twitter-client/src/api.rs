use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use trendscout_core::{AppConfig, CoreError, Post, SearchApiError};
use url::Url;

const TWITTER_API_BASE: &str = "https://api.twitterapi.io";
const ADVANCED_SEARCH_ENDPOINT: &str = "/twitter/tweet/advanced_search";

pub const SEARCH_TIMEOUT_SECS: u64 = 30;
pub const MAX_RESULTS: u32 = 10;

/// Keyword search restricted to popular posts with media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub min_likes: u32,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, min_likes: u32) -> Self {
        Self {
            keyword: keyword.into(),
            min_likes,
        }
    }

    pub fn expression(&self) -> String {
        format!(
            "({}) min_faves:{} filter:media",
            self.keyword, self.min_likes
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tweets: Vec<TweetData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub bookmark_count: Option<u64>,
    #[serde(default)]
    pub author: Option<TweetAuthor>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetAuthor {
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug)]
pub struct TwitterApiClient {
    http_client: Client,
    base_url: Url,
    api_key: Option<String>,
    user_id: Option<String>,
}

impl TwitterApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()?;
        let base_url = parse_base_url(TWITTER_API_BASE)?;

        Ok(Self {
            http_client,
            base_url,
            api_key: config.twitter_api_key.clone(),
            user_id: config.twitter_user_id.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, CoreError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn search_url(&self) -> Result<Url, CoreError> {
        self.base_url
            .join(ADVANCED_SEARCH_ENDPOINT.trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidInput {
                message: format!("Invalid search URL: {}", e),
            })
    }

    async fn make_request(&self, query_params: &[(&str, &str)]) -> Result<Response, CoreError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CoreError::SearchApi(SearchApiError::MissingCredential {
                name: "TWITTER_API_KEY".to_string(),
            })
        })?;
        let url = self.search_url()?;
        let start_time = Instant::now();

        let mut request_builder = self
            .http_client
            .get(url)
            .header("X-API-Key", api_key)
            .header("Accept", "application/json")
            .query(query_params);

        if let Some(user_id) = &self.user_id {
            request_builder = request_builder.header("X-User-Id", user_id);
        }

        info!("Making search request: GET {}", ADVANCED_SEARCH_ENDPOINT);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", ADVANCED_SEARCH_ENDPOINT, e);
                if e.is_timeout() {
                    return Err(CoreError::SearchApi(SearchApiError::RequestTimeout {
                        seconds: SEARCH_TIMEOUT_SECS,
                    }));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(
                "Request failed with status: {} for {}",
                status, ADVANCED_SEARCH_ENDPOINT
            );
            return Err(CoreError::SearchApi(status_error(status)));
        }

        debug!(
            "Request successful: {} in {:?}",
            status,
            start_time.elapsed()
        );
        Ok(response)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Post>, CoreError> {
        let expression = query.expression();
        let max_results = MAX_RESULTS.to_string();
        let params = [
            ("query", expression.as_str()),
            ("max_results", max_results.as_str()),
        ];

        let response = self.make_request(&params).await?;
        let body: SearchResponse = response.json().await.map_err(|e| {
            error!("Failed to parse search response: {}", e);
            CoreError::SearchApi(SearchApiError::InvalidResponse {
                details: format!("Failed to parse results for '{}'", query.keyword),
            })
        })?;

        let posts: Vec<Post> = body.tweets.into_iter().map(Post::from).collect();
        info!("Fetched {} posts for '{}'", posts.len(), query.keyword);
        Ok(posts)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, CoreError> {
    Url::parse(base_url).map_err(|e| CoreError::InvalidInput {
        message: format!("Invalid base URL '{}': {}", base_url, e),
    })
}

fn status_error(status: StatusCode) -> SearchApiError {
    match status.as_u16() {
        401 | 403 => SearchApiError::AuthenticationFailed {
            reason: status.to_string(),
        },
        429 => SearchApiError::RateLimited,
        code if status.is_server_error() => SearchApiError::ServerError { status_code: code },
        code => SearchApiError::UnexpectedStatus { status_code: code },
    }
}

impl From<TweetData> for Post {
    fn from(tweet: TweetData) -> Self {
        Self {
            text: tweet.text.unwrap_or_default(),
            like_count: tweet.like_count.unwrap_or(0),
            retweet_count: tweet.retweet_count.unwrap_or(0),
            bookmark_count: tweet.bookmark_count.unwrap_or(0),
            author: tweet.author.and_then(|author| author.user_name),
            hashtags: tweet.hashtags.unwrap_or_default(),
        }
    }
}
