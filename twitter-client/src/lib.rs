pub mod api;


pub use api::{SearchQuery, SearchResponse, TweetAuthor, TweetData, TwitterApiClient};

use tracing::{info, warn};
use trendscout_core::{CoreError, ErrorRecovery, Post};

/// Anything that can answer a trending-post search.
pub trait PostSource {
    async fn search_posts(&self, query: &SearchQuery) -> Result<Vec<Post>, CoreError>;
}

impl PostSource for TwitterApiClient {
    async fn search_posts(&self, query: &SearchQuery) -> Result<Vec<Post>, CoreError> {
        self.search(query).await
    }
}

/// Fetch stage: posts matching `query`, or an empty list if the search failed.
pub async fn fetch_trending_posts<S: PostSource>(source: &S, query: &SearchQuery) -> Vec<Post> {
    info!(
        "Fetching trending posts for '{}' with {}+ likes",
        query.keyword, query.min_likes
    );
    let result = source.search_posts(query).await;
    let posts = ErrorRecovery::degrade_to_default("Post search", result).into_inner();
    if posts.is_empty() {
        warn!("No posts returned for '{}'", query.keyword);
    }
    posts
}
