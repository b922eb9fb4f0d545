//! Turning fetched posts into a model prompt, and the model's reply into an
//! [`InsightBundle`].

use crate::LlmProvider;
use serde_json::{Map, Value};
use tracing::{info, warn};
use trendscout_core::{truncate_chars, ErrorRecovery, InsightBundle, Post};

pub const MAX_DIGEST_POSTS: usize = 10;
pub const MAX_DIGEST_TEXT_CHARS: usize = 200;
pub const MAX_DIGEST_HASHTAGS: usize = 5;

/// One numbered line per post: text, like count and leading hashtags.
pub fn build_digest(posts: &[Post]) -> String {
    posts
        .iter()
        .take(MAX_DIGEST_POSTS)
        .enumerate()
        .map(|(i, post)| {
            let hashtags: Vec<&str> = post
                .hashtags
                .iter()
                .take(MAX_DIGEST_HASHTAGS)
                .map(String::as_str)
                .collect();
            format!(
                "{}. {} ({} likes, hashtags: {})",
                i + 1,
                truncate_chars(&post.text, MAX_DIGEST_TEXT_CHARS),
                post.like_count,
                hashtags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(digest: &str) -> String {
    format!(
        "Analyze these trending AI-related tweets and extract:
1. Main topics/themes (as array)
2. Emerging trends (as array)
3. Key technologies mentioned (as array)
4. Recommended SEO keywords (as array)

Tweets:
{}

Return ONLY valid JSON with keys: topics, trends, technologies, keywords
Each should be an array of strings.",
        digest
    )
}

/// A model reply after looking for a JSON object in it.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Parsed(Map<String, Value>),
    Unparsed(String),
}

/// Parses the text between the first `{` and the last `}` of `text`.
pub fn parse_model_reply(text: &str) -> ModelReply {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return ModelReply::Unparsed(text.to_string());
    };
    if end <= start {
        return ModelReply::Unparsed(text.to_string());
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => ModelReply::Parsed(map),
        _ => ModelReply::Unparsed(text.to_string()),
    }
}

impl From<ModelReply> for InsightBundle {
    fn from(reply: ModelReply) -> Self {
        match reply {
            ModelReply::Parsed(map) => InsightBundle::from_map(map),
            ModelReply::Unparsed(text) => InsightBundle::raw(text),
        }
    }
}

/// Summarize stage. Never fails: a failed call yields an empty bundle and an
/// unparseable reply yields a `raw_response` bundle.
pub async fn extract_insights<P: LlmProvider>(provider: &P, posts: &[Post]) -> InsightBundle {
    if posts.is_empty() {
        warn!("No posts to analyze");
        return InsightBundle::empty();
    }

    info!(
        "Analyzing {} posts with {}",
        posts.len().min(MAX_DIGEST_POSTS),
        provider.name()
    );
    let prompt = build_prompt(&build_digest(posts));
    let reply = provider.complete(&prompt).await;
    let outcome = ErrorRecovery::degrade("Insight extraction", reply, String::new());
    if outcome.is_degraded() {
        return InsightBundle::empty();
    }

    match parse_model_reply(&outcome.into_inner()) {
        ModelReply::Parsed(map) => {
            info!("Model analysis complete");
            InsightBundle::from_map(map)
        }
        reply @ ModelReply::Unparsed(_) => {
            warn!("Could not find a JSON object in the model reply");
            reply.into()
        }
    }
}
