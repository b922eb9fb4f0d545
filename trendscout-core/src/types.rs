use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A post returned by the search API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub text: String,
    pub like_count: u64,
    pub retweet_count: u64,
    pub bookmark_count: u64,
    pub author: Option<String>,
    pub hashtags: Vec<String>,
}

impl Post {
    /// Likes plus twice the retweets.
    pub fn engagement_score(&self) -> u64 {
        self.like_count + self.retweet_count * 2
    }

    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or("unknown")
    }
}

pub const TOPICS_KEY: &str = "topics";
pub const TRENDS_KEY: &str = "trends";
pub const TECHNOLOGIES_KEY: &str = "technologies";
pub const KEYWORDS_KEY: &str = "keywords";
pub const RAW_RESPONSE_KEY: &str = "raw_response";

/// Thematic analysis returned by the model.
///
/// Holds whatever object the model produced. Recognised keys are read through
/// the typed accessors, which treat a missing or malformed key as an empty
/// list. An unparseable reply is kept under `raw_response`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightBundle(Map<String, Value>);

impl InsightBundle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn raw(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(RAW_RESPONSE_KEY.to_string(), Value::String(text.into()));
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.0.get(RAW_RESPONSE_KEY).and_then(Value::as_str)
    }

    /// String entries of an array-valued key. Non-string entries are skipped.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn topics(&self) -> Vec<String> {
        self.strings(TOPICS_KEY)
    }

    pub fn trends(&self) -> Vec<String> {
        self.strings(TRENDS_KEY)
    }

    pub fn technologies(&self) -> Vec<String> {
        self.strings(TECHNOLOGIES_KEY)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.strings(KEYWORDS_KEY)
    }
}

/// Search metrics for one keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub competition: Option<f64>,
    pub cpc: Option<f64>,
    pub difficulty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_score: Option<u64>,
}

impl KeywordRecord {
    pub fn volume_or_zero(&self) -> u64 {
        self.search_volume.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(value: Value) -> InsightBundle {
        match value {
            Value::Object(map) => InsightBundle::from_map(map),
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_engagement_score() {
        let post = Post {
            like_count: 10,
            retweet_count: 5,
            ..Default::default()
        };
        assert_eq!(post.engagement_score(), 20);
    }

    #[test]
    fn test_missing_author_defaults_to_unknown() {
        let post = Post::default();
        assert_eq!(post.author_or_unknown(), "unknown");
    }

    #[test]
    fn test_insight_accessors_default_to_empty() {
        let insights = bundle(json!({ "topics": ["agents"] }));
        assert_eq!(insights.topics(), vec!["agents"]);
        assert!(insights.trends().is_empty());
        assert!(insights.technologies().is_empty());
        assert!(insights.keywords().is_empty());
    }

    #[test]
    fn test_insight_accessors_skip_malformed_values() {
        let insights = bundle(json!({
            "topics": "not an array",
            "keywords": ["llm", 42, null, "rag"],
        }));
        assert!(insights.topics().is_empty());
        assert_eq!(insights.keywords(), vec!["llm", "rag"]);
    }

    #[test]
    fn test_raw_bundle() {
        let insights = InsightBundle::raw("no json here");
        assert_eq!(insights.raw_response(), Some("no json here"));
        assert!(insights.topics().is_empty());
        assert_eq!(
            serde_json::to_value(&insights).unwrap(),
            json!({ "raw_response": "no json here" })
        );
    }

    #[test]
    fn test_opportunity_score_omitted_until_computed() {
        let record = KeywordRecord {
            keyword: "vector database".to_string(),
            search_volume: Some(1200),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("opportunity_score").is_none());
        assert_eq!(value["search_volume"], json!(1200));
        assert_eq!(value["competition"], Value::Null);
    }
}
