//! The five report stages, run strictly in order.
//!
//! Fetch, summarize, derive keywords, score keywords, assemble. Only an empty
//! fetch stops the run; every enrichment stage degrades to an empty result.

use crate::output;
use llm_interface::{extract_insights, LlmProvider};
use seo_client::{score_keywords, KeywordMetricsSource};
use std::path::PathBuf;
use tracing::{info, warn};
use trendscout_core::{assemble, derive_keywords, save_report, CoreError, Report};
use twitter_client::{fetch_trending_posts, PostSource, SearchQuery};

#[derive(Debug)]
pub enum RunOutcome {
    /// The search returned nothing; no report was written.
    NoPosts,
    Saved { report: Report, path: PathBuf },
}

pub struct Pipeline<'a, S, L, K> {
    search: &'a S,
    llm: &'a L,
    keyword_metrics: Option<&'a K>,
    output_dir: PathBuf,
}

impl<'a, S, L, K> Pipeline<'a, S, L, K>
where
    S: PostSource,
    L: LlmProvider,
    K: KeywordMetricsSource,
{
    pub fn new(
        search: &'a S,
        llm: &'a L,
        keyword_metrics: Option<&'a K>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            search,
            llm,
            keyword_metrics,
            output_dir,
        }
    }

    /// Errors only when the finished report cannot be written.
    pub async fn run(&self, query: &SearchQuery) -> Result<RunOutcome, CoreError> {
        let posts = fetch_trending_posts(self.search, query).await;
        if posts.is_empty() {
            warn!("No posts fetched for '{}', aborting run", query.keyword);
            return Ok(RunOutcome::NoPosts);
        }
        output::print_post_details(&posts);

        let insights = extract_insights(self.llm, &posts).await;

        let keywords = derive_keywords(&posts, &insights);
        output::print_keywords(&keywords);

        let records = score_keywords(self.keyword_metrics, &keywords).await;

        info!("Assembling report");
        let report = assemble(&posts, &insights, records);
        let path = save_report(&report, &self.output_dir)?;

        Ok(RunOutcome::Saved { report, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use trendscout_core::{KeywordApiError, KeywordRecord, LlmError, Post, SearchApiError};

    struct StaticSearch(Vec<Post>);

    impl PostSource for StaticSearch {
        async fn search_posts(&self, _query: &SearchQuery) -> Result<Vec<Post>, CoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSearch;

    impl PostSource for FailingSearch {
        async fn search_posts(&self, _query: &SearchQuery) -> Result<Vec<Post>, CoreError> {
            Err(SearchApiError::RequestTimeout { seconds: 30 }.into())
        }
    }

    struct StaticLlm(&'static str);

    impl LlmProvider for StaticLlm {
        fn name(&self) -> &str {
            "static"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, CoreError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingLlm;

    impl LlmProvider for FailingLlm {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, CoreError> {
            Err(LlmError::ServiceUnavailable {
                provider: "failing".to_string(),
                status_code: 503,
            }
            .into())
        }
    }

    #[derive(Default)]
    struct RecordingMetrics {
        requested: RefCell<Vec<String>>,
    }

    impl KeywordMetricsSource for RecordingMetrics {
        async fn keyword_metrics(
            &self,
            keywords: &[String],
        ) -> Result<Vec<KeywordRecord>, CoreError> {
            self.requested.borrow_mut().extend(keywords.iter().cloned());
            Ok(vec![
                KeywordRecord {
                    keyword: "rust agents".to_string(),
                    search_volume: Some(500),
                    competition: None,
                    ..Default::default()
                },
                KeywordRecord {
                    keyword: "ai robotics".to_string(),
                    search_volume: Some(1000),
                    competition: Some(0.4),
                    ..Default::default()
                },
                KeywordRecord {
                    keyword: "obscure".to_string(),
                    search_volume: Some(0),
                    ..Default::default()
                },
            ])
        }
    }

    struct FailingMetrics;

    impl KeywordMetricsSource for FailingMetrics {
        async fn keyword_metrics(
            &self,
            _keywords: &[String],
        ) -> Result<Vec<KeywordRecord>, CoreError> {
            Err(KeywordApiError::RateLimited.into())
        }
    }

    fn posts() -> Vec<Post> {
        vec![
            Post {
                text: "Robots learning from video".to_string(),
                like_count: 12,
                retweet_count: 0,
                bookmark_count: 3,
                author: Some("roboticist".to_string()),
                hashtags: vec!["Robotics".to_string(), "AI".to_string()],
            },
            Post {
                text: "Agents in Rust".to_string(),
                like_count: 10,
                retweet_count: 5,
                bookmark_count: 1,
                author: Some("ferris".to_string()),
                hashtags: vec!["Rust".to_string(), "AI".to_string()],
            },
        ]
    }

    fn report_files(dir: &std::path::Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_no_posts_aborts_without_report() {
        let dir = tempfile::tempdir().unwrap();
        let llm = StaticLlm("{}");
        let metrics = RecordingMetrics::default();
        let pipeline = Pipeline::new(
            &FailingSearch,
            &llm,
            Some(&metrics),
            dir.path().to_path_buf(),
        );

        let outcome = pipeline.run(&SearchQuery::new("AI", 100)).await.unwrap();

        assert!(matches!(outcome, RunOutcome::NoPosts));
        assert!(report_files(dir.path()).is_empty());
        assert!(metrics.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_aborts_without_report() {
        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch(Vec::new());
        let llm = StaticLlm("{}");
        let pipeline = Pipeline::new(
            &search,
            &llm,
            None::<&RecordingMetrics>,
            dir.path().to_path_buf(),
        );

        let outcome = pipeline.run(&SearchQuery::new("AI", 100)).await.unwrap();
        assert!(matches!(outcome, RunOutcome::NoPosts));
        assert!(report_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_enrichment_still_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch(posts());
        let pipeline = Pipeline::new(
            &search,
            &FailingLlm,
            Some(&FailingMetrics),
            dir.path().to_path_buf(),
        );

        let outcome = pipeline.run(&SearchQuery::new("AI", 100)).await.unwrap();

        let RunOutcome::Saved { report, path } = outcome else {
            panic!("expected a saved report");
        };
        assert_eq!(report_files(dir.path()), vec![path.clone()]);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["total_tweets"], 2);
        for key in ["topics", "emerging_trends", "key_technologies", "recommended_keywords"] {
            assert_eq!(written["ai_insights"][key], serde_json::json!([]));
        }
        assert_eq!(written["seo_analysis"]["all_keyword_data"], serde_json::json!([]));
        assert_eq!(report.summary.keywords_analyzed, 0);
    }

    #[tokio::test]
    async fn test_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let search = StaticSearch(posts());
        let llm = StaticLlm(
            r#"Here is the analysis: {"topics": ["Embodied AI"], "trends": ["robot foundation models"], "technologies": ["ROS"], "keywords": ["ai robotics"]}"#,
        );
        let metrics = RecordingMetrics::default();
        let pipeline = Pipeline::new(&search, &llm, Some(&metrics), dir.path().to_path_buf());

        let outcome = pipeline.run(&SearchQuery::new("AI", 100)).await.unwrap();
        let RunOutcome::Saved { report, path } = outcome else {
            panic!("expected a saved report");
        };

        assert!(path.exists());
        assert_eq!(
            metrics.requested.borrow().as_slice(),
            ["ai robotics", "embodied ai", "robotics", "ros", "rust"]
        );

        assert_eq!(report.summary.total_tweets, 2);
        assert_eq!(report.summary.unique_hashtags, 3);
        assert_eq!(report.summary.total_engagement, 32);
        assert_eq!(report.summary.keywords_analyzed, 3);

        assert_eq!(report.top_trending_tweets[0].author, "ferris");
        assert_eq!(report.top_trending_tweets[0].engagement.score, 20);
        assert_eq!(report.top_hashtags[0].tag, "AI");
        assert_eq!(report.top_hashtags[0].mentions, 2);

        let best: Vec<(&str, Option<u64>)> = report
            .seo_analysis
            .best_opportunities
            .iter()
            .map(|r| (r.keyword.as_str(), r.opportunity_score))
            .collect();
        assert_eq!(best, vec![("ai robotics", Some(600)), ("rust agents", Some(500))]);

        let all: Vec<&str> = report
            .seo_analysis
            .all_keyword_data
            .iter()
            .map(|r| r.keyword.as_str())
            .collect();
        assert_eq!(all, vec!["ai robotics", "rust agents", "obscure"]);
        assert_eq!(report.ai_insights.emerging_trends, vec!["robot foundation models"]);
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let search = StaticSearch(posts());
        let pipeline = Pipeline::new(&search, &FailingLlm, None::<&FailingMetrics>, blocker);

        let result = pipeline.run(&SearchQuery::new("AI", 100)).await;
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
