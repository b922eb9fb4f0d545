pub mod api;

pub use api::{DataForSeoClient, KeywordIdeasResponse, KeywordIdeasTask};

use tracing::{info, warn};
use trendscout_core::{CoreError, ErrorRecovery, KeywordRecord};

/// Search metrics for a batch of keywords.
pub trait KeywordMetricsSource {
    async fn keyword_metrics(&self, keywords: &[String]) -> Result<Vec<KeywordRecord>, CoreError>;
}

impl KeywordMetricsSource for DataForSeoClient {
    async fn keyword_metrics(&self, keywords: &[String]) -> Result<Vec<KeywordRecord>, CoreError> {
        self.keyword_ideas(keywords).await
    }
}

/// Scoring stage. Returns records sorted by search volume, highest first,
/// counting an unknown volume as zero. Empty when there is nothing to score,
/// when no source is configured, or when the call fails.
pub async fn score_keywords<K: KeywordMetricsSource>(
    source: Option<&K>,
    keywords: &[String],
) -> Vec<KeywordRecord> {
    if keywords.is_empty() {
        warn!("No keywords to analyze");
        return Vec::new();
    }
    let Some(source) = source else {
        warn!("Keyword metrics credentials not configured, skipping keyword analysis");
        return Vec::new();
    };

    info!("Analyzing {} keywords", keywords.len());
    let outcome = ErrorRecovery::degrade_to_default(
        "Keyword analysis",
        source.keyword_metrics(keywords).await,
    );
    let mut records = outcome.into_inner();
    records.sort_by(|a, b| b.volume_or_zero().cmp(&a.volume_or_zero()));
    info!("Analyzed {} keywords", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use trendscout_core::KeywordApiError;

    struct FakeMetrics {
        fail: bool,
        calls: Cell<usize>,
    }

    impl FakeMetrics {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Cell::new(0),
            }
        }
    }

    impl KeywordMetricsSource for FakeMetrics {
        async fn keyword_metrics(
            &self,
            keywords: &[String],
        ) -> Result<Vec<KeywordRecord>, CoreError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(KeywordApiError::ServerError { status_code: 500 }.into());
            }
            Ok(keywords
                .iter()
                .enumerate()
                .map(|(i, keyword)| KeywordRecord {
                    keyword: keyword.clone(),
                    search_volume: if i == 0 { None } else { Some(i as u64 * 100) },
                    ..Default::default()
                })
                .collect())
        }
    }

    fn keywords() -> Vec<String> {
        vec!["llm".to_string(), "rag".to_string(), "agents".to_string()]
    }

    #[test]
    fn test_sorted_by_volume_with_unknown_last() {
        let source = FakeMetrics::new(false);
        let records = tokio_test::block_on(score_keywords(Some(&source), &keywords()));

        let names: Vec<&str> = records.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(names, vec!["agents", "rag", "llm"]);
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_unconfigured_source_is_skipped() {
        let records =
            tokio_test::block_on(score_keywords::<FakeMetrics>(None, &keywords()));
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_keywords_skip_the_call() {
        let source = FakeMetrics::new(false);
        let records = tokio_test::block_on(score_keywords(Some(&source), &[]));
        assert!(records.is_empty());
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_failed_call_yields_empty() {
        let source = FakeMetrics::new(true);
        let records = tokio_test::block_on(score_keywords(Some(&source), &keywords()));
        assert!(records.is_empty());
        assert_eq!(source.calls.get(), 1);
    }
}
