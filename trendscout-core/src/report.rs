//! Report assembly and persistence.
//!
//! [`assemble`] merges the fetched posts, the model's insights and the scored
//! keywords into the report document. It is a pure function of its inputs
//! apart from the generation timestamp.

use crate::{CoreError, InsightBundle, KeywordRecord, Post};
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAX_REPORT_TEXT_CHARS: usize = 200;
pub const MAX_REPORT_HASHTAGS: usize = 5;
pub const MAX_TOP_POSTS: usize = 10;
pub const MAX_TOP_HASHTAGS: usize = 10;
pub const MAX_BEST_OPPORTUNITIES: usize = 10;

pub const REPORT_FILE_PREFIX: &str = "ai_trends_analysis_";
const REPORT_FILE_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";
const GENERATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(serialize_with = "serialize_generated_at")]
    pub generated_at: NaiveDateTime,
    pub summary: ReportSummary,
    pub ai_insights: AiInsights,
    pub seo_analysis: SeoAnalysis,
    pub top_trending_tweets: Vec<RankedPost>,
    pub top_hashtags: Vec<HashtagCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_tweets: usize,
    pub unique_hashtags: usize,
    pub total_engagement: u64,
    pub keywords_analyzed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsights {
    pub topics: Vec<String>,
    pub emerging_trends: Vec<String>,
    pub key_technologies: Vec<String>,
    pub recommended_keywords: Vec<String>,
}

impl From<&InsightBundle> for AiInsights {
    fn from(bundle: &InsightBundle) -> Self {
        Self {
            topics: bundle.topics(),
            emerging_trends: bundle.trends(),
            key_technologies: bundle.technologies(),
            recommended_keywords: bundle.keywords(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoAnalysis {
    pub best_opportunities: Vec<KeywordRecord>,
    pub all_keyword_data: Vec<KeywordRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPost {
    pub rank: usize,
    pub text: String,
    pub engagement: Engagement,
    pub author: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub retweets: u64,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagCount {
    pub tag: String,
    pub mentions: usize,
}

fn serialize_generated_at<S: Serializer>(
    generated_at: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&generated_at.format(GENERATED_AT_FORMAT))
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Ranking value for a keyword, or `None` when it has no search volume.
///
/// Competition scales the volume down only while it is known and below 1.0;
/// at 1.0 or when unknown the raw volume is used.
pub fn opportunity_score(record: &KeywordRecord) -> Option<u64> {
    let volume = record.volume_or_zero();
    if volume == 0 {
        return None;
    }
    match record.competition {
        Some(competition) if competition < 1.0 => {
            Some((volume as f64 * (1.0 - competition)).round() as u64)
        }
        _ => Some(volume),
    }
}

/// Stores each record's opportunity score and returns the best ones, highest first.
pub fn rank_opportunities(records: &mut [KeywordRecord]) -> Vec<KeywordRecord> {
    for record in records.iter_mut() {
        record.opportunity_score = opportunity_score(record);
    }

    let mut best: Vec<KeywordRecord> = records
        .iter()
        .filter(|record| record.opportunity_score.is_some())
        .cloned()
        .collect();
    best.sort_by(|a, b| b.opportunity_score.cmp(&a.opportunity_score));
    best.truncate(MAX_BEST_OPPORTUNITIES);
    best
}

/// Posts ordered by engagement score, highest first. Ties keep fetch order.
/// `rank` is the 1-based position in fetch order and travels with the post.
pub fn rank_posts(posts: &[Post]) -> Vec<RankedPost> {
    let mut ranked: Vec<(usize, &Post)> = posts.iter().enumerate().collect();
    ranked.sort_by(|(_, a), (_, b)| b.engagement_score().cmp(&a.engagement_score()));

    ranked
        .into_iter()
        .take(MAX_TOP_POSTS)
        .map(|(i, post)| RankedPost {
            rank: i + 1,
            text: truncate_chars(&post.text, MAX_REPORT_TEXT_CHARS),
            engagement: Engagement {
                likes: post.like_count,
                retweets: post.retweet_count,
                score: post.engagement_score(),
            },
            author: post.author_or_unknown().to_string(),
            hashtags: post
                .hashtags
                .iter()
                .take(MAX_REPORT_HASHTAGS)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Every distinct hashtag with its count, most frequent first.
/// Equal counts keep the order in which the tags were first seen.
pub fn hashtag_frequency(posts: &[Post]) -> Vec<HashtagCount> {
    let mut counts: Vec<HashtagCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in posts.iter().flat_map(|post| post.hashtags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].mentions += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push(HashtagCount {
                    tag: tag.clone(),
                    mentions: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    counts
}

pub fn assemble(posts: &[Post], insights: &InsightBundle, keywords: Vec<KeywordRecord>) -> Report {
    assemble_at(posts, insights, keywords, Local::now().naive_local())
}

pub fn assemble_at(
    posts: &[Post],
    insights: &InsightBundle,
    mut keywords: Vec<KeywordRecord>,
    generated_at: NaiveDateTime,
) -> Report {
    // The file keeps microseconds only.
    let generated_at = generated_at.trunc_subsecs(6);
    let best_opportunities = rank_opportunities(&mut keywords);

    let mut hashtags = hashtag_frequency(posts);
    let unique_hashtags = hashtags.len();
    hashtags.truncate(MAX_TOP_HASHTAGS);

    let summary = ReportSummary {
        total_tweets: posts.len(),
        unique_hashtags,
        total_engagement: posts.iter().map(Post::engagement_score).sum(),
        keywords_analyzed: keywords.len(),
    };
    debug!(?summary, "Assembled report summary");

    Report {
        generated_at,
        summary,
        ai_insights: AiInsights::from(insights),
        seo_analysis: SeoAnalysis {
            best_opportunities,
            all_keyword_data: keywords,
        },
        top_trending_tweets: rank_posts(posts),
        top_hashtags: hashtags,
    }
}

pub fn report_file_name(generated_at: &NaiveDateTime) -> String {
    format!(
        "{}{}.json",
        REPORT_FILE_PREFIX,
        generated_at.format(REPORT_FILE_TIMESTAMP)
    )
}

/// Writes the report as pretty-printed JSON into `dir`, creating it if needed.
pub fn save_report(report: &Report, dir: &Path) -> Result<PathBuf, CoreError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&report.generated_at));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    info!("Report saved to {}", path.display());
    Ok(path)
}
