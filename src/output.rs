//! Human-readable console output. Diagnostics go through `tracing` instead.

use std::path::Path;
use trendscout_core::{KeywordRecord, Post, Report};

const RULE_WIDTH: usize = 60;
const DETAIL_RULE_WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 150;
const CONSOLE_KEYWORDS: usize = 10;
const CONSOLE_INSIGHTS: usize = 3;

/// First `max_chars` characters of `text`, with `...` when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn print_banner(keyword: &str, min_likes: u32) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("🚀 AI Trends Analyzer with SEO Keywords");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("🔍 Keyword: '{keyword}' | Min Likes: {min_likes}");
    println!();
}

pub fn print_post_details(posts: &[Post]) {
    println!("\n{}", "=".repeat(DETAIL_RULE_WIDTH));
    println!("📱 TWEET DETAILS");
    println!("{}", "=".repeat(DETAIL_RULE_WIDTH));

    for (i, post) in posts.iter().enumerate() {
        let total = post.like_count + post.retweet_count + post.bookmark_count;
        println!("\n[Tweet #{}]", i + 1);
        println!("👤 Author: @{}", post.author_or_unknown());
        println!("📝 Text: {}", preview(&post.text, PREVIEW_CHARS));
        println!("📊 Engagement:");
        println!("   ❤️  Likes:     {}", format_thousands(post.like_count));
        println!("   🔄 Retweets:  {}", format_thousands(post.retweet_count));
        println!("   🔖 Bookmarks: {}", format_thousands(post.bookmark_count));
        println!("   📈 Total:     {}", format_thousands(total));
        println!("{}", "-".repeat(DETAIL_RULE_WIDTH));
    }
}

pub fn print_keywords(keywords: &[String]) {
    let shown: Vec<&str> = keywords
        .iter()
        .take(CONSOLE_KEYWORDS)
        .map(String::as_str)
        .collect();
    println!("\n🔑 Extracted keywords: {}", shown.join(", "));
}

pub fn opportunity_row(position: usize, record: &KeywordRecord) -> String {
    let volume = match record.search_volume {
        Some(volume) if volume > 0 => format_thousands(volume),
        _ => "N/A".to_string(),
    };
    let competition = record
        .competition
        .map(|c| format!("{c:.2}"))
        .unwrap_or_else(|| "N/A".to_string());
    let difficulty = match record.difficulty {
        Some(difficulty) if difficulty > 0 => difficulty.to_string(),
        _ => "N/A".to_string(),
    };

    format!(
        "   {}. {:<40} Search Volume: {:>10} | Competition: {:>6} | Difficulty: {:>6}",
        position, record.keyword, volume, competition, difficulty
    )
}

pub fn print_summary(report: &Report, path: &Path) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("✨ Analysis Complete!");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("\n📈 Summary:");
    println!("   • Tweets analyzed: {}", report.summary.total_tweets);
    println!("   • Unique hashtags: {}", report.summary.unique_hashtags);
    println!("   • Total engagement: {}", report.summary.total_engagement);
    println!("   • Keywords analyzed: {}", report.summary.keywords_analyzed);

    let insights = &report.ai_insights;
    if !insights.topics.is_empty() {
        println!("\n🎯 Top Topics: {}", leading(&insights.topics));
    }
    if !insights.emerging_trends.is_empty() {
        println!("📊 Emerging Trends: {}", leading(&insights.emerging_trends));
    }

    let best = &report.seo_analysis.best_opportunities;
    if !best.is_empty() {
        println!("\n💎 Top Keywords (by opportunity):");
        for (i, record) in best.iter().enumerate() {
            println!("{}", opportunity_row(i + 1, record));
        }
    }

    println!("\n📄 Full report: {}", path.display());
    println!();
}

fn leading(items: &[String]) -> String {
    items
        .iter()
        .take(CONSOLE_INSIGHTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(40500), "40,500");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 150), "short");
        let long = "a".repeat(151);
        assert_eq!(preview(&long, 150), format!("{}...", "a".repeat(150)));
        assert_eq!(preview("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_opportunity_row() {
        let record = KeywordRecord {
            keyword: "ai agents".to_string(),
            search_volume: Some(40500),
            competition: Some(0.123),
            cpc: Some(4.31),
            difficulty: Some(67),
            opportunity_score: Some(35519),
        };
        let row = opportunity_row(1, &record);
        assert!(row.starts_with("   1. ai agents "));
        assert!(row.contains("Search Volume:     40,500"));
        assert!(row.contains("Competition:   0.12"));
        assert!(row.ends_with("Difficulty:     67"));
    }

    #[test]
    fn test_opportunity_row_unknown_values() {
        let record = KeywordRecord {
            keyword: "edge inference".to_string(),
            search_volume: Some(90),
            ..Default::default()
        };
        let row = opportunity_row(2, &record);
        assert!(row.contains("Competition:    N/A"));
        assert!(row.ends_with("Difficulty:    N/A"));
    }

    #[test]
    fn test_leading_takes_three() {
        let items: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(leading(&items), "a, b, c");
    }
}
