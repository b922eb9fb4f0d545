use crate::{InsightBundle, Post};
use std::collections::BTreeSet;

/// Upper bound on keywords sent to the paid metrics API.
pub const MAX_KEYWORDS: usize = 20;

const MIN_KEYWORD_CHARS: usize = 2;
const MAX_KEYWORD_CHARS: usize = 50;

/// Lower-cased union of post hashtags and the model's keywords, topics and
/// technologies. Keeps entries strictly longer than 2 and shorter than 50
/// characters, at most [`MAX_KEYWORDS`] of them in lexical order.
pub fn derive_keywords(posts: &[Post], insights: &InsightBundle) -> Vec<String> {
    let hashtags = posts
        .iter()
        .flat_map(|post| post.hashtags.iter().cloned())
        .filter(|tag| !tag.is_empty());

    let from_model = insights
        .keywords()
        .into_iter()
        .chain(insights.topics())
        .chain(insights.technologies());

    let keywords: BTreeSet<String> = hashtags
        .chain(from_model)
        .map(|keyword| keyword.to_lowercase())
        .filter(|keyword| {
            let chars = keyword.chars().count();
            chars > MIN_KEYWORD_CHARS && chars < MAX_KEYWORD_CHARS
        })
        .collect();

    keywords.into_iter().take(MAX_KEYWORDS).collect()
}
