//! Flat search index over the loaded posts.
//!
//! Scoring mirrors the public site's client search: title matches outrank
//! tag matches, which outrank content matches; exact title or tag equality
//! gets a further boost. Multi-word queries additionally score each word
//! on its own, in the title and per occurrence in the content. Anything
//! below a small floor is dropped.

use serde::Serialize;

use crate::domain::posts::Post;

const RESULT_LIMIT: usize = 20;
const SCORE_FLOOR: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Title,
    Tag,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub kind: MatchKind,
    pub score: u32,
}

/// Build the searchable projection of every post.
pub fn build_index(posts: &[Post]) -> Vec<SearchRecord> {
    posts
        .iter()
        .map(|post| SearchRecord {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            tags: post.tags.clone(),
            reading_time: post.reading_time.clone(),
            content: post.body_text.clone(),
        })
        .collect()
}

/// Case-insensitive query over the index, best matches first.
pub fn query<'a>(index: &'a [SearchRecord], term: &str) -> Vec<SearchHit<'a>> {
    let needle = term.trim().to_lowercase();
    if needle.len() < 2 {
        return Vec::new();
    }
    let words: Vec<&str> = needle
        .split_whitespace()
        .filter(|word| word.len() > 1)
        .collect();

    let mut hits: Vec<SearchHit<'a>> = index
        .iter()
        .filter_map(|record| score(record, &needle, &words))
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.slug.cmp(b.slug)));
    hits.truncate(RESULT_LIMIT);
    hits
}

fn score<'a>(record: &'a SearchRecord, needle: &str, words: &[&str]) -> Option<SearchHit<'a>> {
    let title = record.title.to_lowercase();
    let content = record.content.to_lowercase();
    let excerpt = record.excerpt.to_lowercase();

    let mut score = 0u32;
    let mut kind = MatchKind::Content;

    if title.contains(needle) {
        score += 100;
        kind = MatchKind::Title;
    }
    for word in words {
        if title.contains(word) {
            score += 50;
        }
    }
    if title == needle {
        score += 200;
    }

    let matching_tags = record
        .tags
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            tag.contains(needle) || words.iter().any(|word| tag.contains(word))
        })
        .count() as u32;
    if matching_tags > 0 {
        score += 75 * matching_tags;
        if kind != MatchKind::Title {
            kind = MatchKind::Tag;
        }
    }
    if record.tags.iter().any(|tag| tag.to_lowercase() == needle) {
        score += 100;
    }

    if content.contains(needle) {
        score += 25;
    }
    for word in words {
        score += 5 * content.matches(word).count() as u32;
    }
    if excerpt.contains(needle) {
        score += 15;
    }

    (score > SCORE_FLOOR).then_some(SearchHit {
        slug: &record.slug,
        title: &record.title,
        kind,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str, title: &str, tags: &[&str], content: &str) -> SearchRecord {
        SearchRecord {
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            tags: tags.iter().map(ToString::to_string).collect(),
            reading_time: "5 min read".to_string(),
            content: content.to_string(),
        }
    }

    fn index() -> Vec<SearchRecord> {
        vec![
            record(
                "littles-law",
                "Little's Law",
                &["queueing-theory", "performance"],
                "arrival rate times latency equals concurrency",
            ),
            record(
                "hash-tables",
                "Understanding Hash Tables",
                &["data-structures"],
                "buckets, probing, and load factor",
            ),
        ]
    }

    #[test]
    fn title_match_outranks_content_match() {
        let index = index();
        let hits = query(&index, "hash");

        assert_eq!(hits[0].slug, "hash-tables");
        assert_eq!(hits[0].kind, MatchKind::Title);
    }

    #[test]
    fn tag_matches_are_found() {
        let index = index();
        let hits = query(&index, "performance");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "littles-law");
        assert_eq!(hits[0].kind, MatchKind::Tag);
    }

    #[test]
    fn content_only_match_still_surfaces() {
        let index = index();
        let hits = query(&index, "probing");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, MatchKind::Content);
    }

    #[test]
    fn each_query_word_scores_the_title_on_its_own() {
        let index = index();
        let hits = query(&index, "hash law");

        // Neither title contains the whole phrase, but each contributes one
        // word, worth 50 apiece.
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.slug == "hash-tables"));
        assert!(hits.iter().any(|h| h.slug == "littles-law"));
        assert!(hits.iter().all(|h| h.score == 50));
    }

    #[test]
    fn content_occurrences_add_per_word_weight() {
        let index = index();
        let hits = query(&index, "load factor");

        // Whole-phrase content match (25) plus one occurrence of each word
        // (5 apiece).
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "hash-tables");
        assert_eq!(hits[0].score, 35);
    }

    #[test]
    fn single_query_word_matches_a_tag() {
        let index = index();
        let hits = query(&index, "queueing stuff");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "littles-law");
        assert_eq!(hits[0].kind, MatchKind::Tag);
        assert_eq!(hits[0].score, 75);
    }

    #[test]
    fn short_queries_return_nothing() {
        let index = index();
        assert!(query(&index, "h").is_empty());
        assert!(query(&index, "  ").is_empty());
    }
}
