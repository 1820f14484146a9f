//! Post entities and collection helpers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};
use uuid::Uuid;

use crate::domain::quiz::QuizQuestion;

pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

/// Position of one post inside a named series.
///
/// `order` is 1-based. `total` is the part count the author declared, which
/// may disagree with the number of parts actually discovered in the content
/// store; aggregation trusts discovered data and surfaces the mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
    pub name: String,
    pub order: u32,
    pub total: u32,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// One published content unit: a standalone article or one part of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Option<Uuid>,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: Date,
    pub tags: Vec<String>,
    pub reading_minutes: u32,
    pub reading_time: String,
    pub cover_image: Option<String>,
    pub fixed_url: Option<String>,
    pub series: Option<SeriesRef>,
    pub body_markdown: String,
    pub body_html: String,
    pub body_text: String,
    pub quiz: Option<Vec<QuizQuestion>>,
}

impl Post {
    pub fn is_series_part(&self) -> bool {
        self.series.is_some()
    }
}

/// Canonical listing order: newest first, slug as a deterministic tiebreak.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|post| post.slug == slug)
}

pub fn known_tags(posts: &[Post]) -> BTreeSet<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn post(slug: &str, date: Date, tags: &[&str]) -> Post {
        Post {
            id: None,
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            author: "Anonymous".to_string(),
            date,
            tags: tags.iter().map(ToString::to_string).collect(),
            reading_minutes: 1,
            reading_time: "1 min read".to_string(),
            cover_image: None,
            fixed_url: None,
            series: None,
            body_markdown: String::new(),
            body_html: String::new(),
            body_text: String::new(),
            quiz: None,
        }
    }

    #[test]
    fn sort_newest_first_orders_by_date_then_slug() {
        let mut posts = vec![
            post("b", date!(2024 - 01 - 10), &[]),
            post("a", date!(2024 - 01 - 10), &[]),
            post("c", date!(2024 - 03 - 01), &[]),
        ];

        sort_newest_first(&mut posts);

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["c", "a", "b"]);
    }

    #[test]
    fn known_tags_deduplicates() {
        let posts = vec![
            post("a", date!(2024 - 01 - 01), &["rust", "queues"]),
            post("b", date!(2024 - 01 - 02), &["rust"]),
        ];

        let tags = known_tags(&posts);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("rust"));
        assert!(tags.contains("queues"));
    }
}
