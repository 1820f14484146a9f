//! Catalog service: one pass from the content store to aggregated site data.

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::application::loader::{ContentLoader, SkippedUnit};
use crate::domain::posts::{self, Post};
use crate::domain::series::{Catalog, segregate};

const RECENT_POSTS_LIMIT: usize = 10;

/// Site-level rollups computed alongside the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_posts: usize,
    pub total_series: usize,
    pub total_independent_posts: usize,
    pub last_generated: OffsetDateTime,
    pub tags: Vec<String>,
    pub recent_posts: Vec<RecentPost>,
    pub average_reading_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub slug: String,
    pub title: String,
    pub date: Date,
    pub reading_time: String,
}

/// Everything downstream consumers need from one aggregation pass.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub posts: Vec<Post>,
    pub catalog: Catalog,
    pub stats: BlogStats,
}

#[derive(Debug, Clone)]
pub struct CatalogService {
    loader: ContentLoader,
}

impl CatalogService {
    pub fn new(loader: ContentLoader) -> Self {
        Self { loader }
    }

    /// Load, aggregate, and summarise the whole content store.
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot_with_report().0
    }

    /// Aggregation pass that also reports skipped units, for `validate`.
    pub fn snapshot_with_report(&self) -> (CatalogSnapshot, Vec<SkippedUnit>) {
        let (posts, skipped) = self.loader.load_all_with_report();
        let catalog = segregate(posts.clone());
        let stats = compute_stats(&posts, &catalog);

        (
            CatalogSnapshot {
                posts,
                catalog,
                stats,
            },
            skipped,
        )
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        self.loader.load_unit(slug).ok()
    }
}

fn compute_stats(posts: &[Post], catalog: &Catalog) -> BlogStats {
    let average_reading_minutes = if posts.is_empty() {
        0
    } else {
        let total: u32 = posts.iter().map(|post| post.reading_minutes).sum();
        total / posts.len() as u32
    };

    BlogStats {
        total_posts: posts.len(),
        total_series: catalog.learning_paths.len(),
        total_independent_posts: catalog.independent_posts.len(),
        last_generated: OffsetDateTime::now_utc(),
        tags: posts::known_tags(posts).into_iter().collect(),
        recent_posts: posts
            .iter()
            .take(RECENT_POSTS_LIMIT)
            .map(|post| RecentPost {
                slug: post.slug.clone(),
                title: post.title.clone(),
                date: post.date,
                reading_time: post.reading_time.clone(),
            })
            .collect(),
        average_reading_minutes,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::posts::SeriesRef;

    fn post(slug: &str, date: Date, minutes: u32, series: Option<SeriesRef>) -> Post {
        Post {
            id: None,
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            author: "Anonymous".to_string(),
            date,
            tags: vec!["rust".to_string()],
            reading_minutes: minutes,
            reading_time: format!("{minutes} min read"),
            cover_image: None,
            fixed_url: None,
            series,
            body_markdown: String::new(),
            body_html: String::new(),
            body_text: String::new(),
            quiz: None,
        }
    }

    #[test]
    fn stats_count_both_partitions() {
        let series = |order| {
            Some(SeriesRef {
                name: "X".to_string(),
                order,
                total: 2,
                prev: None,
                next: None,
            })
        };
        let posts = vec![
            post("solo", date!(2024 - 03 - 01), 4, None),
            post("x-1", date!(2024 - 01 - 01), 8, series(1)),
            post("x-2", date!(2024 - 02 - 01), 6, series(2)),
        ];
        let catalog = segregate(posts.clone());

        let stats = compute_stats(&posts, &catalog);

        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.total_series, 1);
        assert_eq!(stats.total_independent_posts, 1);
        assert_eq!(stats.tags, ["rust"]);
        assert_eq!(stats.average_reading_minutes, 6);
        assert_eq!(stats.recent_posts.len(), 3);
    }

    #[test]
    fn empty_store_yields_zeroed_stats() {
        let catalog = segregate(Vec::new());
        let stats = compute_stats(&[], &catalog);

        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.average_reading_minutes, 0);
        assert!(stats.recent_posts.is_empty());
    }
}
