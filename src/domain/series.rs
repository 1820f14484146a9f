//! Series aggregation: grouping ordered parts into learning paths.

use std::collections::BTreeMap;

use time::Date;
use tracing::warn;

use crate::domain::posts::{self, Post};
use crate::domain::quiz::QuizQuestion;
use crate::domain::reading;
use crate::domain::slug::derive_slug;

/// Derived view over every post sharing a series name.
///
/// Recomputed in full on each aggregation pass; it has no identity or
/// persistence of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningPath {
    pub name: String,
    pub slug: String,
    /// Taken from the first ordered part's excerpt.
    pub description: String,
    /// Strictly ascending by `series.order`.
    pub posts: Vec<Post>,
    /// Count of discovered parts, which may be less than any part's declared
    /// `series.total`.
    pub total_posts: usize,
    pub estimated_minutes: u32,
    pub estimated_time: String,
    /// Union of the parts' tags, first-seen order.
    pub tags: Vec<String>,
    pub latest_update: Date,
    /// Completion quiz, taken from the highest-order part that carries one.
    pub quiz: Option<Vec<QuizQuestion>>,
}

/// Result of partitioning a flat post list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    /// Posts without a series descriptor, newest first.
    pub independent_posts: Vec<Post>,
    /// Learning paths by latest update, newest first.
    pub learning_paths: Vec<LearningPath>,
}

/// Partition posts into independent articles and learning paths.
///
/// Pure function of its input: no I/O, deterministic, idempotent. Every input
/// post lands in exactly one of the two output collections. A series with a
/// single discovered part still yields a learning path; the presence of the
/// descriptor is sufficient.
pub fn segregate(posts: Vec<Post>) -> Catalog {
    let mut independent = Vec::new();
    let mut groups: BTreeMap<String, Vec<Post>> = BTreeMap::new();

    for post in posts {
        match &post.series {
            Some(series) => groups.entry(series.name.clone()).or_default().push(post),
            None => independent.push(post),
        }
    }

    posts::sort_newest_first(&mut independent);

    let mut paths: Vec<LearningPath> = groups
        .into_iter()
        .map(|(name, parts)| build_path(name, parts))
        .collect();
    paths.sort_by(|a, b| {
        b.latest_update
            .cmp(&a.latest_update)
            .then_with(|| a.name.cmp(&b.name))
    });

    Catalog {
        independent_posts: independent,
        learning_paths: paths,
    }
}

fn build_path(name: String, mut parts: Vec<Post>) -> LearningPath {
    parts.sort_by(|a, b| {
        let left = a.series.as_ref().map_or(0, |s| s.order);
        let right = b.series.as_ref().map_or(0, |s| s.order);
        left.cmp(&right).then_with(|| a.slug.cmp(&b.slug))
    });

    report_inconsistencies(&name, &parts);

    let slug = derive_slug(&name).unwrap_or_else(|_| name.clone());
    let description = parts
        .first()
        .map(|post| post.excerpt.clone())
        .unwrap_or_default();
    let estimated_minutes = parts.iter().map(|post| post.reading_minutes).sum();
    let latest_update = parts
        .iter()
        .map(|post| post.date)
        .max()
        .unwrap_or(Date::MIN);

    let mut tags: Vec<String> = Vec::new();
    for post in &parts {
        for tag in &post.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }

    let quiz = parts
        .iter()
        .rev()
        .find_map(|post| post.quiz.clone());

    LearningPath {
        name,
        slug,
        description,
        total_posts: parts.len(),
        estimated_minutes,
        estimated_time: reading::bucket_minutes(estimated_minutes),
        tags,
        latest_update,
        quiz,
        posts: parts,
    }
}

/// Declared metadata disagreeing with discovered parts is tolerated, but it
/// must stay observable rather than silently corrected.
fn report_inconsistencies(name: &str, parts: &[Post]) {
    let discovered = parts.len();

    if let Some(declared) = parts
        .iter()
        .filter_map(|post| post.series.as_ref().map(|s| s.total as usize))
        .max()
        && declared != discovered
    {
        warn!(
            series = name,
            declared, discovered, "series part count disagrees with declared total"
        );
    }

    for pair in parts.windows(2) {
        let left = pair[0].series.as_ref().map_or(0, |s| s.order);
        let right = pair[1].series.as_ref().map_or(0, |s| s.order);
        if left == right {
            warn!(
                series = name,
                order = left,
                "duplicate series order discovered; keeping both parts in slug order"
            );
        }
    }
}
