//! Prev/next navigation and progress indicators within a learning path.

use crate::domain::series::LearningPath;

/// Navigation state for one part of a series.
///
/// `has_prev`/`has_next` say whether the reader is at a boundary; the
/// resolved slugs are separate because a gap in the discovered parts leaves a
/// direction enabled-but-unresolvable, which callers render as a disabled
/// control rather than a broken link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesNavigation {
    pub current_order: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_slug: Option<String>,
    pub next_slug: Option<String>,
    /// `round(position / discovered_total * 100)`, capped at 100. Quiz
    /// completion is reported separately as 100.
    pub progress_percent: u8,
}

impl SeriesNavigation {
    /// Locate `current_order` inside the path. Returns `None` when no
    /// discovered part carries that order.
    pub fn locate(path: &LearningPath, current_order: u32) -> Option<Self> {
        let position = path
            .posts
            .iter()
            .position(|post| post.series.as_ref().is_some_and(|s| s.order == current_order))?;

        let total = path.total_posts;
        let has_prev = current_order > 1;
        let has_next = position + 1 < total;

        let prev_slug = current_order
            .checked_sub(1)
            .filter(|order| *order >= 1)
            .and_then(|order| slug_at_order(path, order));
        let next_slug = slug_at_order(path, current_order + 1);

        let percent = ((position + 1) * 200 + total) / (2 * total);
        let progress_percent = u8::try_from(percent.min(100)).unwrap_or(100);

        Some(Self {
            current_order,
            has_prev,
            has_next,
            prev_slug,
            next_slug,
            progress_percent,
        })
    }
}

fn slug_at_order(path: &LearningPath, order: u32) -> Option<String> {
    path.posts
        .iter()
        .find(|post| post.series.as_ref().is_some_and(|s| s.order == order))
        .map(|post| post.slug.clone())
}
