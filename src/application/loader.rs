//! Content store loader: scans post units, parses metadata, derives fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::render;
use crate::domain::posts::{ISO_DATE_FORMAT, Post, SeriesRef, sort_newest_first};
use crate::domain::quiz::{self, QuizQuestion};
use crate::domain::reading;

pub const METADATA_FILE: &str = "metadata.json";
pub const BODY_FILE: &str = "index.md";
pub const QUIZ_FILE: &str = "quiz.json";

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHOR: &str = "Anonymous";

/// Why one content unit was left out of the catalog. Loading is
/// skip-and-continue by design: one bad unit never takes down the listing.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("missing {METADATA_FILE}")]
    MissingMetadata,
    #[error("missing {BODY_FILE}")]
    MissingBody,
    #[error("unreadable unit: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("invalid date `{value}`: {source}")]
    InvalidDate {
        value: String,
        source: time::error::Parse,
    },
    #[error("invalid series order {order} for declared total {total}")]
    InvalidSeriesOrder { order: u32, total: u32 },
    #[error("broken quiz definition: {0}")]
    Quiz(#[from] quiz::QuizError),
}

/// A unit the loader had to skip, kept for `validate` reporting.
#[derive(Debug)]
pub struct SkippedUnit {
    pub slug: String,
    pub reason: UnitError,
}

/// Declared metadata for one unit, deserialized against an explicit schema
/// rather than scraped out of the file with string heuristics. Unknown fields
/// are ignored; absent fields fall back to computed defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitMetadata {
    post_id: Option<Uuid>,
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
    author: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    cover_image: Option<String>,
    fixed_url: Option<String>,
    series: Option<SeriesRef>,
}

/// Scans a content root where each child directory is one post unit holding
/// a metadata declaration and a markdown body.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    words_per_minute: u32,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>, words_per_minute: u32) -> Self {
        Self {
            root: root.into(),
            words_per_minute,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every unit, newest first. Fails softly: an absent content root
    /// yields an empty list, and malformed units are skipped with a warning.
    pub fn load_all(&self) -> Vec<Post> {
        self.load_all_with_report().0
    }

    /// Like [`Self::load_all`], additionally returning the units that were
    /// skipped and why.
    pub fn load_all_with_report(&self) -> (Vec<Post>, Vec<SkippedUnit>) {
        let mut posts = Vec::new();
        let mut skipped = Vec::new();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "content root unavailable; serving empty catalog");
                return (posts, skipped);
            }
        };

        let mut slugs: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        slugs.sort_unstable();

        for slug in slugs {
            match self.load_unit(&slug) {
                Ok(post) => posts.push(post),
                Err(reason) => {
                    warn!(unit = %slug, error = %reason, "skipping content unit");
                    skipped.push(SkippedUnit { slug, reason });
                }
            }
        }

        sort_newest_first(&mut posts);
        debug!(
            loaded = posts.len(),
            skipped = skipped.len(),
            "content scan complete"
        );
        (posts, skipped)
    }

    /// Load a single unit by slug.
    pub fn load_unit(&self, slug: &str) -> Result<Post, UnitError> {
        let unit_dir = self.root.join(slug);

        let metadata_path = unit_dir.join(METADATA_FILE);
        if !metadata_path.is_file() {
            return Err(UnitError::MissingMetadata);
        }
        let body_path = unit_dir.join(BODY_FILE);
        if !body_path.is_file() {
            return Err(UnitError::MissingBody);
        }

        let metadata: UnitMetadata = serde_json::from_str(&fs::read_to_string(&metadata_path)?)?;
        let body_markdown = fs::read_to_string(&body_path)?;
        let quiz = self.load_quiz(&unit_dir)?;

        self.build_post(slug, metadata, body_markdown, quiz)
    }

    fn load_quiz(&self, unit_dir: &Path) -> Result<Option<Vec<QuizQuestion>>, UnitError> {
        let quiz_path = unit_dir.join(QUIZ_FILE);
        if !quiz_path.is_file() {
            return Ok(None);
        }

        let questions: Vec<QuizQuestion> = serde_json::from_str(&fs::read_to_string(&quiz_path)?)?;
        quiz::validate(&questions)?;
        Ok(Some(questions))
    }

    fn build_post(
        &self,
        slug: &str,
        metadata: UnitMetadata,
        body_markdown: String,
        quiz: Option<Vec<QuizQuestion>>,
    ) -> Result<Post, UnitError> {
        if let Some(series) = &metadata.series
            && (series.order == 0 || series.order > series.total)
        {
            return Err(UnitError::InvalidSeriesOrder {
                order: series.order,
                total: series.total,
            });
        }

        let date = match metadata.date {
            Some(value) => Date::parse(&value, ISO_DATE_FORMAT)
                .map_err(|source| UnitError::InvalidDate { value, source })?,
            None => OffsetDateTime::now_utc().date(),
        };

        let body_text = render::plain_text(&body_markdown);
        let excerpt = match metadata.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt,
            _ => render::default_excerpt(&body_markdown),
        };

        let words = reading::word_count(&body_markdown);
        let reading_minutes = reading::minutes_for(words, self.words_per_minute);

        Ok(Post {
            id: metadata.post_id,
            slug: slug.to_string(),
            title: metadata
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            excerpt,
            author: metadata
                .author
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            date,
            tags: metadata.tags,
            reading_minutes,
            reading_time: reading::label(reading_minutes),
            cover_image: metadata
                .cover_image
                .map(|image| resolve_cover_image(slug, &image)),
            fixed_url: metadata.fixed_url,
            series: metadata.series,
            body_html: render::render_html(&body_markdown),
            body_markdown,
            body_text,
            quiz,
        })
    }
}

/// Unit-relative cover paths (`./assets/x.png`) rewrite to the public path
/// rooted at the unit's slug; absolute paths pass through unchanged.
fn resolve_cover_image(slug: &str, image: &str) -> String {
    if let Some(rest) = image.strip_prefix("./") {
        format!("/posts/{slug}/{rest}")
    } else {
        image.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_cover_paths_root_at_the_unit() {
        assert_eq!(
            resolve_cover_image("littles-law", "./assets/overview.png"),
            "/posts/littles-law/assets/overview.png"
        );
    }

    #[test]
    fn absolute_cover_paths_pass_through() {
        assert_eq!(
            resolve_cover_image("littles-law", "/posts/littles-law/assets/overview.png"),
            "/posts/littles-law/assets/overview.png"
        );
    }

    #[test]
    fn metadata_defaults_fill_missing_fields() {
        let loader = ContentLoader::new("unused", reading::DEFAULT_WORDS_PER_MINUTE);
        let post = loader
            .build_post(
                "bare-unit",
                UnitMetadata::default(),
                "A body with very little in it.".to_string(),
                None,
            )
            .expect("post");

        assert_eq!(post.title, "Untitled");
        assert_eq!(post.author, "Anonymous");
        assert!(post.tags.is_empty());
        assert_eq!(post.excerpt, "A body with very little in it.");
        assert_eq!(post.reading_time, "1 min read");
    }

    #[test]
    fn declared_excerpt_wins_over_derived() {
        let loader = ContentLoader::new("unused", reading::DEFAULT_WORDS_PER_MINUTE);
        let metadata = UnitMetadata {
            excerpt: Some("Declared.".to_string()),
            ..UnitMetadata::default()
        };
        let post = loader
            .build_post("unit", metadata, "Derived body text.".to_string(), None)
            .expect("post");

        assert_eq!(post.excerpt, "Declared.");
    }

    #[test]
    fn out_of_range_series_order_is_rejected() {
        let loader = ContentLoader::new("unused", reading::DEFAULT_WORDS_PER_MINUTE);
        let metadata = UnitMetadata {
            series: Some(crate::domain::posts::SeriesRef {
                name: "X".to_string(),
                order: 4,
                total: 3,
                prev: None,
                next: None,
            }),
            ..UnitMetadata::default()
        };

        let err = loader
            .build_post("unit", metadata, String::new(), None)
            .expect_err("order beyond declared total");
        assert!(matches!(
            err,
            UnitError::InvalidSeriesOrder { order: 4, total: 3 }
        ));
    }
}
