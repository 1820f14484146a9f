//! Static data export: the aggregated catalog written out as JSON documents
//! for the downstream site build.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use time::Date;
use tracing::info;

use crate::application::catalog::{BlogStats, CatalogSnapshot};
use crate::application::search::SearchRecord;
use crate::domain::posts::{Post, SeriesRef};
use crate::domain::series::LearningPath;

pub const BLOG_DATA_FILE: &str = "blog-data.json";
pub const POSTS_INDEX_FILE: &str = "posts-index.json";
pub const LEARNING_PATHS_FILE: &str = "learning-paths.json";
pub const BLOG_STATS_FILE: &str = "blog-stats.json";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed writing `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed encoding export data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Post projection carried by `posts-index.json` and `blog-data.json`;
/// body content stays out of the index documents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostIndexEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: Date,
    excerpt: &'a str,
    author: &'a str,
    tags: &'a [String],
    reading_time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a SeriesRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PathPostSummary<'a> {
    slug: &'a str,
    title: &'a str,
    date: Date,
    reading_time: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LearningPathSummary<'a> {
    name: &'a str,
    slug: &'a str,
    description: &'a str,
    total_posts: usize,
    estimated_time: &'a str,
    tags: &'a [String],
    latest_update: Date,
    posts: Vec<PathPostSummary<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlogData<'a> {
    posts: Vec<PostIndexEntry<'a>>,
    learning_paths: Vec<LearningPathSummary<'a>>,
    stats: &'a BlogStats,
}

/// Files written by one export pass.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct StaticDataExporter {
    out_dir: PathBuf,
}

impl StaticDataExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write the full static-data set into the output directory, creating it
    /// if needed.
    pub fn export(
        &self,
        snapshot: &CatalogSnapshot,
        search_index: &[SearchRecord],
    ) -> Result<ExportSummary, ExportError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let posts: Vec<PostIndexEntry<'_>> =
            snapshot.posts.iter().map(post_index_entry).collect();
        let learning_paths: Vec<LearningPathSummary<'_>> = snapshot
            .catalog
            .learning_paths
            .iter()
            .map(path_summary)
            .collect();
        let blog_data = BlogData {
            posts,
            learning_paths,
            stats: &snapshot.stats,
        };

        let mut summary = ExportSummary::default();
        self.write_json(BLOG_DATA_FILE, &blog_data, &mut summary)?;
        self.write_json(POSTS_INDEX_FILE, &blog_data.posts, &mut summary)?;
        self.write_json(LEARNING_PATHS_FILE, &blog_data.learning_paths, &mut summary)?;
        self.write_json(BLOG_STATS_FILE, &snapshot.stats, &mut summary)?;
        self.write_json(SEARCH_INDEX_FILE, &search_index, &mut summary)?;

        Ok(summary)
    }

    fn write_json<T: Serialize>(
        &self,
        name: &str,
        value: &T,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let path = self.out_dir.join(name);
        let encoded = serde_json::to_vec_pretty(value)?;

        fs::write(&path, &encoded).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!(file = name, bytes = encoded.len(), "wrote static data file");
        summary.written.push(path);
        Ok(())
    }
}

fn post_index_entry(post: &Post) -> PostIndexEntry<'_> {
    PostIndexEntry {
        slug: &post.slug,
        title: &post.title,
        date: post.date,
        excerpt: &post.excerpt,
        author: &post.author,
        tags: &post.tags,
        reading_time: &post.reading_time,
        series: post.series.as_ref(),
    }
}

fn path_summary(path: &LearningPath) -> LearningPathSummary<'_> {
    LearningPathSummary {
        name: &path.name,
        slug: &path.slug,
        description: &path.description,
        total_posts: path.total_posts,
        estimated_time: &path.estimated_time,
        tags: &path.tags,
        latest_update: path.latest_update,
        posts: path
            .posts
            .iter()
            .map(|post| PathPostSummary {
                slug: &post.slug,
                title: &post.title,
                date: post.date,
                reading_time: &post.reading_time,
            })
            .collect(),
    }
}
