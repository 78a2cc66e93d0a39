//! Content loader - loads posts from the posts directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::frontmatter::{parse_date_string, FrontMatterError};
use super::{FrontMatter, MarkdownRenderer, Post, PostRecord};
use crate::error::{LoadError, LoadResult};
use crate::Site;

/// Read every post in `posts_dir` and return their records, newest first.
///
/// Equal dates are ordered by id ascending. Any unreadable or malformed
/// post fails the whole load.
pub fn load_sorted_posts(posts_dir: &Path) -> LoadResult<Vec<PostRecord>> {
    let mut records = post_files(posts_dir)?
        .into_iter()
        .map(|(id, path)| read_post(&path, id).map(|(record, _)| record))
        .collect::<LoadResult<Vec<_>>>()?;

    records.sort_by(PostRecord::listing_order);
    tracing::debug!("Loaded {} posts from {:?}", records.len(), posts_dir);
    Ok(records)
}

/// Ids of every post in `posts_dir`, in listing order
pub fn post_ids(posts_dir: &Path) -> LoadResult<Vec<String>> {
    Ok(load_sorted_posts(posts_dir)?
        .into_iter()
        .map(|record| record.id)
        .collect())
}

/// Loads posts and renders their bodies for a site
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight_theme,
            site.config.line_numbers,
        );
        Self { site, renderer }
    }

    /// Post records, newest first
    pub fn sorted_posts(&self) -> LoadResult<Vec<PostRecord>> {
        load_sorted_posts(&self.site.posts_dir)
    }

    /// Ids of every post, newest first
    pub fn post_ids(&self) -> LoadResult<Vec<String>> {
        post_ids(&self.site.posts_dir)
    }

    /// Load a single post by id, with its body rendered
    pub fn load_post(&self, id: &str) -> LoadResult<Post> {
        let path = post_files(&self.site.posts_dir)?
            .into_iter()
            .find(|(file_id, _)| file_id == id)
            .map(|(_, path)| path)
            .ok_or_else(|| LoadError::NotFound {
                id: id.to_string(),
                dir: self.site.posts_dir.clone(),
            })?;

        let (record, body) = read_post(&path, id.to_string())?;
        Ok(self.render(record, body))
    }

    /// Load every post with its body rendered, newest first
    pub fn load_posts(&self) -> LoadResult<Vec<Post>> {
        let mut posts = post_files(&self.site.posts_dir)?
            .into_iter()
            .map(|(id, path)| read_post(&path, id).map(|(record, body)| self.render(record, body)))
            .collect::<LoadResult<Vec<_>>>()?;

        posts.sort_by(|a, b| PostRecord::listing_order(&a.record, &b.record));
        Ok(posts)
    }

    fn render(&self, record: PostRecord, body: String) -> Post {
        Post {
            content: self.renderer.render(&body),
            record,
        }
    }
}

/// List post files as (id, path), sorted by file name.
fn post_files(posts_dir: &Path) -> LoadResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(posts_dir).map_err(|e| LoadError::io(posts_dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(posts_dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| LoadError::io(&path, e))?;

        // Follow symlinks to files
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if !is_file || is_hidden(&path) || !is_markdown_file(&path) {
            tracing::debug!("Skipping {:?}", path);
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let id = post_id(&path);
        if let Some(first) = seen.get(&id) {
            return Err(LoadError::DuplicateId {
                id,
                first: first.clone(),
                second: path,
            });
        }
        seen.insert(id.clone(), path.clone());
        files.push((id, path));
    }

    Ok(files)
}

/// Parse one post file into its record and raw markdown body
fn read_post(path: &Path, id: String) -> LoadResult<(PostRecord, String)> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;

    let (fm, body) = FrontMatter::parse(&content).map_err(|e| match e {
        FrontMatterError::Missing => LoadError::MissingFrontMatter {
            path: path.to_path_buf(),
        },
        FrontMatterError::Invalid(message) => LoadError::invalid_front_matter(path, message),
    })?;

    let title = fm.title().ok_or_else(|| LoadError::MissingField {
        path: path.to_path_buf(),
        field: "title",
    })?;

    let raw_date = fm.raw_date().ok_or_else(|| LoadError::MissingField {
        path: path.to_path_buf(),
        field: "date",
    })?;

    let date = parse_date_string(raw_date).ok_or_else(|| LoadError::InvalidDate {
        path: path.to_path_buf(),
        value: raw_date.to_string(),
    })?;

    let mut record = PostRecord::new(id, date, title);
    if let Some(image) = fm.image() {
        record = record.with_image(image);
    }

    Ok((record, body.to_string()))
}

/// Post id: the file name with its extension stripped
fn post_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
