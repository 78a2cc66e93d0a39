//! Create a new post

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create `posts/<slug>.md` with a title and today's date.
///
/// The slug defaults to the slugified title; an existing file is never
/// overwritten.
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Post title must not be empty");
    }

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a file name from {:?}", title);
    }

    fs::create_dir_all(&site.posts_dir)
        .with_context(|| format!("Failed to create {:?}", site.posts_dir))?;

    let file_path = site.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let today = Local::now().date_naive();
    let content = format!(
        "---\ntitle: {}\ndate: {}\n---\n\n",
        yaml_string(title),
        today.format("%Y-%m-%d")
    );

    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a title so YAML reads it back verbatim
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::load_sorted_posts;

    #[test]
    fn test_new_post_is_loadable() {
        let base = tempfile::TempDir::new().unwrap();
        let site = Site::new(base.path()).unwrap();

        let path = create_post(&site, "Hello: \"World\"", None).unwrap();
        assert_eq!(path, site.posts_dir.join("hello-world.md"));

        let records = load_sorted_posts(&site.posts_dir).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "hello-world");
        assert_eq!(records[0].title, "Hello: \"World\"");
        assert_eq!(records[0].date, Local::now().date_naive());
    }

    #[test]
    fn test_new_post_with_slug() {
        let base = tempfile::TempDir::new().unwrap();
        let site = Site::new(base.path()).unwrap();

        let path = create_post(&site, "Some Title", Some("custom")).unwrap();
        assert!(path.ends_with("custom.md"));
    }

    #[test]
    fn test_new_post_refuses_overwrite() {
        let base = tempfile::TempDir::new().unwrap();
        let site = Site::new(base.path()).unwrap();

        create_post(&site, "Twice", None).unwrap();
        assert!(create_post(&site, "Twice", None).is_err());
    }

    #[test]
    fn test_new_post_rejects_blank_title() {
        let base = tempfile::TempDir::new().unwrap();
        let site = Site::new(base.path()).unwrap();
        assert!(create_post(&site, "   ", None).is_err());
    }
}
