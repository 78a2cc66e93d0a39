//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Site identity and build settings.
///
/// Loaded once per build and handed read-only to the loader, the generator
/// and the templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Head & header
    pub favicon: String,
    pub profile_image: String,
    pub twitter_card: String,
    pub og_image: Option<String>,

    // Home page
    pub bio: Vec<String>,
    pub social: Vec<SocialLink>,

    // Directory
    pub posts_dir: String,
    pub static_dir: String,
    pub output_dir: String,

    // Writing
    pub date_format: String,
    pub highlight_theme: String,
    pub line_numbers: bool,

    // Feed
    pub feed_limit: usize,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Kenny Porterfield's Website".to_string(),
            author: "Kenny Porterfield".to_string(),
            description: "Kenny Porterfield's personal website and blog".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            favicon: "/images/kp-logo-white-solid.png".to_string(),
            profile_image: "/images/profile.jpg".to_string(),
            twitter_card: "summary_large_image".to_string(),
            og_image: None,

            bio: Vec::new(),
            social: Vec::new(),

            posts_dir: "posts".to_string(),
            static_dir: "public".to_string(),
            output_dir: "out".to_string(),

            date_format: "MMMM D, YYYY".to_string(),
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,

            feed_limit: 20,
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }
}

/// A link shown in the home page's social section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.author, "Kenny Porterfield");
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.output_dir, "out");
        assert_eq!(config.feed_limit, 20);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Site
author: Test User
posts_dir: content/posts
bio:
  - Hello there.
social:
  - name: GitHub
    url: https://github.com/test
github_username: test
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.posts_dir, "content/posts");
        assert_eq!(config.bio, vec!["Hello there."]);
        assert_eq!(
            config.social,
            vec![SocialLink {
                name: "GitHub".to_string(),
                url: "https://github.com/test".to_string(),
            }]
        );
        // Unset fields keep their defaults
        assert_eq!(config.static_dir, "public");
        assert!(config.extra.contains_key("github_username"));
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: [broken").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
