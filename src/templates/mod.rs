//! Built-in site templates using the Tera template engine
//!
//! Templates and the stylesheet are embedded in the binary, so a site only
//! needs its config, its posts and its static files.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{SiteConfig, SocialLink};
use crate::content::{parse_date_string, Post, PostRecord};
use crate::helpers::{date_iso, format_date, html_escape, post_url, url_for};

/// Stylesheet written to `css/style.css`
pub const STYLESHEET: &str = include_str!("site/style.css");

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post bodies and bio are pre-rendered HTML; user text is escaped
        // explicitly with `escape`, attribute values with `escape_attr`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("escape_attr", escape_attr_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format an ISO date string with a Moment.js-style format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    match parse_date_string(&s) {
        Some(date) => Ok(tera::Value::String(format_date(&date, &format))),
        None => Err(tera::Error::msg(format!(
            "date_format: `{}` is not a date",
            s
        ))),
    }
}

/// Tera filter: escape a value for a double-quoted attribute, keeping `/`
/// readable in URLs
fn escape_attr_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_attr", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Site identity as the templates see it, with URLs resolved against `root`
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub description: String,
    pub language: String,
    pub favicon: String,
    pub profile_image: String,
    pub twitter_card: String,
    pub og_image: Option<String>,
    pub home_url: String,
    pub stylesheet: String,
    pub feed: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            favicon: asset_url(config, &config.favicon),
            profile_image: asset_url(config, &config.profile_image),
            twitter_card: config.twitter_card.clone(),
            og_image: config.og_image.as_deref().map(|i| asset_url(config, i)),
            home_url: url_for(config, "/"),
            stylesheet: url_for(config, "css/style.css"),
            feed: url_for(config, "atom.xml"),
        }
    }
}

/// A post as listed on the home page or shown on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    /// ISO date, formatted in templates with `date_format`
    pub date: String,
    pub url: String,
    pub image: Option<String>,
    pub content: String,
}

impl PostData {
    /// Listing entry without body
    pub fn from_record(config: &SiteConfig, record: &PostRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            date: date_iso(&record.date),
            url: post_url(config, &record.id),
            image: record.image.as_deref().map(|i| asset_url(config, i)),
            content: String::new(),
        }
    }

    /// Detail entry with rendered body
    pub fn from_post(config: &SiteConfig, post: &Post) -> Self {
        Self {
            content: post.content.clone(),
            ..Self::from_record(config, &post.record)
        }
    }
}

/// Home page context beyond the shared site data
#[derive(Debug, Clone, Serialize)]
pub struct HomeData {
    pub bio_html: String,
    pub social: Vec<SocialLink>,
    pub posts: Vec<PostData>,
}

/// Resolve an asset path against the site root, leaving absolute URLs alone
fn asset_url(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        path.to_string()
    } else {
        url_for(config, path)
    }
}
