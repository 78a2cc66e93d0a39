//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{MarkdownRenderer, Post};
use crate::helpers::{
    absolutize_urls, date_xml, escape_xml, full_url_for, post_url, strip_html,
    strip_invalid_xml_chars,
};
use crate::templates::{HomeData, PostData, SiteData, TemplateRenderer, STYLESHEET};
use crate::Site;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::with_options(
            &site.config.highlight_theme,
            site.config.line_numbers,
        );

        Ok(Self {
            site: site.clone(),
            renderer,
            markdown,
        })
    }

    /// Generate the entire site. `posts` must already be in listing order.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        let output_dir = &self.site.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {:?}", output_dir))?;

        self.copy_static_assets()?;
        write_file(&output_dir.join("css").join("style.css"), STYLESHEET)?;

        let site_data = SiteData::from_config(&self.site.config);

        self.generate_home_page(posts, &site_data)?;
        self.generate_post_pages(posts, &site_data)?;
        self.generate_atom_feed(posts)?;

        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData, is_home: bool) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("is_home", &is_home);
        context.insert("date_format", &self.site.config.date_format);
        context
    }

    /// Home page: biography, social links and the post listing
    fn generate_home_page(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        let config = &self.site.config;
        let home = HomeData {
            bio_html: config
                .bio
                .iter()
                .map(|paragraph| self.markdown.render(paragraph))
                .collect(),
            social: config.social.clone(),
            posts: posts
                .iter()
                .map(|p| PostData::from_record(config, &p.record))
                .collect(),
        };

        let mut context = self.create_base_context(site_data, true);
        context.insert("home", &home);

        let html = self.renderer.render("index.html", &context)?;
        let output_path = self.site.output_dir.join("index.html");
        write_file(&output_path, &html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// One detail page per post at `posts/{id}/index.html`
    fn generate_post_pages(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        for post in posts {
            let mut context = self.create_base_context(site_data, false);
            context.insert("post", &PostData::from_post(&self.site.config, post));

            let html = self.renderer.render("post.html", &context)?;

            let output_path = self
                .site
                .output_dir
                .join("posts")
                .join(post.id())
                .join("index.html");
            write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate Atom feed of the newest posts
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.site.config;
        let base_url = config.url.trim_end_matches('/');
        let updated = posts
            .first()
            .map(|p| date_xml(&p.record.date))
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", full_url_for(config, "/")));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", full_url_for(config, "/")));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(config.feed_limit) {
            let link = escape_xml(&format!("{}{}", base_url, post_url(config, post.id())));
            let published = date_xml(&post.record.date);
            let content = strip_invalid_xml_chars(&absolutize_urls(&post.content, base_url));
            let summary: String = strip_html(&post.content).trim().chars().take(200).collect();

            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&post.record.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!("    <published>{}</published>\n", published));
            feed.push_str(&format!("    <updated>{}</updated>\n", published));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&strip_invalid_xml_chars(&summary))
            ));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content.replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        write_file(&self.site.output_dir.join("atom.xml"), &feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Copy static files (images, etc.) into the output directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            tracing::debug!("No static directory at {:?}", static_dir);
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::info!("Copied {} static files", copied);
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use tempfile::TempDir;

    fn setup_site() -> (TempDir, Site) {
        let base = TempDir::new().unwrap();
        fs::write(
            base.path().join("_config.yml"),
            "url: https://kenny.example\nbio:\n  - Hello! I am a *web developer*.\n",
        )
        .unwrap();

        let posts = base.path().join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(
            posts.join("pre-rendering.md"),
            "---\ntitle: Two Forms of Pre-rendering\ndate: 2020-01-01\n---\n\nStatic generation.\n",
        )
        .unwrap();
        fs::write(
            posts.join("ssg-ssr.md"),
            "---\ntitle: When to Use SSG\ndate: 2020-01-02\n---\n\nUse it <img src=\"/images/x.png\">\n",
        )
        .unwrap();

        let images = base.path().join("public").join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("profile.jpg"), b"jpg").unwrap();

        let site = Site::new(base.path()).unwrap();
        (base, site)
    }

    fn build(site: &Site) {
        let posts = ContentLoader::new(site).load_posts().unwrap();
        Generator::new(site).unwrap().generate(&posts).unwrap();
    }

    #[test]
    fn test_generate_writes_all_pages() {
        let (_base, site) = setup_site();
        build(&site);

        let out = &site.output_dir;
        assert!(out.join("index.html").exists());
        assert!(out.join("posts/pre-rendering/index.html").exists());
        assert!(out.join("posts/ssg-ssr/index.html").exists());
        assert!(out.join("css/style.css").exists());
        assert!(out.join("images/profile.jpg").exists());
        assert!(out.join("atom.xml").exists());
    }

    #[test]
    fn test_home_page_links_posts_newest_first() {
        let (_base, site) = setup_site();
        build(&site);

        let index = fs::read_to_string(site.output_dir.join("index.html")).unwrap();
        let newer = index.find("/posts/ssg-ssr/").unwrap();
        let older = index.find("/posts/pre-rendering/").unwrap();
        assert!(newer < older);
        assert!(index.contains("January 2, 2020"));
        assert!(index.contains("<em>web developer</em>"));
    }

    #[test]
    fn test_atom_feed_entries() {
        let (_base, site) = setup_site();
        build(&site);

        let feed = fs::read_to_string(site.output_dir.join("atom.xml")).unwrap();
        assert!(feed.contains("<link href=\"https://kenny.example/posts/ssg-ssr/\"/>"));
        assert!(feed.contains("<published>2020-01-02T00:00:00+00:00</published>"));
        assert!(feed.contains("src=\"https://kenny.example/images/x.png\""));
        assert_eq!(feed.matches("<entry>").count(), 2);
    }

    #[test]
    fn test_generate_without_posts() {
        let base = TempDir::new().unwrap();
        fs::create_dir(base.path().join("posts")).unwrap();
        let site = Site::new(base.path()).unwrap();
        build(&site);

        let index = fs::read_to_string(site.output_dir.join("index.html")).unwrap();
        assert!(index.contains("Blog"));
        assert!(!index.contains("list-item"));
    }
}
