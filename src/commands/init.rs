//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Kenny Porterfield's Website
author: Kenny Porterfield
description: Kenny Porterfield's personal website and blog
language: en

# URL
url: http://example.com
root: /

# Head & header
favicon: /images/kp-logo-white-solid.png
profile_image: /images/profile.jpg
twitter_card: summary_large_image

# Home page
bio:
  - >-
    Hello! My name is Kenny Porterfield and I am a web developer living in
    Atlanta, Georgia. I like to spend my time running, reading, learning,
    and growing as a developer.
social:
  - name: GitHub
    url: https://github.com/
  - name: Twitter
    url: https://twitter.com/

# Directory
posts_dir: posts
static_dir: public
output_dir: out

# Writing
date_format: MMMM D, YYYY
highlight_theme: base16-ocean.dark
line_numbers: false

# Feed
feed_limit: 20
"#;

const PRE_RENDERING_POST: &str = r#"---
title: Two Forms of Pre-rendering
date: 2020-01-01
---

There are two forms of pre-rendering: **Static Generation** and
**Server-side Rendering**. The difference is in **when** it generates the
HTML for a page.

- **Static Generation** generates the HTML at **build time**.
- **Server-side Rendering** generates the HTML on **each request**.
"#;

const SSG_SSR_POST: &str = r#"---
title: When to Use Static Generation v.s. Server-side Rendering
date: 2020-01-02
---

We recommend using **Static Generation** whenever possible because your
pages can be built once and served by a CDN.

You should ask yourself: "Can I pre-render this page **ahead** of a user's
request?" If the answer is yes, then you should choose Static Generation.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already contains a site", target_dir);
    }

    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("public").join("images"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(
        target_dir.join("posts").join("pre-rendering.md"),
        PRE_RENDERING_POST,
    )?;
    fs::write(target_dir.join("posts").join("ssg-ssr.md"), SSG_SSR_POST)?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::load_sorted_posts;
    use crate::Site;

    #[test]
    fn test_init_scaffold_loads() {
        let base = tempfile::TempDir::new().unwrap();
        init_site(base.path()).unwrap();

        let site = Site::new(base.path()).unwrap();
        assert_eq!(site.config.author, "Kenny Porterfield");
        assert_eq!(site.config.social.len(), 2);
        assert!(site.config.bio[0].starts_with("Hello! My name is Kenny"));

        let records = load_sorted_posts(&site.posts_dir).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ssg-ssr", "pre-rendering"]);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let base = tempfile::TempDir::new().unwrap();
        init_site(base.path()).unwrap();
        assert!(init_site(base.path()).is_err());
    }
}
