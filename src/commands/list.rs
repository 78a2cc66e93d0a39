//! List posts

use anyhow::Result;
use std::io::Write;

use crate::content::load_sorted_posts;
use crate::helpers::format_date;
use crate::Site;

/// Print the sorted post records, as text or JSON
pub fn run(site: &Site, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    write_listing(site, json, &mut stdout.lock())
}

fn write_listing(site: &Site, json: bool, out: &mut impl Write) -> Result<()> {
    let records = load_sorted_posts(&site.posts_dir)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Posts ({}):", records.len())?;
    for record in &records {
        writeln!(
            out,
            "  {} - {} [{}]",
            format_date(&record.date, "YYYY-MM-DD"),
            record.title,
            record.id
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with_posts() -> (tempfile::TempDir, Site) {
        let base = tempfile::TempDir::new().unwrap();
        let posts = base.path().join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2021-01-01\n---\n").unwrap();
        fs::write(posts.join("b.md"), "---\ntitle: B\ndate: 2022-01-01\n---\n").unwrap();
        let site = Site::new(base.path()).unwrap();
        (base, site)
    }

    #[test]
    fn test_text_listing() {
        let (_base, site) = site_with_posts();
        let mut out = Vec::new();
        write_listing(&site, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Posts (2):\n  2022-01-01 - B [b]\n  2021-01-01 - A [a]\n"
        );
    }

    #[test]
    fn test_json_listing() {
        let (_base, site) = site_with_posts();
        let mut out = Vec::new();
        write_listing(&site, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["id"], "b");
        assert_eq!(value[0]["date"], "2022-01-01");
        assert_eq!(value[1]["title"], "A");
    }
}
