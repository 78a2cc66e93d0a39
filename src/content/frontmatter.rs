//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Why a metadata block could not be extracted
#[derive(Error, Debug, PartialEq)]
pub enum FrontMatterError {
    #[error("no front-matter block")]
    Missing,
    #[error("{0}")]
    Invalid(String),
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Err(FrontMatterError::Missing)
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml_content, remaining) =
            split_yaml_block(content).ok_or(FrontMatterError::Missing)?;
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A `---` horizontal rule followed by prose is not a metadata block
        if !has_yaml_structure(yaml_content) {
            return Err(FrontMatterError::Missing);
        }

        serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map(|fm| (fm, remaining))
            .map_err(|e| FrontMatterError::Invalid(format!("YAML: {}", e)))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter fenced by ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::Missing)?;
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            return Self::from_json(json_content).map(|fm| (fm, remaining));
        }

        // Bare JSON object at the start, find the matching brace
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let remaining = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Self::from_json(&content[..=i]).map(|fm| (fm, remaining));
                    }
                }
                _ => {}
            }
        }

        Err(FrontMatterError::Invalid(
            "unterminated JSON front-matter".to_string(),
        ))
    }

    fn from_json(json: &str) -> Result<Self, FrontMatterError> {
        serde_json::from_str(json).map_err(|e| FrontMatterError::Invalid(format!("JSON: {}", e)))
    }

    /// Title with surrounding whitespace removed, `None` when blank
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Raw date value, `None` when blank
    pub fn raw_date(&self) -> Option<&str> {
        self.date.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    /// Image path, `None` when blank
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|i| !i.is_empty())
    }
}

/// Split `---` fenced YAML from the body. Both fences must be lines that
/// are exactly `---`, ignoring trailing whitespace.
fn split_yaml_block(content: &str) -> Option<(&str, &str)> {
    let (opening, rest) = content.split_once('\n')?;
    if opening.trim_end() != "---" {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Valid front-matter has at least one `key: value` line
fn has_yaml_structure(yaml: &str) -> bool {
    yaml.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

/// Parse a date string into a calendar date, dropping any time component
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 keeps the author's local calendar date
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Two Forms of Pre-rendering
date: 2020-01-01
image: /images/prerender.png
---

Next.js has two forms of pre-rendering.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("Two Forms of Pre-rendering"));
        assert_eq!(fm.raw_date(), Some("2020-01-01"));
        assert_eq!(fm.image(), Some("/images/prerender.png"));
        assert!(remaining.starts_with("Next.js has two forms"));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "When to Use {Static}", "date": "2020-01-02"}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("When to Use {Static}"));
        assert_eq!(fm.raw_date(), Some("2020-01-02"));
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Fenced\", \"date\": \"2021-03-04\"}\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("Fenced"));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let content = "---\ntitle: T\ndate: 2021-01-01\nauthor: Kenny\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(
            fm.extra.get("author").and_then(|v| v.as_str()),
            Some("Kenny")
        );
    }

    #[test]
    fn test_no_frontmatter_is_missing() {
        let err = FrontMatter::parse("# Just a heading\n\nText").unwrap_err();
        assert_eq!(err, FrontMatterError::Missing);
    }

    #[test]
    fn test_unclosed_yaml_is_missing() {
        let err = FrontMatter::parse("---\ntitle: Open\n\nbody").unwrap_err();
        assert_eq!(err, FrontMatterError::Missing);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let err = FrontMatter::parse(content).unwrap_err();
        assert_eq!(err, FrontMatterError::Missing);
    }

    #[test]
    fn test_only_exact_fence_closes_block() {
        let content = "---\ntitle: Open\n----\nbody\n---more\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert_eq!(err, FrontMatterError::Missing);

        let content = "---\ntitle: T\ndate: 2021-01-01\n--- \r\n---dashes in body\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("T"));
        assert_eq!(remaining, "---dashes in body\n");
    }

    #[test]
    fn test_longer_opening_rule_is_not_a_fence() {
        let err = FrontMatter::parse("----\ntitle: T\n---\nbody").unwrap_err();
        assert_eq!(err, FrontMatterError::Missing);
    }

    #[test]
    fn test_empty_block() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert_eq!(fm.title(), None);
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_broken_yaml_is_invalid() {
        let content = "---\ntitle: [unclosed\ndate: 2021-01-01\n---\nbody";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
    }

    #[test]
    fn test_blank_fields_read_as_absent() {
        let content = "---\ntitle: \"  \"\ndate:\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), None);
        assert_eq!(fm.raw_date(), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date_string("2024-01-15"), Some(expected));
        assert_eq!(parse_date_string("2024/01/15"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(
            parse_date_string("2024-01-15T23:30:00-05:00"),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date_string("yesterday"), None);
        assert_eq!(parse_date_string("2024-13-01"), None);
        assert_eq!(parse_date_string(""), None);
    }
}
