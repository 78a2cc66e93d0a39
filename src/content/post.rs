//! Post models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Metadata of a single blog post, used for listing and linking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// File name without extension, unique within the posts directory
    pub id: String,

    /// Publication date
    pub date: NaiveDate,

    /// Post title
    pub title: String,

    /// Optional header image path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PostRecord {
    pub fn new(id: impl Into<String>, date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            title: title.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Listing order: newest first, equal dates by id ascending
    pub fn listing_order(a: &PostRecord, b: &PostRecord) -> Ordering {
        b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id))
    }
}

/// A post with its rendered body, used by the detail page
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub record: PostRecord,

    /// Rendered HTML body
    pub content: String,
}

impl Post {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}
