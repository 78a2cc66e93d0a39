//! Content module - handles posts and their metadata

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use loader::{load_sorted_posts, post_ids, ContentLoader};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostRecord};
