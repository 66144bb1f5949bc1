//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Stable identifier (the filename slug)
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Short summary shown on post cards
    pub summary: String,

    /// Categories, in frontmatter order (may be empty)
    pub categories: Vec<String>,

    /// Thumbnail image reference, resolved by the asset copy step
    pub thumbnail: Option<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Whether the post is published
    pub published: bool,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            id: slug.clone(),
            title,
            date,
            summary: String::new(),
            categories: Vec::new(),
            thumbnail: None,
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            published: true,
            slug,
            extra: HashMap::new(),
        }
    }

    /// Get the previous post in a list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next post in a list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.source == self.source)?;
        if pos < posts.len() - 1 {
            Some(&posts[pos + 1])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_prev_next_navigation() {
        let posts: Vec<Post> = ["First", "Second", "Third"]
            .iter()
            .map(|t| {
                Post::new(
                    t.to_string(),
                    Local::now(),
                    format!("_posts/{}.md", slug::slugify(t)),
                )
            })
            .collect();

        assert!(posts[0].prev(&posts).is_none());
        assert_eq!(posts[1].prev(&posts).unwrap().title, "First");
        assert_eq!(posts[1].next(&posts).unwrap().title, "Third");
        assert!(posts[2].next(&posts).is_none());
    }
}
