//! Content loader - loads posts from the source directory

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};
use crate::Devlog;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    devlog: &'a Devlog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(devlog: &'a Devlog) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &devlog.config.highlight.theme,
            devlog.config.highlight.line_number,
        );
        Self { devlog, renderer }
    }

    /// Load all posts from source/_posts
    ///
    /// The returned list is the order the home page consumes: newest first,
    /// ties broken by title.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.devlog.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        if post.published || self.devlog.config.render_drafts {
                            posts.push(post);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date descending, then title ascending
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Get file metadata for the date fallback
        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t));

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        // Get title from front-matter or filename
        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        // Calculate source path relative to source dir
        let source = path
            .strip_prefix(&self.devlog.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // The :title placeholder in the permalink uses the filename slug,
        // not the display title
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();
        let permalink_path = self.generate_permalink(&date, &slug, &fm.categories);
        let permalink = format!(
            "{}{}",
            self.devlog.config.url.trim_end_matches('/'),
            permalink_path
        );

        let content_html = self.renderer.render(body)?;
        let summary = fm
            .summary
            .clone()
            .unwrap_or_else(|| MarkdownRenderer::summarize(&content_html));

        let mut post = Post::new(title, date, source);
        post.id = slug.clone();
        post.summary = summary;
        post.categories = fm.categories;
        post.thumbnail = fm.thumbnail;
        post.raw = body.to_string();
        post.content = content_html;
        post.full_source = path.to_path_buf();
        post.path = permalink_path.clone();
        post.permalink = permalink;
        post.published = fm.published;
        post.slug = slug;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Generate permalink based on config pattern
    fn generate_permalink(
        &self,
        date: &chrono::DateTime<Local>,
        slug: &str,
        categories: &[String],
    ) -> String {
        let pattern = &self.devlog.config.permalink;

        let category = categories
            .first()
            .map(|c| slug::slugify(c))
            .unwrap_or_default();

        let result = pattern
            .replace(":year", &date.format("%Y").to_string())
            .replace(":month", &date.format("%m").to_string())
            .replace(":day", &date.format("%d").to_string())
            .replace(":title", slug)
            .replace(":category", &category);

        format!(
            "{}{}",
            self.devlog.config.root,
            result.trim_start_matches('/')
        )
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Devlog;
    use std::fs;

    fn site_with_posts(posts: &[(&str, &str)]) -> (tempfile::TempDir, Devlog) {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        let devlog = Devlog::new(dir.path()).unwrap();
        (dir, devlog)
    }

    #[test]
    fn test_load_posts_sorted_by_date_desc_then_title() {
        let (_dir, devlog) = site_with_posts(&[
            (
                "older.md",
                "---\ntitle: Older\ndate: 2024-01-01\n---\n\nBody.\n",
            ),
            (
                "newer.md",
                "---\ntitle: Newer\ndate: 2024-02-01\n---\n\nBody.\n",
            ),
            (
                "same-day-b.md",
                "---\ntitle: Bravo\ndate: 2024-02-01\n---\n\nBody.\n",
            ),
        ]);

        let loader = ContentLoader::new(&devlog);
        let posts = loader.load_posts().unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Bravo", "Newer", "Older"]);
    }

    #[test]
    fn test_unpublished_posts_are_skipped() {
        let (_dir, devlog) = site_with_posts(&[
            (
                "draft.md",
                "---\ntitle: Draft\ndate: 2024-01-01\npublished: false\n---\n\nBody.\n",
            ),
            (
                "live.md",
                "---\ntitle: Live\ndate: 2024-01-02\n---\n\nBody.\n",
            ),
        ]);

        let loader = ContentLoader::new(&devlog);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Live");
    }

    #[test]
    fn test_post_fields_from_frontmatter() {
        let (_dir, devlog) = site_with_posts(&[(
            "hello-world.md",
            "---\ntitle: Hello World\ndate: 2024-01-15\nsummary: A greeting.\ncategories:\n  - Web\nthumbnail: images/hello.png\n---\n\nBody text.\n",
        )]);

        let loader = ContentLoader::new(&devlog);
        let posts = loader.load_posts().unwrap();
        let post = &posts[0];
        assert_eq!(post.id, "hello-world");
        assert_eq!(post.summary, "A greeting.");
        assert_eq!(post.categories, vec!["Web"]);
        assert_eq!(post.thumbnail, Some("images/hello.png".to_string()));
        assert!(post.path.contains("posts/2024/01/15/hello-world/"));
    }

    #[test]
    fn test_summary_derived_from_body_when_missing() {
        let (_dir, devlog) = site_with_posts(&[(
            "no-summary.md",
            "---\ntitle: No Summary\ndate: 2024-01-15\n---\n\nFirst paragraph of the body.\n",
        )]);

        let loader = ContentLoader::new(&devlog);
        let posts = loader.load_posts().unwrap();
        assert!(posts[0].summary.contains("First paragraph"));
    }
}
