//! Built-in "paper" theme templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Rendering
//! collaborators receive plain serializable data; no logic lives in the
//! templates beyond iteration and conditionals.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded paper theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all paper templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Disable autoescaping since we are generating HTML and the post
        // content is already rendered markup
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("paper/layout.html")),
            ("index.html", include_str!("paper/index.html")),
            ("post.html", include_str!("paper/post.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("paper/partials/head.html"),
            ),
            (
                "partials/intro.html",
                include_str!("paper/partials/intro.html"),
            ),
            (
                "partials/category_list.html",
                include_str!("paper/partials/category_list.html"),
            ),
            (
                "partials/post_list.html",
                include_str!("paper/partials/post_list.html"),
            ),
            (
                "partials/pager.html",
                include_str!("paper/partials/pager.html"),
            ),
            (
                "partials/footer.html",
                include_str!("paper/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-wide data available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub posts: Vec<PostData>,
    pub categories: crate::taxonomy::CategoryCounts,
    pub post_count: usize,
}

/// Site configuration data for templates
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub per_page: usize,
    pub keyword: String,
}

/// Introduction panel data
#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub greeting: String,
    pub tagline: String,
    pub avatar: String,
    pub links: Vec<ProfileLinkData>,
}

/// A social link in the introduction panel
#[derive(Debug, Clone, Serialize)]
pub struct ProfileLinkData {
    pub name: String,
    pub url: String,
}

/// A post as consumed by templates
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    pub date: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub thumbnail: Option<String>,
    pub path: String,
    pub permalink: String,
}

/// One entry of the category filter
#[derive(Debug, Clone, Serialize)]
pub struct CategoryItem {
    pub name: String,
    pub count: usize,
    pub url: String,
    pub selected: bool,
}

/// Pagination state for a home page
#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub current_url: String,
    pub prev: usize,
    pub prev_link: String,
    pub next: usize,
    pub next_link: String,
}

/// Prev/next navigation entry on a post page
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    // The incoming value is already a "YYYY-MM-DD" string; "LL" reformats
    // it into a long date
    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Devlog".to_string(),
                description: String::new(),
                author: "Jane".to_string(),
                language: "en".to_string(),
                url: "https://example.com".to_string(),
                root: "/".to_string(),
                per_page: 10,
                keyword: String::new(),
            },
        );
        context.insert(
            "profile",
            &ProfileData {
                name: "Jane".to_string(),
                greeting: "Nice to Meet You,".to_string(),
                tagline: "I build things.".to_string(),
                avatar: String::new(),
                links: Vec::new(),
            },
        );
        context.insert(
            "categories",
            &vec![
                CategoryItem {
                    name: "All".to_string(),
                    count: 2,
                    url: "/".to_string(),
                    selected: true,
                },
                CategoryItem {
                    name: "Web".to_string(),
                    count: 1,
                    url: "/category/web/".to_string(),
                    selected: false,
                },
            ],
        );
        context.insert("selected_category", "All");
        context.insert(
            "page_posts",
            &vec![PostData {
                id: "hello".to_string(),
                title: "Hello".to_string(),
                date: "2024-01-15".to_string(),
                summary: "Hi.".to_string(),
                categories: vec!["Web".to_string()],
                thumbnail: None,
                path: "/posts/2024/01/15/hello/".to_string(),
                permalink: "https://example.com/posts/2024/01/15/hello/".to_string(),
            }],
        );
        context.insert(
            "pagination",
            &PaginationData {
                per_page: 10,
                total: 1,
                current: 1,
                current_url: "/".to_string(),
                prev: 0,
                prev_link: String::new(),
                next: 0,
                next_link: String::new(),
            },
        );
        context.insert("is_home", &true);
        context.insert("current_path", "/");
        context.insert("current_year", "2024");
        context
    }

    #[test]
    fn test_render_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render("index.html", &sample_context()).unwrap();
        assert!(html.contains("Nice to Meet You,"));
        assert!(html.contains("Web"));
        assert!(html.contains("Hello"));
        // selected category carries the active class
        assert!(html.contains("category-item active"));
    }

    #[test]
    fn test_render_post() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = sample_context();
        context.insert("page_title", "Hello");
        context.insert("page_date", "2024-01-15");
        context.insert("page_content", "<p>Body</p>");
        context.insert("page_categories", &vec!["Web".to_string()]);
        context.insert("prev_post", &Option::<NavPost>::None);
        context.insert("next_post", &Option::<NavPost>::None);
        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let out = truncate_chars_filter(&tera::Value::from("abcdefgh"), &args).unwrap();
        assert_eq!(out, tera::Value::from("abcde…"));
    }

    #[test]
    fn test_date_format_filter_long_form() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), tera::Value::from("LL"));
        let out = date_format_filter(&tera::Value::from("2024-01-15"), &args).unwrap();
        assert_eq!(out, tera::Value::from("January 15, 2024"));
    }
}
